//! HTTP handlers and route configuration.

mod auth;
mod blogs;
mod comments;
mod health;
mod users;


use actix_web::web;

use crate::middleware::error::{json_error_handler, path_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope("/api")
                // Public routes
                .route("/health", web::get().to(health::health_check))
                // Auth routes
                .service(
                    web::scope("/auth")
                        .route("/signup", web::post().to(auth::signup))
                        .route("/login", web::post().to(auth::login))
                        .route("/me", web::get().to(auth::me)),
                )
                // Protected routes
                .route("/users", web::get().to(users::list_users))
                .service(
                    web::scope("/blogs")
                        .route("", web::post().to(blogs::create_blog))
                        .route("", web::get().to(blogs::list_blogs))
                        .route("/author/{author_id}", web::get().to(blogs::list_by_author))
                        .route("/tag/{tag}", web::get().to(blogs::list_by_tag))
                        .route("/{id}", web::get().to(blogs::get_blog))
                        .route("/{id}", web::put().to(blogs::update_blog))
                        .route("/{id}", web::delete().to(blogs::delete_blog))
                        .route("/{id}/upvote", web::post().to(blogs::upvote))
                        .route("/{id}/downvote", web::post().to(blogs::downvote))
                        .route("/{id}/comments", web::post().to(comments::add_comment))
                        .route(
                            "/{id}/comments/{comment_id}",
                            web::put().to(comments::update_comment),
                        )
                        .route(
                            "/{id}/comments/{comment_id}",
                            web::delete().to(comments::delete_comment),
                        )
                        .route(
                            "/{id}/comments/{comment_id}/vote",
                            web::post().to(comments::vote_comment),
                        ),
                ),
        );
}
