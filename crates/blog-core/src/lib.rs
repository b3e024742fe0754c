//! # Blog Core
//!
//! The domain layer of the blog API: entities, validation rules, ports,
//! and the credential and content stores.
//! This crate has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::{DomainError, RepoError};
