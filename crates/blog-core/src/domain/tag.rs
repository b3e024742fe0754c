use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of categories a blog may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Sports,
    Nature,
    Traveling,
    Technology,
    Food,
    Lifestyle,
    Education,
    Entertainment,
}

impl Tag {
    pub const ALL: [Tag; 8] = [
        Tag::Sports,
        Tag::Nature,
        Tag::Traveling,
        Tag::Technology,
        Tag::Food,
        Tag::Lifestyle,
        Tag::Education,
        Tag::Entertainment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Sports => "sports",
            Tag::Nature => "nature",
            Tag::Traveling => "traveling",
            Tag::Technology => "technology",
            Tag::Food => "food",
            Tag::Lifestyle => "lifestyle",
            Tag::Education => "education",
            Tag::Entertainment => "entertainment",
        }
    }

    /// Comma-separated list of every valid tag, for error messages.
    pub fn allowed() -> String {
        Self::ALL
            .iter()
            .map(Tag::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse a submitted tag list into a de-duplicated set.
    ///
    /// On failure returns every element that is not a known tag, in
    /// submission order.
    pub fn parse_set<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Tag>, Vec<String>> {
        let mut tags = Vec::with_capacity(raw.len());
        let mut invalid = Vec::new();

        for item in raw {
            match item.as_ref().parse::<Tag>() {
                Ok(tag) if !tags.contains(&tag) => tags.push(tag),
                Ok(_) => {}
                Err(_) => invalid.push(item.as_ref().to_string()),
            }
        }

        if invalid.is_empty() {
            Ok(tags)
        } else {
            Err(invalid)
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}
