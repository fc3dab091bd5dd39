//! Frontend Models
//!
//! Data structures shared by the chapter source, the auth backend and the views.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::Identifier;

/// Title used by placeholder chapters after invalid input
pub const ERROR_TITLE: &str = "错误";

/// A chapter as displayed by the reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: Identifier,
    pub title: String,
    pub content: Vec<String>,
}

impl Chapter {
    /// Placeholder shown before the first fetch completes
    pub fn pending(id: Identifier) -> Self {
        let title = if id.is_valid() {
            format!("第{}章", id)
        } else {
            String::new()
        };
        Self {
            id,
            title,
            content: Vec::new(),
        }
    }

    /// Sentinel chapter substituted on invalid input
    pub fn sentinel(message: impl Into<String>) -> Self {
        Self {
            id: Identifier::INVALID,
            title: ERROR_TITLE.to_string(),
            content: vec![message.into()],
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !self.id.is_valid() && self.title == ERROR_TITLE
    }
}

impl Default for Chapter {
    fn default() -> Self {
        Self::pending(Identifier::INVALID)
    }
}

/// An alternate take on a base chapter, written by another author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchChapter {
    pub id: u64,
    pub title: String,
    pub author: String,
    /// Creation time, unix milliseconds
    pub created_at: i64,
    pub tags: BTreeSet<String>,
}

/// Field the branch panel is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    CreationTime,
    Title,
    Author,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::CreationTime, SortKey::Title, SortKey::Author];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::CreationTime => "创建时间",
            SortKey::Title => "标题",
            SortKey::Author => "作者",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

// ========================
// Auth Models
// ========================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Signed-in user as reported by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl User {
    /// Display name: metadata name, else the local part of the email
    pub fn display_name(&self) -> Option<String> {
        self.user_metadata
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: User,
}

/// Fields accepted by the user update endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}
