//! Error Types
//!
//! Every failure is caught where it happens and shown as an inline message;
//! the `Display` text of these errors is exactly what the user sees.

use serde::Deserialize;
use thiserror::Error;

/// Broad failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidIdentifier,
    FetchFailure,
    NavigationFailure,
    InitializationFailure,
    AuthFailure,
}

/// Failures raised by a chapter source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Failures of the chapter-navigation view model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderError {
    #[error("无效的小说ID，无法获取章节列表")]
    InvalidNovelForList,
    #[error("无效的小说ID")]
    InvalidNovel,
    #[error("无效的章节ID")]
    InvalidChapter,
    #[error("无效的小说或章节ID")]
    InvalidIds,
    #[error("无效的小说或章节ID，无法获取分支章节")]
    InvalidIdsForBranches,
    #[error("无效的导航参数")]
    InvalidNavigation,
    #[error("获取章节列表失败")]
    ChapterListFetch(#[source] ApiError),
    #[error("获取章节内容失败")]
    ChapterContentFetch(#[source] ApiError),
    #[error("获取分支章节失败")]
    BranchFetch(#[source] ApiError),
    #[error("页面跳转失败")]
    Navigation(#[source] NavigationError),
    #[error("章节数据初始化失败")]
    Initialization,
}

impl ReaderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReaderError::InvalidNovelForList
            | ReaderError::InvalidNovel
            | ReaderError::InvalidChapter
            | ReaderError::InvalidIds
            | ReaderError::InvalidIdsForBranches
            | ReaderError::InvalidNavigation => ErrorKind::InvalidIdentifier,
            ReaderError::ChapterListFetch(_)
            | ReaderError::ChapterContentFetch(_)
            | ReaderError::BranchFetch(_) => ErrorKind::FetchFailure,
            ReaderError::Navigation(_) => ErrorKind::NavigationFailure,
            ReaderError::Initialization => ErrorKind::InitializationFailure,
        }
    }
}

/// A page transition the navigator could not perform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot navigate to {path}: {reason}")]
pub struct NavigationError {
    pub path: String,
    pub reason: String,
}

/// Failure reported by the auth service, or a default message when it gave none
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Error)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::AuthFailure
    }
}
