//! Chapter Source
//!
//! The reader's chapter endpoints. `MockChapterSource` stands in for the
//! real service with fixed latency and synthetic data.

use async_trait::async_trait;

use crate::config::MockLatency;
use crate::error::ApiError;
use crate::ids::Identifier;
use crate::models::{BranchChapter, Chapter};

use super::simulate_latency;
use super::synthetic::{synthetic_branch_chapters, synthetic_chapter, SYNTHETIC_NOVEL_ID};

/// Number of chapters every mocked novel has
pub const MOCK_CHAPTER_COUNT: u32 = 10;

#[async_trait(?Send)]
pub trait ChapterSource: Send + Sync {
    /// Ordered chapter ids of a novel
    async fn chapter_list(&self, novel_id: u32) -> Result<Vec<u32>, ApiError>;

    /// Content of one chapter. `novel_id` is whatever the reader currently
    /// holds and may be the sentinel.
    async fn chapter_content(&self, novel_id: Identifier, chapter_id: u32) -> Result<Chapter, ApiError>;

    async fn branch_chapters(&self, novel_id: u32, chapter_id: u32) -> Result<Vec<BranchChapter>, ApiError>;
}

#[derive(Debug, Clone, Default)]
pub struct MockChapterSource {
    latency: MockLatency,
}

impl MockChapterSource {
    pub fn new(latency: MockLatency) -> Self {
        Self { latency }
    }
}

#[async_trait(?Send)]
impl ChapterSource for MockChapterSource {
    async fn chapter_list(&self, novel_id: u32) -> Result<Vec<u32>, ApiError> {
        log::debug!("fetching chapter list for novel {}", novel_id);
        simulate_latency(self.latency.chapter_list_ms).await;
        Ok((1..=MOCK_CHAPTER_COUNT).collect())
    }

    async fn chapter_content(&self, novel_id: Identifier, chapter_id: u32) -> Result<Chapter, ApiError> {
        log::debug!("fetching chapter {} of novel {}", chapter_id, novel_id);
        simulate_latency(self.latency.chapter_content_ms).await;

        if novel_id.raw() == SYNTHETIC_NOVEL_ID {
            if let Some(novel) = novel_id.get() {
                return Ok(synthetic_chapter(novel, chapter_id));
            }
        }

        Ok(Chapter {
            id: chapter_id.into(),
            title: format!("第{}章标题", chapter_id),
            content: vec![
                format!("这是第{}章的示例内容。", chapter_id),
                "这是第一段内容。".to_string(),
                "这是第二段内容。".to_string(),
                format!("小说ID: {}", novel_id),
            ],
        })
    }

    async fn branch_chapters(&self, novel_id: u32, chapter_id: u32) -> Result<Vec<BranchChapter>, ApiError> {
        log::debug!("fetching branches of chapter {} (novel {})", chapter_id, novel_id);
        simulate_latency(self.latency.branch_chapters_ms).await;
        Ok(synthetic_branch_chapters(chapter_id))
    }
}
