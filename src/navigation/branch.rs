//! Branch Chapters
//!
//! Alternate versions of the open chapter, shown in a side panel that can be
//! ordered by creation time, title or author.

use std::cmp::Ordering;

use leptos::prelude::*;

use super::generation::{LoadingGuard, RequestFamily};
use super::ChapterNavigation;
use crate::error::ReaderError;
use crate::ids::Identifier;
use crate::models::{BranchChapter, SortKey, SortOrder};
use crate::store::ReaderStateStoreFields;

/// Stable sort; equal keys keep their relative order in both directions.
pub fn sort_branches(branches: &mut [BranchChapter], key: SortKey, order: SortOrder) {
    branches.sort_by(|a, b| {
        let ordering: Ordering = match key {
            SortKey::CreationTime => a.created_at.cmp(&b.created_at),
            SortKey::Title => a.title.cmp(&b.title),
            SortKey::Author => a.author.cmp(&b.author),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

impl ChapterNavigation {
    pub async fn fetch_branch_chapters(&self, novel_id: Identifier, chapter_id: Identifier) {
        let token = self.generations.begin(RequestFamily::BranchChapters);
        let (Some(novel), Some(chapter)) = (novel_id.get(), chapter_id.get()) else {
            self.fail(ReaderError::InvalidIdsForBranches);
            self.state.branch_chapters().set(Vec::new());
            return;
        };

        let _loading = LoadingGuard::hold(self.state, self.generations, token);
        let result = self.source.get_value().branch_chapters(novel, chapter).await;
        if !self.generations.is_current(token) {
            log::debug!("dropping stale branches of chapter {}", chapter);
            return;
        }

        match result {
            Ok(branches) => self.state.branch_chapters().set(branches),
            Err(err) => {
                self.fail(ReaderError::BranchFetch(err));
                self.state.branch_chapters().set(Vec::new());
            }
        }
    }

    /// Re-sort the panel in place by the active key and direction.
    pub fn sort_branch_chapters(&self) {
        let key = self.state.sort_key().get_untracked();
        let order = self.state.sort_order().get_untracked();
        self.state
            .branch_chapters()
            .update(|branches| sort_branches(branches, key, order));
    }

    pub fn set_sort_key(&self, key: SortKey) {
        self.state.sort_key().set(key);
        self.sort_branch_chapters();
    }

    pub fn set_sort_order(&self, order: SortOrder) {
        self.state.sort_order().set(order);
        self.sort_branch_chapters();
    }

    pub fn toggle_sort_order(&self) {
        let flipped = self.state.sort_order().get_untracked().flipped();
        self.set_sort_order(flipped);
    }

    /// Keep an open panel in step with the current chapter; a closed one is
    /// just emptied so it cannot show another chapter's branches later.
    pub(crate) async fn refresh_branches(&self) {
        let novel_id = self.state.novel_id().get_untracked();
        let chapter_id = self.state.chapter_id().get_untracked();
        let visible = self.state.show_branch_chapters().get_untracked();
        if visible && novel_id.is_valid() && chapter_id.is_valid() {
            self.fetch_branch_chapters(novel_id, chapter_id).await;
            self.sort_branch_chapters();
        } else {
            self.drop_branches();
        }
    }

    /// Empty the panel and outdate any branch request still in flight.
    pub(crate) fn drop_branches(&self) {
        self.generations.begin(RequestFamily::BranchChapters);
        self.state.branch_chapters().set(Vec::new());
    }

    /// Show or hide the panel; opening it loads and sorts the branches.
    pub async fn toggle_branch_chapters(&self) {
        let visible = !self.state.show_branch_chapters().get_untracked();
        self.state.show_branch_chapters().set(visible);
        if !visible {
            return;
        }
        let novel_id = self.state.novel_id().get_untracked();
        let chapter_id = self.state.chapter_id().get_untracked();
        self.fetch_branch_chapters(novel_id, chapter_id).await;
        self.sort_branch_chapters();
    }
}
