//! Route-change Reactor
//!
//! Keeps the reader in step with the location. Each parameter is handled on
//! its own and only acts when its validated value actually changed.

use leptos::prelude::*;

use super::generation::RequestFamily;
use super::ChapterNavigation;
use crate::error::ReaderError;
use crate::ids::{Identifier, RouteParam};
use crate::models::Chapter;
use crate::router::Route;
use crate::store::ReaderStateStoreFields;

impl ChapterNavigation {
    pub async fn on_novel_param(&self, param: RouteParam<'_>) {
        let novel_id = Identifier::from_param(param);
        if self.state.novel_id().get_untracked() == novel_id {
            return;
        }
        log::debug!("novel param changed to {}", novel_id);
        self.state.novel_id().set(novel_id);

        let chapter_id = self.state.chapter_id().get_untracked();
        if !novel_id.is_valid() {
            // Anything still in flight belongs to the previous novel.
            self.generations.begin(RequestFamily::ChapterList);
            self.generations.begin(RequestFamily::ChapterContent);
            self.fail(ReaderError::InvalidNovel);
            self.state.chapters().set(Vec::new());
            self.state
                .chapter()
                .set(Chapter::sentinel(ReaderError::InvalidNovel.to_string()));
            self.drop_branches();
        } else if chapter_id.is_valid() {
            self.initialize_chapter_data(novel_id, chapter_id).await;
        }
    }

    pub async fn on_chapter_param(&self, param: RouteParam<'_>) {
        let chapter_id = Identifier::from_param(param);
        if self.state.chapter_id().get_untracked() == chapter_id {
            return;
        }
        log::debug!("chapter param changed to {}", chapter_id);
        self.state.chapter_id().set(chapter_id);

        if !chapter_id.is_valid() {
            self.reject_chapter();
        } else if self.state.novel_id().get_untracked().is_valid() {
            // The list is keyed by novel, so only the content changes.
            self.fetch_chapter_content(chapter_id).await;
            self.refresh_branches().await;
        }
    }

    fn reject_chapter(&self) {
        self.generations.begin(RequestFamily::ChapterContent);
        self.fail(ReaderError::InvalidChapter);
        self.state
            .chapter()
            .set(Chapter::sentinel(ReaderError::InvalidChapter.to_string()));
        self.drop_branches();
    }

    /// Feed the reactors from a location path. Non-reader paths are ignored.
    ///
    /// When the novel changes the new chapter id is stored first, so the
    /// novel reactor initializes list and content together in one pass.
    pub async fn on_route(&self, path: &str) {
        let Route::Reader { novel_id, chapter_id } = Route::parse(path) else {
            return;
        };
        let next_novel = Identifier::from_param(RouteParam::Single(&novel_id));
        if next_novel == self.state.novel_id().get_untracked() {
            self.on_chapter_param(RouteParam::Single(&chapter_id)).await;
            return;
        }

        let next_chapter = Identifier::from_param(RouteParam::Single(&chapter_id));
        self.state.chapter_id().set(next_chapter);
        self.on_novel_param(RouteParam::Single(&novel_id)).await;
        if next_novel.is_valid() && !next_chapter.is_valid() {
            self.reject_chapter();
        }
    }
}
