//! Chapter Navigation
//!
//! View model of the reader page: which novel and chapter are open, their
//! content, the chapter list that defines prev/next, and the branch panel.
//! All failures end up as a message in the shared `error` field; no
//! operation returns an error to its caller.

mod branch;
mod generation;
mod reactor;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use futures_util::future::join;
use leptos::prelude::*;

use crate::api::ChapterSource;
use crate::error::ReaderError;
use crate::ids::Identifier;
use crate::models::{BranchChapter, Chapter, SortKey, SortOrder};
use crate::router::{chapter_path, novel_path, Navigator, ROOT_PATH};
use crate::store::{
    store_chapter_index, store_clear_error, store_replace_chapter_text, store_set_error, ReaderState,
    ReaderStateStoreFields, ReaderStore,
};

pub use branch::sort_branches;
use generation::{LoadingGuard, RequestFamily, RequestGenerations};

const LOAD_FAILED_TITLE: &str = "加载失败";
const LOAD_FAILED_TEXT: &str = "获取内容失败，请重试";

/// Who reports a fetch's failure and owns the loading flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchScope {
    Standalone,
    /// Initialization reports once both halves have settled
    Initialization,
}

/// `None` when a newer request of the same family superseded this one
type Fetched<T> = Option<Result<T, ReaderError>>;

#[derive(Clone, Copy)]
pub struct ChapterNavigation {
    state: ReaderStore,
    source: StoredValue<Arc<dyn ChapterSource>>,
    navigator: StoredValue<Arc<dyn Navigator>>,
    generations: RequestGenerations,
}

impl ChapterNavigation {
    pub fn new(
        novel_id: Identifier,
        chapter_id: Identifier,
        source: Arc<dyn ChapterSource>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            state: ReaderStore::new(ReaderState::new(novel_id, chapter_id)),
            source: StoredValue::new(source),
            navigator: StoredValue::new(navigator),
            generations: RequestGenerations::new(),
        }
    }

    // ========================
    // Reactive Fields
    // ========================

    pub fn novel_id(&self) -> Identifier {
        self.state.novel_id().get()
    }

    pub fn chapter_id(&self) -> Identifier {
        self.state.chapter_id().get()
    }

    pub fn loading(&self) -> bool {
        self.state.loading().get()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error().get()
    }

    pub fn chapter(&self) -> Chapter {
        self.state.chapter().get()
    }

    pub fn chapters(&self) -> Vec<u32> {
        self.state.chapters().get()
    }

    pub fn branch_chapters(&self) -> Vec<BranchChapter> {
        self.state.branch_chapters().get()
    }

    pub fn show_branch_chapters(&self) -> bool {
        self.state.show_branch_chapters().get()
    }

    pub fn sort_key(&self) -> SortKey {
        self.state.sort_key().get()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.state.sort_order().get()
    }

    // ========================
    // Derived Navigation
    // ========================

    /// Position of the chapter in the list, -1 when it is not listed
    pub fn current_chapter_index(&self) -> i64 {
        store_chapter_index(&self.state).map_or(-1, |index| index as i64)
    }

    pub fn has_prev_chapter(&self) -> bool {
        self.prev_chapter_id().is_some()
    }

    pub fn has_next_chapter(&self) -> bool {
        self.next_chapter_id().is_some()
    }

    pub fn prev_chapter_id(&self) -> Option<u32> {
        let index = store_chapter_index(&self.state)?.checked_sub(1)?;
        self.state.chapters().with(|chapters| chapters.get(index).copied())
    }

    pub fn next_chapter_id(&self) -> Option<u32> {
        let index = store_chapter_index(&self.state)? + 1;
        self.state.chapters().with(|chapters| chapters.get(index).copied())
    }

    // ========================
    // Fetchers
    // ========================

    fn fail(&self, err: ReaderError) {
        match std::error::Error::source(&err) {
            Some(cause) => log::error!("{} ({:?}): {}", err, err.kind(), cause),
            None => log::warn!("{} ({:?})", err, err.kind()),
        }
        store_set_error(&self.state, err.to_string());
    }

    /// Load the chapter ids of a novel into the list and return them.
    pub async fn fetch_chapters_list(&self, novel_id: Identifier) -> Vec<u32> {
        match self.load_chapters_list(novel_id, FetchScope::Standalone).await {
            Some(Ok(chapters)) => chapters,
            Some(Err(err)) => {
                self.fail(err);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    async fn load_chapters_list(&self, novel_id: Identifier, scope: FetchScope) -> Fetched<Vec<u32>> {
        let token = self.generations.begin(RequestFamily::ChapterList);
        let Some(novel) = novel_id.get() else {
            self.state.chapters().set(Vec::new());
            return Some(Err(ReaderError::InvalidNovelForList));
        };
        if scope == FetchScope::Standalone {
            store_clear_error(&self.state);
        }

        let result = self.source.get_value().chapter_list(novel).await;
        if !self.generations.is_current(token) {
            log::debug!("dropping stale chapter list of novel {}", novel);
            return None;
        }

        match result {
            Ok(chapters) => {
                self.state.chapters().set(chapters.clone());
                Some(Ok(chapters))
            }
            Err(err) => {
                self.state.chapters().set(Vec::new());
                Some(Err(ReaderError::ChapterListFetch(err)))
            }
        }
    }

    pub async fn fetch_chapter_content(&self, chapter_id: Identifier) {
        if let Some(Err(err)) = self.load_chapter_content(chapter_id, FetchScope::Standalone).await {
            self.fail(err);
        }
    }

    async fn load_chapter_content(&self, chapter_id: Identifier, scope: FetchScope) -> Fetched<()> {
        let token = self.generations.begin(RequestFamily::ChapterContent);
        if scope == FetchScope::Standalone {
            store_clear_error(&self.state);
        }

        let Some(chapter) = chapter_id.get() else {
            self.state
                .chapter()
                .set(Chapter::sentinel(ReaderError::InvalidChapter.to_string()));
            return Some(Err(ReaderError::InvalidChapter));
        };

        let _loading = (scope == FetchScope::Standalone)
            .then(|| LoadingGuard::hold(self.state, self.generations, token));
        let novel_id = self.state.novel_id().get_untracked();
        let result = self.source.get_value().chapter_content(novel_id, chapter).await;
        if !self.generations.is_current(token) {
            log::debug!("dropping stale content of chapter {}", chapter);
            return None;
        }

        match result {
            Ok(content) => {
                self.state.chapter().set(content);
                Some(Ok(()))
            }
            Err(err) => {
                store_replace_chapter_text(&self.state, LOAD_FAILED_TITLE, vec![LOAD_FAILED_TEXT.to_string()]);
                Some(Err(ReaderError::ChapterContentFetch(err)))
            }
        }
    }

    /// Store both ids and load the chapter list and content side by side.
    pub async fn initialize_chapter_data(&self, novel_id: Identifier, chapter_id: Identifier) {
        if !novel_id.is_valid() || !chapter_id.is_valid() {
            self.fail(ReaderError::InvalidIds);
            self.state.loading().set(false);
            return;
        }
        log::info!("initializing novel {} chapter {}", novel_id, chapter_id);

        self.state.novel_id().set(novel_id);
        self.state.chapter_id().set(chapter_id);

        let token = self.generations.begin(RequestFamily::Initialization);
        let _loading = LoadingGuard::hold(self.state, self.generations, token);
        store_clear_error(&self.state);

        let (list, content) = join(
            self.load_chapters_list(novel_id, FetchScope::Initialization),
            self.load_chapter_content(chapter_id, FetchScope::Initialization),
        )
        .await;
        if !self.generations.is_current(token) {
            return;
        }

        // Reported after both settle, list first, so completion order does not matter.
        match (list, content) {
            (Some(Err(err)), _) | (_, Some(Err(err))) => self.fail(err),
            (Some(Ok(chapters)), _) if chapters.is_empty() => self.fail(ReaderError::Initialization),
            _ => {}
        }
        self.refresh_branches().await;
    }

    /// Start over for a freshly mounted reader page: drop whatever the last
    /// visit left behind, then initialize.
    pub async fn open(&self, novel_id: Identifier, chapter_id: Identifier) {
        self.generations.supersede_all();
        self.state.set(ReaderState::new(novel_id, chapter_id));
        self.initialize_chapter_data(novel_id, chapter_id).await;
    }

    // ========================
    // Transitions
    // ========================

    pub async fn go_to_chapter(&self, target: Option<u32>) {
        let novel_id = self.state.novel_id().get_untracked();
        let Some(target) = target.filter(|_| novel_id.is_valid()) else {
            self.fail(ReaderError::InvalidNavigation);
            return;
        };
        if let Err(err) = self.navigator.get_value().push(&chapter_path(novel_id, target)).await {
            self.fail(ReaderError::Navigation(err));
        }
    }

    /// Back to the novel's detail page, or home without a valid novel.
    pub async fn go_back(&self) {
        let novel_id = self.state.novel_id().get_untracked();
        let path = if novel_id.is_valid() {
            novel_path(novel_id)
        } else {
            ROOT_PATH.to_string()
        };
        if let Err(err) = self.navigator.get_value().push(&path).await {
            self.fail(ReaderError::Navigation(err));
        }
    }
}
