//! Reader State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::ids::Identifier;
use crate::models::{BranchChapter, Chapter, SortKey, SortOrder};

/// Chapter-navigation state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct ReaderState {
    /// Novel being read, sentinel when the route carried no valid id
    pub novel_id: Identifier,
    /// Chapter being read; only meaningful with a valid novel_id
    pub chapter_id: Identifier,
    /// Shared by every fetch
    pub loading: bool,
    /// Last failure message; each failure overwrites the previous one
    pub error: Option<String>,
    pub chapter: Chapter,
    /// Chapter ids of the novel, in reading order
    pub chapters: Vec<u32>,
    pub branch_chapters: Vec<BranchChapter>,
    pub show_branch_chapters: bool,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl ReaderState {
    pub fn new(novel_id: Identifier, chapter_id: Identifier) -> Self {
        Self {
            novel_id,
            chapter_id,
            chapter: Chapter::pending(chapter_id),
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type ReaderStore = Store<ReaderState>;

// ========================
// Store Helper Functions
// ========================

pub fn store_set_error(store: &ReaderStore, message: impl Into<String>) {
    store.error().set(Some(message.into()));
}

pub fn store_clear_error(store: &ReaderStore) {
    store.error().set(None);
}

/// Keep the chapter id, swap title and paragraphs
pub fn store_replace_chapter_text(store: &ReaderStore, title: &str, content: Vec<String>) {
    store.chapter().update(|chapter| {
        chapter.title = title.to_string();
        chapter.content = content;
    });
}

/// Position of the current chapter in the chapter list
pub fn store_chapter_index(store: &ReaderStore) -> Option<usize> {
    let chapter_id = store.chapter_id().get();
    store
        .chapters()
        .with(|chapters| chapters.iter().position(|id| Identifier::from(*id) == chapter_id))
}
