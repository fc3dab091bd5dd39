//! Request Generations
//!
//! Fetches are not cancelled when the route moves on. Instead every fetch
//! family keeps a monotonic generation; a response carrying an older
//! generation is dropped on arrival.

use leptos::prelude::*;

use crate::store::{ReaderStateStoreFields, ReaderStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestFamily {
    ChapterList,
    ChapterContent,
    BranchChapters,
    Initialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RequestToken {
    family: RequestFamily,
    generation: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    generation: u64,
    /// Generation currently responsible for clearing `loading`
    loading_holder: Option<u64>,
}

#[derive(Clone, Copy)]
pub(crate) struct RequestGenerations {
    list: StoredValue<Slot>,
    content: StoredValue<Slot>,
    branches: StoredValue<Slot>,
    init: StoredValue<Slot>,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self {
            list: StoredValue::new(Slot::default()),
            content: StoredValue::new(Slot::default()),
            branches: StoredValue::new(Slot::default()),
            init: StoredValue::new(Slot::default()),
        }
    }

    fn slot(&self, family: RequestFamily) -> StoredValue<Slot> {
        match family {
            RequestFamily::ChapterList => self.list,
            RequestFamily::ChapterContent => self.content,
            RequestFamily::BranchChapters => self.branches,
            RequestFamily::Initialization => self.init,
        }
    }

    /// Start a request, superseding every earlier one of the same family.
    pub fn begin(&self, family: RequestFamily) -> RequestToken {
        let slot = self.slot(family);
        slot.update_value(|s| s.generation += 1);
        RequestToken {
            family,
            generation: slot.with_value(|s| s.generation),
        }
    }

    /// Outdate every in-flight request and release the loading flag they hold.
    pub fn supersede_all(&self) {
        for slot in [self.list, self.content, self.branches, self.init] {
            slot.update_value(|s| {
                s.generation += 1;
                s.loading_holder = None;
            });
        }
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.slot(token.family).with_value(|s| s.generation == token.generation)
    }
}

/// Sets `loading` for the lifetime of a request and clears it on every exit
/// path, including the future being dropped mid-flight. A superseded request
/// leaves the flag to whichever request took it over.
pub(crate) struct LoadingGuard {
    state: ReaderStore,
    generations: RequestGenerations,
    token: RequestToken,
}

impl LoadingGuard {
    pub fn hold(state: ReaderStore, generations: RequestGenerations, token: RequestToken) -> Self {
        generations
            .slot(token.family)
            .update_value(|s| s.loading_holder = Some(token.generation));
        state.loading().set(true);
        Self {
            state,
            generations,
            token,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let slot = self.generations.slot(self.token.family);
        let still_holder = slot.with_value(|s| s.loading_holder == Some(self.token.generation));
        if still_holder {
            slot.update_value(|s| s.loading_holder = None);
            self.state.loading().set(false);
        }
    }
}
