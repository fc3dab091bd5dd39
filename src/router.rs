//! Page Transitions
//!
//! The reader only needs a handful of paths: where a chapter lives, where a
//! novel's detail page lives, and how to read the ids back out of a path.

use async_trait::async_trait;
use leptos::prelude::*;
use percent_encoding::percent_decode_str;

use crate::error::NavigationError;
use crate::ids::Identifier;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const ACCOUNT_PATH: &str = "/account";

pub fn novel_path(novel_id: Identifier) -> String {
    format!("/novels/{}", novel_id)
}

pub fn chapter_path(novel_id: Identifier, chapter_id: u32) -> String {
    format!("/novels/{}/read/{}", novel_id, chapter_id)
}

/// Pages the app can show, with their raw (decoded, unvalidated) params
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Account,
    NovelDetail { novel_id: String },
    Reader { novel_id: String, chapter_id: String },
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect();

        match segments.as_slice() {
            [] => Route::Home,
            [login] if login == "login" => Route::Login,
            [account] if account == "account" => Route::Account,
            [novels, id] if novels == "novels" => Route::NovelDetail { novel_id: id.clone() },
            [novels, id, read, chapter] if novels == "novels" && read == "read" => Route::Reader {
                novel_id: id.clone(),
                chapter_id: chapter.clone(),
            },
            _ => Route::NotFound,
        }
    }
}

#[async_trait(?Send)]
pub trait Navigator: Send + Sync {
    /// Transition to `path`
    async fn push(&self, path: &str) -> Result<(), NavigationError>;
}

/// History-API navigator; the current path is exposed as a signal so views
/// and the route reactor can follow it.
#[derive(Clone, Copy)]
pub struct BrowserNavigator {
    location: RwSignal<String>,
}

impl BrowserNavigator {
    /// Read the initial path and follow back/forward buttons.
    pub fn install() -> Self {
        use wasm_bindgen::prelude::*;
        use wasm_bindgen::JsCast;

        let location = RwSignal::new(current_pathname().unwrap_or_else(|| ROOT_PATH.to_string()));

        if let Some(window) = web_sys::window() {
            let on_pop = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                if let Some(path) = current_pathname() {
                    log::debug!("popstate -> {}", path);
                    location.set(path);
                }
            });
            if window
                .add_event_listener_with_callback("popstate", on_pop.as_ref().unchecked_ref())
                .is_err()
            {
                log::warn!("could not listen for popstate");
            }
            // Lives as long as the page.
            on_pop.forget();
        }

        Self { location }
    }

    pub fn location(&self) -> ReadSignal<String> {
        self.location.read_only()
    }
}

fn current_pathname() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

#[async_trait(?Send)]
impl Navigator for BrowserNavigator {
    async fn push(&self, path: &str) -> Result<(), NavigationError> {
        let fail = |reason: String| NavigationError {
            path: path.to_string(),
            reason,
        };
        let window = web_sys::window().ok_or_else(|| fail("no window".to_string()))?;
        let history = window.history().map_err(|e| fail(format!("{:?}", e)))?;
        history
            .push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path))
            .map_err(|e| fail(format!("{:?}", e)))?;
        log::debug!("navigated to {}", path);
        self.location.set(path.to_string());
        Ok(())
    }
}
