//! Application Context
//!
//! Shared services provided via Leptos Context API.

use std::sync::Arc;

use leptos::prelude::*;

use crate::api::{ChapterSource, MockChapterSource, SupabaseAuth};
use crate::auth::AuthStore;
use crate::config::AppConfig;
use crate::ids::Identifier;
use crate::navigation::ChapterNavigation;
use crate::router::BrowserNavigator;
use crate::settings::SettingsModel;

/// App-wide services provided via context
#[derive(Clone)]
pub struct AppContext {
    /// History navigator; its location drives which page renders
    pub navigator: BrowserNavigator,
    /// Where chapters and branches come from
    pub source: Arc<dyn ChapterSource>,
    pub auth: AuthStore,
    /// Reader view model; outlives the reader page so chapter switches stay incremental
    pub reader: ChapterNavigation,
    /// Reader display settings, kept across chapter pages
    pub settings: SettingsModel,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Self {
        if !config.has_auth() {
            log::warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set at build time, sign-in will fail");
        }
        let backend = SupabaseAuth::new(config.supabase_url.clone(), config.supabase_anon_key.clone());
        let navigator = BrowserNavigator::install();
        let source: Arc<dyn ChapterSource> = Arc::new(MockChapterSource::new(config.latency));
        let reader = ChapterNavigation::new(
            Identifier::INVALID,
            Identifier::INVALID,
            source.clone(),
            Arc::new(navigator),
        );
        Self {
            navigator,
            source,
            auth: AuthStore::new(Arc::new(backend)),
            reader,
            settings: SettingsModel::new(),
        }
    }

    /// Current location path
    pub fn location(&self) -> String {
        self.navigator.location().get()
    }

    /// Push a path, logging instead of surfacing failures.
    pub async fn navigate(&self, path: &str) {
        use crate::router::Navigator;
        if let Err(err) = self.navigator.push(path).await {
            log::error!("{}", err);
        }
    }
}

/// Fetch the context provided by `App`.
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
