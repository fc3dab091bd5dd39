//! Reader Display Settings
//!
//! Font size, line height, page colour and night mode for the reader page.

use leptos::prelude::*;
use reactive_stores::Store;

/// Page colours offered in the settings panel
pub const BG_COLORS: [&str; 4] = ["#ffffff", "#f4ecd8", "#cce8cf", "#e6e6e6"];
pub const NIGHT_BACKGROUND: &str = "#1a1a1a";

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 32;

#[derive(Clone, Debug, PartialEq, Store)]
pub struct ReaderSettings {
    pub show_settings: bool,
    pub night_mode: bool,
    /// Pixels
    pub font_size: u32,
    pub line_height: f32,
    pub background_color: String,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            show_settings: false,
            night_mode: false,
            font_size: 16,
            line_height: 1.8,
            background_color: BG_COLORS[0].to_string(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct SettingsModel {
    store: Store<ReaderSettings>,
}

impl SettingsModel {
    pub fn new() -> Self {
        Self {
            store: Store::new(ReaderSettings::default()),
        }
    }

    pub fn store(&self) -> Store<ReaderSettings> {
        self.store
    }

    pub fn toggle_settings(&self) {
        self.store.show_settings().update(|shown| *shown = !*shown);
    }

    pub fn toggle_night_mode(&self) {
        self.store.night_mode().update(|night| *night = !*night);
    }

    pub fn update_font_size(&self, size: u32) {
        self.store.font_size().set(size);
    }

    pub fn update_line_height(&self, height: f32) {
        self.store.line_height().set(height);
    }

    pub fn update_bg_color(&self, color: impl Into<String>) {
        self.store.background_color().set(color.into());
    }

    /// CSS custom properties consumed by the reader stylesheet
    pub fn content_style(&self) -> String {
        format!(
            "--reader-font-size: {}px; --reader-line-height: {};",
            self.store.font_size().get(),
            self.store.line_height().get()
        )
    }

    /// Night mode overrides the chosen page colour
    pub fn page_background(&self) -> String {
        if self.store.night_mode().get() {
            NIGHT_BACKGROUND.to_string()
        } else {
            self.store.background_color().get()
        }
    }
}
