//! Reader Settings Panel

use leptos::prelude::*;

use crate::context::use_app;
use crate::settings::{ReaderSettingsStoreFields, BG_COLORS, MAX_FONT_SIZE, MIN_FONT_SIZE};

const LINE_HEIGHTS: [f32; 4] = [1.5, 1.8, 2.0, 2.4];

#[component]
pub fn SettingsPanel() -> impl IntoView {
    let settings = use_app().settings;
    let store = settings.store();

    let step_font = move |delta: i32| {
        let current = store.font_size().get_untracked() as i32;
        let next = (current + delta).clamp(MIN_FONT_SIZE as i32, MAX_FONT_SIZE as i32);
        settings.update_font_size(next as u32);
    };

    view! {
        <div class="settings-panel">
            <div class="settings-row">
                <span class="settings-label">"字号"</span>
                <button
                    class="settings-btn"
                    disabled=move || store.font_size().get() <= MIN_FONT_SIZE
                    on:click=move |_| step_font(-1)
                >
                    "A-"
                </button>
                <span class="settings-value">{move || store.font_size().get()}</span>
                <button
                    class="settings-btn"
                    disabled=move || store.font_size().get() >= MAX_FONT_SIZE
                    on:click=move |_| step_font(1)
                >
                    "A+"
                </button>
            </div>

            <div class="settings-row">
                <span class="settings-label">"行距"</span>
                {LINE_HEIGHTS.iter().map(|height| {
                    let height = *height;
                    view! {
                        <button
                            class=move || if store.line_height().get() == height { "settings-btn active" } else { "settings-btn" }
                            on:click=move |_| settings.update_line_height(height)
                        >
                            {height.to_string()}
                        </button>
                    }
                }).collect_view()}
            </div>

            <div class="settings-row">
                <span class="settings-label">"背景"</span>
                {BG_COLORS.iter().map(|color| {
                    let color = *color;
                    view! {
                        <button
                            class=move || if store.background_color().get() == color { "color-swatch active" } else { "color-swatch" }
                            style=format!("background-color: {};", color)
                            title=color
                            disabled=move || store.night_mode().get()
                            on:click=move |_| settings.update_bg_color(color)
                        ></button>
                    }
                }).collect_view()}
            </div>

            <div class="settings-row">
                <span class="settings-label">"夜间模式"</span>
                <button
                    class=move || if store.night_mode().get() { "settings-btn active" } else { "settings-btn" }
                    on:click=move |_| settings.toggle_night_mode()
                >
                    {move || if store.night_mode().get() { "开" } else { "关" }}
                </button>
            </div>
        </div>
    }
}
