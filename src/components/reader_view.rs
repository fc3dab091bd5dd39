//! Reader Page
//!
//! Chapter text with prev/next navigation, the branch panel and the display
//! settings panel. The view model lives in the app context, so in-page
//! chapter changes only refetch what changed.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{BranchPanel, SettingsPanel};
use crate::context::use_app;
use crate::ids::{Identifier, RouteParam};
use crate::router::Route;
use crate::settings::ReaderSettingsStoreFields;

#[component]
pub fn ReaderView() -> impl IntoView {
    let ctx = use_app();
    let nav = ctx.reader;
    let settings = ctx.settings;
    let location = ctx.navigator.location();

    if let Route::Reader { novel_id, chapter_id } = Route::parse(&location.get_untracked()) {
        let novel_id = Identifier::from_param(RouteParam::Single(&novel_id));
        let chapter_id = Identifier::from_param(RouteParam::Single(&chapter_id));
        spawn_local(async move { nav.open(novel_id, chapter_id).await });
    }

    // Later location changes (prev/next, history buttons) go through the reactor.
    Effect::new(move |mounted: Option<()>| {
        let path = location.get();
        if mounted.is_some() {
            spawn_local(async move { nav.on_route(&path).await });
        }
    });

    let page_style = move || format!("{} background-color: {};", settings.content_style(), settings.page_background());

    let position = move || {
        let index = nav.current_chapter_index();
        let total = nav.chapters().len();
        if index < 0 {
            String::new()
        } else {
            format!("{} / {}", index + 1, total)
        }
    };

    view! {
        <div
            class="reader"
            class:night=move || settings.store().night_mode().get()
            style=page_style
        >
            <header class="reader-header">
                <button class="icon-btn" title="返回" on:click=move |_| spawn_local(async move { nav.go_back().await })>
                    "←"
                </button>
                <h2 class="reader-title">{move || nav.chapter().title}</h2>
                <div class="reader-actions">
                    <button
                        class=move || if nav.show_branch_chapters() { "icon-btn active" } else { "icon-btn" }
                        title="分支章节"
                        on:click=move |_| spawn_local(async move { nav.toggle_branch_chapters().await })
                    >
                        "⑂"
                    </button>
                    <button class="icon-btn" title="阅读设置" on:click=move |_| settings.toggle_settings()>
                        "Aa"
                    </button>
                </div>
            </header>

            <Show when=move || settings.store().show_settings().get()>
                <SettingsPanel />
            </Show>

            {move || nav.error().map(|msg| view! { <div class="error-banner">{msg}</div> })}

            <div class="reader-body">
                <article
                    class="chapter-content"
                    class:loading=move || nav.loading()
                    class:chapter-error=move || nav.chapter().is_sentinel()
                >
                    <Show when=move || nav.loading()>
                        <div class="loading-overlay">"加载中..."</div>
                    </Show>
                    {move || nav.chapter().content.into_iter().map(|paragraph| view! { <p>{paragraph}</p> }).collect_view()}
                </article>

                <Show when=move || nav.show_branch_chapters()>
                    <BranchPanel nav=nav />
                </Show>
            </div>

            <footer class="reader-footer">
                <button
                    class="nav-btn"
                    disabled=move || !nav.has_prev_chapter()
                    on:click=move |_| spawn_local(async move { nav.go_to_chapter(nav.prev_chapter_id()).await })
                >
                    "上一章"
                </button>
                <span class="chapter-position">{position}</span>
                <button
                    class="nav-btn"
                    disabled=move || !nav.has_next_chapter()
                    on:click=move |_| spawn_local(async move { nav.go_to_chapter(nav.next_chapter_id()).await })
                >
                    "下一章"
                </button>
            </footer>
        </div>
    }
}
