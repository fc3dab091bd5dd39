//! Branch Chapter Panel
//!
//! Side panel listing alternate versions of the open chapter with sort controls.

use chrono::DateTime;
use leptos::prelude::*;

use crate::models::{SortKey, SortOrder};
use crate::navigation::ChapterNavigation;

fn format_created_at(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[component]
pub fn BranchPanel(nav: ChapterNavigation) -> impl IntoView {
    let order_label = move || match nav.sort_order() {
        SortOrder::Asc => "↑ 升序",
        SortOrder::Desc => "↓ 降序",
    };

    view! {
        <aside class="branch-panel">
            <div class="branch-panel-header">
                <h3>"分支章节"</h3>
                <button class="icon-btn" title="关闭" on:click=move |_| {
                    leptos::task::spawn_local(async move { nav.toggle_branch_chapters().await });
                }>
                    "✕"
                </button>
            </div>

            <div class="sort-row">
                {SortKey::ALL.iter().map(|key| {
                    let key = *key;
                    view! {
                        <button
                            type="button"
                            class=move || if nav.sort_key() == key { "sort-btn small active" } else { "sort-btn small" }
                            on:click=move |_| nav.set_sort_key(key)
                        >
                            {key.label()}
                        </button>
                    }
                }).collect_view()}
                <button type="button" class="sort-btn small" on:click=move |_| nav.toggle_sort_order()>
                    {order_label}
                </button>
            </div>

            <Show when=move || nav.branch_chapters().is_empty() && !nav.loading()>
                <p class="empty-hint">"暂无分支章节"</p>
            </Show>

            <ul class="branch-list">
                <For
                    each=move || nav.branch_chapters()
                    key=|branch| branch.id
                    children=|branch| view! {
                        <li class="branch-item">
                            <div class="branch-title">{branch.title}</div>
                            <div class="branch-meta">
                                <span class="branch-author">{branch.author}</span>
                                <span class="branch-time">{format_created_at(branch.created_at)}</span>
                            </div>
                            <div class="branch-tags">
                                {branch.tags.into_iter().map(|tag| view! { <span class="tag-chip">{tag}</span> }).collect_view()}
                            </div>
                        </li>
                    }
                />
            </ul>
        </aside>
    }
}
