//! Novel Detail Page
//!
//! Table of contents; each entry opens the reader at that chapter.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::NavLink;
use crate::context::use_app;
use crate::error::ReaderError;
use crate::ids::{Identifier, RouteParam};
use crate::router::{chapter_path, ROOT_PATH};

#[component]
pub fn NovelDetail(novel_id: String) -> impl IntoView {
    let ctx = use_app();
    let novel_id = Identifier::from_param(RouteParam::Single(&novel_id));

    let (chapters, set_chapters) = signal(Vec::<u32>::new());
    let (loading, set_loading) = signal(false);
    let (error, set_error) = signal::<Option<String>>(None);

    match novel_id.get() {
        Some(novel) => {
            set_loading.set(true);
            let source = ctx.source.clone();
            spawn_local(async move {
                match source.chapter_list(novel).await {
                    Ok(list) => set_chapters.set(list),
                    Err(err) => {
                        let err = ReaderError::ChapterListFetch(err);
                        log::error!("{}", err);
                        set_error.set(Some(err.to_string()));
                    }
                }
                set_loading.set(false);
            });
        }
        None => set_error.set(Some(ReaderError::InvalidNovel.to_string())),
    }

    view! {
        <main class="novel-detail">
            <NavLink href=ROOT_PATH class="back-link">"← 书库"</NavLink>
            <h1>{format!("小说 {}", novel_id)}</h1>
            <Show when=move || loading.get()>
                <p class="loading">"加载中..."</p>
            </Show>
            {move || error.get().map(|msg| view! { <p class="error">{msg}</p> })}
            <ol class="chapter-toc">
                <For
                    each=move || chapters.get()
                    key=|chapter| *chapter
                    children=move |chapter| view! {
                        <li>
                            <NavLink href=chapter_path(novel_id, chapter)>{format!("第{}章", chapter)}</NavLink>
                        </li>
                    }
                />
            </ol>
        </main>
    }
}
