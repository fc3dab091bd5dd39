//! Home Page
//!
//! Entry list of the novels the mock source knows about.

use leptos::prelude::*;

use crate::api::SYNTHETIC_NOVEL_ID;
use crate::components::NavLink;
use crate::ids::Identifier;
use crate::router::novel_path;

const NOVELS: &[(i64, &str, &str)] = &[
    (1, "示例小说一", "固定内容的演示章节"),
    (2, "示例小说二", "固定内容的演示章节"),
    (SYNTHETIC_NOVEL_ID, "随机章节", "每章由章节号生成标题与正文"),
];

#[component]
pub fn HomeView() -> impl IntoView {
    view! {
        <main class="home">
            <h1>"书库"</h1>
            <ul class="novel-list">
                {NOVELS.iter().map(|(id, title, blurb)| {
                    view! {
                        <li class="novel-card">
                            <NavLink href=novel_path(Identifier::new(*id))>
                                <span class="novel-title">{*title}</span>
                            </NavLink>
                            <p class="novel-blurb">{*blurb}</p>
                        </li>
                    }
                }).collect_view()}
            </ul>
        </main>
    }
}
