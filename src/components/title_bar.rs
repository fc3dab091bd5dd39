//! Title Bar Component
//!
//! App name on the left, account controls on the right.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::NavLink;
use crate::context::use_app;
use crate::router::{ACCOUNT_PATH, LOGIN_PATH, ROOT_PATH};

#[component]
pub fn TitleBar() -> impl IntoView {
    let ctx = use_app();
    let auth = ctx.auth;

    let sign_out = move |_| {
        let ctx = ctx.clone();
        spawn_local(async move {
            if auth.sign_out().await.is_ok() {
                ctx.navigate(ROOT_PATH).await;
            }
        });
    };

    view! {
        <header class="titlebar">
            <NavLink href=ROOT_PATH class="titlebar-title">"小说阅读"</NavLink>
            <div class="titlebar-controls">
                <Show
                    when=move || auth.is_authenticated()
                    fallback=|| view! { <NavLink href=LOGIN_PATH class="titlebar-btn">"登录"</NavLink> }
                >
                    <NavLink href=ACCOUNT_PATH class="titlebar-user">{move || auth.user_name()}</NavLink>
                    <button
                        class="titlebar-btn"
                        disabled=move || auth.is_loading()
                        on:click=sign_out.clone()
                    >
                        "退出"
                    </button>
                </Show>
            </div>
        </header>
    }
}
