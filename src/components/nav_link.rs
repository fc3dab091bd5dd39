//! In-app link that navigates through the history API instead of reloading.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app;

#[component]
pub fn NavLink(
    #[prop(into)] href: String,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let ctx = use_app();
    let target = href.clone();

    let follow = move |ev: web_sys::MouseEvent| {
        // Let the browser handle new-tab / new-window clicks.
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() {
            return;
        }
        ev.prevent_default();
        let ctx = ctx.clone();
        let target = target.clone();
        spawn_local(async move {
            ctx.navigate(&target).await;
        });
    };

    view! {
        <a href=href class=class on:click=follow>
            {children()}
        </a>
    }
}
