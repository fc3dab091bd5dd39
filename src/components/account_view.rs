//! Account Page
//!
//! Profile of the signed-in user; anonymous visitors are sent to the login page.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::json;

use crate::auth::GuardDecision;
use crate::context::use_app;
use crate::models::UserUpdate;

#[component]
pub fn AccountView() -> impl IntoView {
    let ctx = use_app();
    let auth = ctx.auth;

    let guard_ctx = ctx.clone();
    Effect::new(move |_| {
        if let GuardDecision::Redirect(path) = auth.require_auth() {
            let ctx = guard_ctx.clone();
            spawn_local(async move { ctx.navigate(path).await });
        }
    });

    let (name, set_name) = signal(auth.user_name());
    let (saved, set_saved) = signal(false);

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let name = name.get().trim().to_string();
        if name.is_empty() {
            return;
        }
        set_saved.set(false);
        spawn_local(async move {
            let update = UserUpdate {
                data: Some(json!({ "name": name })),
                ..Default::default()
            };
            if auth.update_user(&update).await.is_ok() {
                set_saved.set(true);
            }
        });
    };

    view! {
        <main class="account-page">
            <h1>"账户"</h1>
            <p class="account-email">
                {move || auth.user().and_then(|user| user.email).unwrap_or_default()}
            </p>
            <form class="account-form" on:submit=save>
                <label>
                    "昵称"
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                    />
                </label>
                <button type="submit" disabled=move || auth.is_loading()>"保存"</button>
            </form>
            {move || auth.error().map(|msg| view! { <p class="error">{msg}</p> })}
            <Show when=move || saved.get()>
                <p class="notice">"已保存"</p>
            </Show>
        </main>
    }
}
