//! Login Page
//!
//! Sign in, sign up and password reset share one form; signed-in users are
//! sent home.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::GuardDecision;
use crate::context::use_app;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMode {
    SignIn,
    SignUp,
    Reset,
}

impl FormMode {
    fn title(self) -> &'static str {
        match self {
            FormMode::SignIn => "登录",
            FormMode::SignUp => "注册",
            FormMode::Reset => "找回密码",
        }
    }
}

/// Where the guard sends this page, if anywhere. A sign-up that still needs
/// email confirmation stays put so its notice is seen.
fn guest_redirect(decision: GuardDecision, awaiting_confirmation: bool) -> Option<&'static str> {
    match decision {
        GuardDecision::Redirect(path) if !awaiting_confirmation => Some(path),
        _ => None,
    }
}

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app();
    let auth = ctx.auth;

    let (mode, set_mode) = signal(FormMode::SignIn);
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (notice, set_notice) = signal::<Option<&'static str>>(None);
    let (awaiting_confirmation, set_awaiting_confirmation) = signal(false);

    // Follows the user signal, so a successful sign-in redirects too.
    let guard_ctx = ctx.clone();
    Effect::new(move |_| {
        if let Some(path) = guest_redirect(auth.require_guest(), awaiting_confirmation.get()) {
            let ctx = guard_ctx.clone();
            spawn_local(async move { ctx.navigate(path).await });
        }
    });

    let switch_mode = move |next: FormMode| {
        auth.clear_error();
        set_notice.set(None);
        set_awaiting_confirmation.set(false);
        set_mode.set(next);
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let email = email.get().trim().to_string();
        let password = password.get();
        if email.is_empty() {
            return;
        }
        set_notice.set(None);
        let mode = mode.get();

        spawn_local(async move {
            match mode {
                FormMode::SignIn => {
                    let _ = auth.sign_in(&email, &password).await;
                }
                FormMode::SignUp => {
                    // Set before the call: the store gains the unconfirmed user first.
                    set_awaiting_confirmation.set(true);
                    let pending = match auth.sign_up(&email, &password).await {
                        Ok(response) => response.session.is_none(),
                        Err(_) => false,
                    };
                    if pending {
                        set_notice.set(Some("注册成功，请查收确认邮件"));
                    }
                    set_awaiting_confirmation.set(pending);
                }
                FormMode::Reset => {
                    if auth.reset_password(&email).await.is_ok() {
                        set_notice.set(Some("重置邮件已发送，请查收"));
                    }
                }
            }
        });
    };

    view! {
        <main class="login-page">
            <form class="login-form" on:submit=submit>
                <h1>{move || mode.get().title()}</h1>

                <input
                    type="email"
                    placeholder="邮箱"
                    prop:value=move || email.get()
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <Show when=move || mode.get() != FormMode::Reset>
                    <input
                        type="password"
                        placeholder="密码"
                        prop:value=move || password.get()
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                    />
                </Show>

                {move || auth.error().map(|msg| view! { <p class="error">{msg}</p> })}
                {move || notice.get().map(|msg| view! { <p class="notice">{msg}</p> })}

                <button type="submit" disabled=move || auth.is_loading()>
                    {move || if auth.is_loading() { "请稍候..." } else { mode.get().title() }}
                </button>

                <div class="login-links">
                    <Show
                        when=move || mode.get() == FormMode::SignIn
                        fallback=move || view! {
                            <button type="button" class="link-btn" on:click=move |_| switch_mode(FormMode::SignIn)>
                                "返回登录"
                            </button>
                        }
                    >
                        <button type="button" class="link-btn" on:click=move |_| switch_mode(FormMode::SignUp)>
                            "没有账号？注册"
                        </button>
                        <button type="button" class="link-btn" on:click=move |_| switch_mode(FormMode::Reset)>
                            "忘记密码"
                        </button>
                    </Show>
                </div>
            </form>
        </main>
    }
}
