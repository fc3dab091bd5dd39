//! Reader Frontend App
//!
//! Root component: provides the shared context and picks the page from the
//! current location.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{AccountView, HomeView, LoginForm, NavLink, NovelDetail, ReaderView, TitleBar};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::router::{Route, ROOT_PATH};

/// Which page is mounted. Reader params are left out so chapter changes
/// keep the reader mounted and go through its route reactor.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Page {
    Home,
    Login,
    Account,
    NovelDetail(String),
    Reader,
    NotFound,
}

impl From<Route> for Page {
    fn from(route: Route) -> Self {
        match route {
            Route::Home => Page::Home,
            Route::Login => Page::Login,
            Route::Account => Page::Account,
            Route::NovelDetail { novel_id } => Page::NovelDetail(novel_id),
            Route::Reader { .. } => Page::Reader,
            Route::NotFound => Page::NotFound,
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_build_env();
    let ctx = AppContext::new(&config);
    provide_context(ctx.clone());

    // Restore the signed-in user, if any.
    let auth = ctx.auth;
    spawn_local(async move {
        if let Ok(Some(user)) = auth.get_current_user().await {
            log::info!("restored session for {}", user.id);
        }
    });

    let location = ctx.navigator.location();
    let page = Memo::new(move |_| Page::from(Route::parse(&location.get())));

    view! {
        <div class="app-layout">
            <TitleBar />
            {move || match page.get() {
                Page::Home => view! { <HomeView /> }.into_any(),
                Page::Login => view! { <LoginForm /> }.into_any(),
                Page::Account => view! { <AccountView /> }.into_any(),
                Page::NovelDetail(novel_id) => view! { <NovelDetail novel_id=novel_id /> }.into_any(),
                Page::Reader => view! { <ReaderView /> }.into_any(),
                Page::NotFound => view! {
                    <main class="not-found">
                        <h1>"页面不存在"</h1>
                        <NavLink href=ROOT_PATH>"返回首页"</NavLink>
                    </main>
                }.into_any(),
            }}
        </div>
    }
}
