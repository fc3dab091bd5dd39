//! Reader Frontend Entry Point

mod api;
mod app;
mod auth;
mod components;
mod config;
mod context;
mod error;
mod ids;
mod logging;
mod models;
mod navigation;
mod router;
mod settings;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    mount_to_body(App);
}
