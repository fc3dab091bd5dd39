//! Backend Seams
//!
//! Chapter data and authentication, each behind a trait so the view models
//! can run against the mock source, the hosted auth service, or test fakes.

mod auth;
mod chapters;
mod synthetic;

pub use auth::*;
pub use chapters::*;
pub use synthetic::{synthetic_branch_chapters, synthetic_chapter, SYNTHETIC_NOVEL_ID};

/// Sleep for a simulated round trip. Only the browser build actually waits.
pub(crate) async fn simulate_latency(ms: u32) {
    if ms == 0 {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(ms).await;
}
