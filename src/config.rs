//! Build-time Configuration
//!
//! Auth service endpoint and key come from the environment at compile time,
//! the same way the bundler injects them for a static site.

/// Latency of the mocked chapter endpoints, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub chapter_list_ms: u32,
    pub chapter_content_ms: u32,
    pub branch_chapters_ms: u32,
}

impl MockLatency {
    pub const fn none() -> Self {
        Self {
            chapter_list_ms: 0,
            chapter_content_ms: 0,
            branch_chapters_ms: 0,
        }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            chapter_list_ms: 200,
            chapter_content_ms: 300,
            branch_chapters_ms: 250,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub latency: MockLatency,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("SUPABASE_URL"), option_env!("SUPABASE_ANON_KEY"))
    }

    fn from_values(url: Option<&str>, anon_key: Option<&str>) -> Self {
        Self {
            supabase_url: url.unwrap_or_default().trim_end_matches('/').to_string(),
            supabase_anon_key: anon_key.unwrap_or_default().to_string(),
            latency: MockLatency::default(),
        }
    }

    /// Whether an auth endpoint was configured at build time
    pub fn has_auth(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }
}
