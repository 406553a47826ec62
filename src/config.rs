//! Application configuration shared through the Dioxus context.

/// Public equran.id v2 endpoint.
pub const DEFAULT_API_BASE: &str = "https://equran.id/api/v2";
/// Misyari Rasyid Al-Afasy. The only reciter offered in this version.
pub const DEFAULT_RECITER: &str = "05";
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;
pub const SCROLL_TO_TOP_THRESHOLD_PX: f64 = 5000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub reciter: String,
    pub mobile_breakpoint_px: f64,
    pub scroll_to_top_threshold_px: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            reciter: DEFAULT_RECITER.to_string(),
            mobile_breakpoint_px: MOBILE_BREAKPOINT_PX,
            scroll_to_top_threshold_px: SCROLL_TO_TOP_THRESHOLD_PX,
        }
    }
}

impl AppConfig {
    /// Build the config, honoring `EQURAN_API_BASE` captured at compile time.
    /// The browser has no process environment, so the override is baked in.
    pub fn from_build_env() -> Self {
        Self::with_base_override(option_env!("EQURAN_API_BASE"))
    }

    fn with_base_override(base: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(base) = base.map(str::trim).filter(|b| !b.is_empty()) {
            config.api_base_url = base.trim_end_matches('/').to_string();
        }
        config
    }

    pub fn is_mobile_width(&self, width: f64) -> bool {
        width < self.mobile_breakpoint_px
    }
}
