// Viewport helpers: responsive breakpoint, page scroll position and scroll-to-top.
use crate::config::AppConfig;
use dioxus::prelude::*;
use serde::Deserialize;

#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, ScrollBehavior, ScrollToOptions};

#[cfg(not(target_arch = "wasm32"))]
use crate::components::webview::{delay_ms, eval_json, run_script};

/// Window size and scroll offset as last observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Viewport {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub scroll_y: f64,
}

impl Viewport {
    pub fn is_mobile(&self, config: &AppConfig) -> bool {
        self.width.is_some_and(|width| config.is_mobile_width(width))
    }

    pub fn scrolled_past(&self, threshold: f64) -> bool {
        self.scroll_y > threshold
    }
}

#[cfg(target_arch = "wasm32")]
fn read_viewport() -> Viewport {
    let win = window();
    Viewport {
        width: win.as_ref().and_then(|w| w.inner_width().ok()?.as_f64()),
        scroll_y: win.and_then(|w| w.scroll_y().ok()).unwrap_or(0.0),
    }
}

#[cfg(target_arch = "wasm32")]
fn smooth_top() -> ScrollToOptions {
    let options = ScrollToOptions::new();
    options.set_top(0.0);
    options.set_behavior(ScrollBehavior::Smooth);
    options
}

#[cfg(target_arch = "wasm32")]
pub fn scroll_window_to_top() {
    if let Some(win) = window() {
        win.scroll_to_with_scroll_to_options(&smooth_top());
    }
}

/// Scroll an overflow container back to its first row.
#[cfg(target_arch = "wasm32")]
pub fn scroll_container_to_top(element_id: &str) {
    let container = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(element_id));
    if let Some(container) = container {
        container.scroll_to_with_scroll_to_options(&smooth_top());
    }
}

#[cfg(not(target_arch = "wasm32"))]
const VIEWPORT_POLL_MS: u64 = 250;

#[cfg(not(target_arch = "wasm32"))]
const READ_VIEWPORT_JS: &str =
    r#"return { width: window.innerWidth, scroll_y: window.scrollY || 0 };"#;

#[cfg(not(target_arch = "wasm32"))]
pub fn scroll_window_to_top() {
    run_script(r#"window.scrollTo({ top: 0, behavior: "smooth" });"#);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn scroll_container_to_top(element_id: &str) {
    let script = format!(
        r#"(function () {{
            const container = document.getElementById("{element_id}");
            if (container) container.scrollTo({{ top: 0, behavior: "smooth" }});
        }})();"#
    );
    run_script(&script);
}

/// Run `handler` on every `event` fired at the window while the component is mounted.
#[cfg(target_arch = "wasm32")]
fn use_window_listener(event: &'static str, handler: impl FnMut() + 'static) {
    let listener = use_hook(move || {
        let runtime = Runtime::current();
        let mut handler = handler;
        let callback = Closure::wrap(Box::new(move || {
            let _guard = RuntimeGuard::new(runtime.clone());
            handler();
        }) as Box<dyn FnMut()>);
        if let Some(win) = window() {
            let _ = win.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
        }
        Rc::new(callback)
    });

    use_drop(move || {
        if let Some(win) = window() {
            let _ = win.remove_event_listener_with_callback(
                event,
                (*listener).as_ref().unchecked_ref(),
            );
        }
    });
}

/// Current viewport, refreshed on resize and scroll.
#[cfg(target_arch = "wasm32")]
pub fn use_viewport() -> Signal<Viewport> {
    let viewport = use_signal(read_viewport);

    let refresh = move || {
        let mut viewport = viewport;
        let latest = read_viewport();
        if *viewport.peek() != latest {
            viewport.set(latest);
        }
    };
    use_window_listener("resize", refresh);
    use_window_listener("scroll", refresh);

    viewport
}

/// Current viewport, polled from the webview page.
#[cfg(not(target_arch = "wasm32"))]
pub fn use_viewport() -> Signal<Viewport> {
    let viewport = use_signal(Viewport::default);

    use_hook(move || {
        spawn(async move {
            let mut viewport = viewport;
            loop {
                if let Some(latest) = eval_json::<Viewport>(READ_VIEWPORT_JS).await {
                    if *viewport.peek() != latest {
                        viewport.set(latest);
                    }
                }
                if !delay_ms(VIEWPORT_POLL_MS).await {
                    break;
                }
            }
        });
    });

    viewport
}

/// Whether the viewport is below the mobile breakpoint. Only changes when the
/// breakpoint is crossed, not on every resize or scroll.
pub fn use_is_mobile(config: &AppConfig, viewport: Signal<Viewport>) -> Memo<bool> {
    let config = config.clone();
    use_memo(move || viewport.read().is_mobile(&config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webview_reading_decodes() {
        let viewport: Viewport =
            serde_json::from_str(r#"{"width":390,"scroll_y":5120.5}"#).unwrap();
        assert_eq!(viewport.width, Some(390.0));
        assert!(viewport.scrolled_past(5000.0));
    }

    #[test]
    fn narrow_width_is_mobile() {
        let config = AppConfig::default();
        let phone = Viewport {
            width: Some(390.0),
            scroll_y: 0.0,
        };
        let laptop = Viewport {
            width: Some(1280.0),
            scroll_y: 0.0,
        };
        assert!(phone.is_mobile(&config));
        assert!(!laptop.is_mobile(&config));
    }

    #[test]
    fn unknown_width_renders_desktop_layout() {
        assert!(!Viewport::default().is_mobile(&AppConfig::default()));
    }
}
