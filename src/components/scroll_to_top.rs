use crate::components::layout::{scroll_window_to_top, Viewport};
use crate::components::Icon;
use dioxus::prelude::*;

/// Floating button that appears once the page is scrolled past `threshold` pixels.
#[component]
pub fn ScrollToTopButton(threshold: f64) -> Element {
    let viewport = use_context::<Signal<Viewport>>();

    if !viewport.read().scrolled_past(threshold) {
        return rsx! {};
    }

    rsx! {
        button {
            class: "fixed bottom-6 right-6 p-3 bg-blue-500 text-white rounded-full shadow-lg hover:bg-blue-600 transition",
            aria_label: "Scroll to top",
            onclick: move |_| scroll_window_to_top(),
            Icon { name: "arrow-up".to_string(), class: "w-6 h-6".to_string() }
        }
    }
}
