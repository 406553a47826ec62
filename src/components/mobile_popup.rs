use crate::components::layout::scroll_container_to_top;
use crate::components::{ChapterBody, Icon};
use crate::reader::ReaderState;
use dioxus::prelude::*;

const POPUP_CONTAINER_ID: &str = "mobile-surah-popup";

/// Modal chapter view for narrow screens. Renders nothing until a chapter is loaded.
#[component]
pub fn MobileSurahPopup(on_close: EventHandler<()>) -> Element {
    let reader = use_context::<Signal<ReaderState>>();
    let selected = reader.read().selected.clone();

    let Some(detail) = selected else {
        return rsx! {};
    };

    rsx! {
        div { class: "fixed inset-0 z-40 bg-black/50 flex items-center justify-center p-4 pt-[100px] dark:text-white",
            div {
                class: "bg-white dark:bg-gray-800 rounded-lg shadow-lg w-full max-w-md max-h-[90vh] overflow-y-auto p-6 relative",
                id: POPUP_CONTAINER_ID,

                button {
                    class: "absolute top-2 right-2 p-2 rounded-full bg-gray-700 hover:bg-gray-600 transition-colors",
                    aria_label: "Close",
                    onclick: move |_| on_close.call(()),
                    Icon { name: "x".to_string(), class: "w-5 h-5 text-white".to_string() }
                }

                button {
                    class: "fixed bottom-5 right-5 p-3 rounded-full bg-blue-500 hover:bg-blue-600 transition-colors shadow-lg",
                    aria_label: "Scroll to top",
                    onclick: move |_| scroll_container_to_top(POPUP_CONTAINER_ID),
                    Icon { name: "arrow-up".to_string(), class: "w-5 h-5 text-white".to_string() }
                }

                ChapterBody { detail }
            }
        }
    }
}
