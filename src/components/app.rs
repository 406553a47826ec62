use crate::api::{EquranClient, SurahProvider};
use crate::components::layout::{use_is_mobile, use_viewport};
use crate::components::{
    use_verse_player_provider, DesktopDetailPanel, Icon, MobileSurahPopup, ScrollToTopButton,
    SurahList,
};
use crate::config::AppConfig;
use crate::reader::ReaderState;
use dioxus::prelude::*;

#[component]
pub fn ReaderApp() -> Element {
    let config = use_context_provider(AppConfig::from_build_env);
    let mut reader = use_signal(ReaderState::default);
    let mut dark_mode = use_signal(|| false);
    let viewport = use_viewport();
    let is_mobile = use_is_mobile(&config, viewport);
    let player = use_verse_player_provider();
    let client = use_hook(|| EquranClient::new(&config));

    // Provide state via context
    use_context_provider(|| reader);
    use_context_provider(|| viewport);

    // Load the chapter list once on mount
    {
        let client = client.clone();
        use_hook(move || {
            spawn(async move {
                let result = client.list_chapters().await;
                reader.write().apply_chapter_list(result);
            });
        });
    }

    let on_select = move |chapter_id: u32| {
        let ticket = reader
            .write()
            .begin_detail_request(chapter_id, || player.reset());
        let client = client.clone();
        spawn(async move {
            let result = client.get_chapter_detail(ticket.chapter_id).await;
            let mobile = *is_mobile.peek();
            reader.write().apply_detail(ticket, result, mobile);
        });
    };

    let dark = dark_mode();
    let mobile = is_mobile();
    let show_popup = mobile && reader.read().show_mobile_detail;
    let search_query = reader.read().search_query.clone();
    let theme = if dark {
        "dark bg-gray-900 text-white"
    } else {
        "bg-gray-50 text-gray-900"
    };
    let header_tone = if dark { "bg-gray-800" } else { "bg-white" };
    let input_tone = if dark {
        "bg-gray-800 border-gray-700"
    } else {
        "bg-white border-gray-300"
    };

    rsx! {
        div { class: "min-h-screen {theme}",
            header { class: "fixed w-full top-0 z-50 {header_tone} shadow-md",
                div { class: "container mx-auto px-4 py-4 flex items-center justify-between",
                    div { class: "flex items-center space-x-2",
                        Icon { name: "book".to_string(), class: "w-8 h-8".to_string() }
                        h1 { class: "text-2xl font-bold", "eAl-Qur'an" }
                    }
                    button {
                        class: "p-2 rounded-full hover:bg-gray-200 dark:hover:bg-gray-700",
                        aria_label: "Toggle theme",
                        onclick: move |_| dark_mode.toggle(),
                        if dark {
                            Icon { name: "sun".to_string(), class: "w-6 h-6".to_string() }
                        } else {
                            Icon { name: "moon".to_string(), class: "w-6 h-6".to_string() }
                        }
                    }
                }
            }

            ScrollToTopButton { threshold: config.scroll_to_top_threshold_px }

            div { class: "container mx-auto px-4 pt-24 pb-8",
                div { class: "max-w-xl mx-auto mb-8",
                    div { class: "relative",
                        Icon {
                            name: "search".to_string(),
                            class: "absolute left-3 top-1/2 -translate-y-1/2 w-5 h-5 text-gray-400".to_string(),
                        }
                        input {
                            r#type: "text",
                            class: "w-full pl-10 pr-4 py-2 rounded-lg {input_tone} border focus:outline-none focus:ring-2 focus:ring-blue-500/50",
                            placeholder: "Search Surah...",
                            value: "{search_query}",
                            oninput: move |e| reader.write().search_query = e.value(),
                        }
                    }
                }

                div { class: "grid grid-cols-1 md:grid-cols-12 gap-8",
                    SurahList { dark_mode: dark, on_select }
                    if !mobile {
                        DesktopDetailPanel { dark_mode: dark }
                    }
                }
            }

            if show_popup {
                MobileSurahPopup { on_close: move |_| reader.write().close_mobile_detail() }
            }
        }
    }
}
