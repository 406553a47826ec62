use crate::api::ChapterSummary;
use crate::components::Icon;
use crate::reader::ReaderState;
use dioxus::prelude::*;

const SKELETON_ROWS: usize = 10;

#[component]
pub fn SurahList(dark_mode: bool, on_select: EventHandler<u32>) -> Element {
    let reader = use_context::<Signal<ReaderState>>();
    let (chapters, selected_id, error, loading) = {
        let state = reader.read();
        (
            state.filtered_chapters(),
            state.selected_chapter_id(),
            state.error.clone(),
            state.loading_chapters,
        )
    };

    let panel = if dark_mode { "bg-gray-800" } else { "bg-white" };

    rsx! {
        div { class: "md:col-span-4 lg:col-span-3 {panel} rounded-lg shadow-lg p-4 h-[calc(100vh-180px)] overflow-y-auto",
            h2 { class: "text-xl font-semibold mb-4 flex items-center",
                Icon { name: "book-open".to_string(), class: "w-5 h-5 mr-2".to_string() }
                "Surah List"
            }

            if let Some(message) = error {
                div { class: "p-4 mb-2 bg-red-100 text-red-700 rounded-md flex items-center",
                    Icon { name: "alert".to_string(), class: "w-5 h-5 mr-2".to_string() }
                    "{message}"
                }
            }

            if loading {
                div { class: "space-y-2",
                    for i in 0..SKELETON_ROWS {
                        div {
                            key: "{i}",
                            class: "h-[60px] rounded-lg bg-gray-200 dark:bg-gray-700 animate-pulse",
                        }
                    }
                }
            } else {
                div { class: "space-y-2",
                    for chapter in chapters {
                        SurahRow {
                            key: "{chapter.id}",
                            chapter: chapter.clone(),
                            selected: selected_id == Some(chapter.id),
                            dark_mode,
                            onclick: move |id| on_select.call(id),
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn SurahRow(
    chapter: ChapterSummary,
    selected: bool,
    dark_mode: bool,
    onclick: EventHandler<u32>,
) -> Element {
    let tone = if selected {
        "bg-blue-500 text-white"
    } else if dark_mode {
        "hover:bg-gray-700"
    } else {
        "hover:bg-gray-100"
    };
    let chapter_id = chapter.id;

    rsx! {
        button {
            class: "w-full text-left p-4 rounded-lg transition-colors {tone}",
            onclick: move |_| onclick.call(chapter_id),
            div { class: "flex items-center justify-between",
                span { class: "font-semibold", "{chapter.latin_name}" }
                span { class: "text-sm opacity-75", "{chapter.native_name}" }
            }
            div { class: "text-sm opacity-75 mt-1",
                "{chapter.meaning} • {chapter.verse_count} verses"
            }
        }
    }
}
