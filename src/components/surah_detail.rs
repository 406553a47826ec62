// Chapter detail shared by the desktop panel and the mobile popup.
use crate::api::{ChapterDetail, Verse};
use crate::components::audio_manager::verse_anchor_id;
use crate::components::{Icon, VersePlayer};
use crate::config::AppConfig;
use crate::reader::ReaderState;
use dioxus::prelude::*;

/// Desktop inline panel next to the chapter list.
#[component]
pub fn DesktopDetailPanel(dark_mode: bool) -> Element {
    let reader = use_context::<Signal<ReaderState>>();
    let (loading, selected) = {
        let state = reader.read();
        (state.loading_detail, state.selected.clone())
    };
    let panel = if dark_mode { "bg-gray-800" } else { "bg-white" };

    rsx! {
        div { class: "md:col-span-8 lg:col-span-9 {panel} rounded-lg shadow-lg p-6",
            if loading {
                DetailSkeleton {}
            } else if let Some(detail) = selected {
                ChapterBody { detail }
            } else {
                div { class: "text-center",
                    Icon {
                        name: "book".to_string(),
                        class: "w-16 h-16 mx-auto mb-4 opacity-50".to_string(),
                    }
                    h3 { class: "text-xl font-semibold mb-2", "Select a Surah" }
                    p { class: "opacity-75", "Choose a Surah from the list to start reading" }
                }
            }
        }
    }
}

#[component]
fn DetailSkeleton() -> Element {
    rsx! {
        div { class: "flex flex-col items-center gap-3 animate-pulse",
            div { class: "h-10 w-[200px] rounded bg-gray-200 dark:bg-gray-700" }
            div { class: "h-[30px] w-[300px] rounded bg-gray-200 dark:bg-gray-700" }
            div { class: "h-[60px] w-full rounded bg-gray-200 dark:bg-gray-700" }
        }
    }
}

/// Title, full recitation, description and verses of one chapter.
#[component]
pub fn ChapterBody(detail: ChapterDetail) -> Element {
    let config = use_context::<AppConfig>();
    let full_audio = detail.full_audio_url(&config.reciter).map(str::to_string);
    let description = detail.description_text();

    rsx! {
        div {
            div { class: "text-center mb-6",
                h2 { class: "text-3xl font-bold mb-2",
                    "{detail.native_name} • {detail.latin_name}"
                }
                p { class: "text-lg opacity-75 mb-4", "{detail.meaning}" }
                if let Some(url) = full_audio {
                    div { class: "p-4 rounded-lg bg-gray-100 dark:bg-gray-700 flex items-center justify-center space-x-2",
                        Icon { name: "volume".to_string(), class: "w-5 h-5".to_string() }
                        audio {
                            class: "w-full max-w-md",
                            controls: true,
                            preload: "none",
                            src: "{url}",
                        }
                    }
                }
            }

            p { class: "mb-4 text-justify", "{description}" }

            PlaybackErrorBanner {}

            div { class: "space-y-6",
                for verse in detail.verses.iter() {
                    VerseItem {
                        key: "{verse.verse_id}",
                        verse: verse.clone(),
                        reciter: config.reciter.clone(),
                    }
                }
            }
        }
    }
}

#[component]
fn PlaybackErrorBanner() -> Element {
    let player = use_context::<VersePlayer>();
    let Some(err) = player.last_error() else {
        return rsx! {};
    };

    rsx! {
        div { class: "p-4 mb-4 bg-red-100 text-red-700 rounded-md flex items-center",
            Icon { name: "alert".to_string(), class: "w-5 h-5 mr-2".to_string() }
            "{err}"
        }
    }
}

#[component]
fn VerseItem(verse: Verse, reciter: String) -> Element {
    let player = use_context::<VersePlayer>();
    let verse_id = verse.verse_id;
    let audio = verse.audio_ref(&reciter);
    let is_playing = player.currently_playing() == Some(verse_id);
    let has_audio = audio.is_some();
    let anchor = verse_anchor_id(verse_id);
    let label = if is_playing {
        format!("Pause verse {verse_id}")
    } else {
        format!("Play verse {verse_id}")
    };

    rsx! {
        div {
            id: "{anchor}",
            class: "p-4 border rounded-lg shadow-sm transition hover:bg-gray-100 dark:hover:bg-gray-700",
            onmounted: move |evt: MountedEvent| player.register_scroll_target(verse_id, evt.data()),
            div { class: "flex justify-between items-center mb-2",
                span { class: "font-semibold text-lg", "{verse_id}." }
                button {
                    aria_label: "{label}",
                    disabled: !has_audio,
                    onclick: move |_| {
                        if let Some(audio) = &audio {
                            player.toggle(audio);
                        }
                    },
                    if is_playing {
                        Icon { name: "volume".to_string(), class: "w-5 h-5 text-blue-500".to_string() }
                    } else {
                        Icon { name: "play".to_string(), class: "w-5 h-5 text-blue-500".to_string() }
                    }
                }
            }
            p { class: "text-right text-2xl font-arabic mb-2", dir: "rtl", "{verse.arabic_text}" }
            p { class: "italic", "{verse.latin_transliteration}" }
            p { class: "mt-2", "{verse.translation}" }
        }
    }
}
