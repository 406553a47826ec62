//! The components module contains all shared components for our app.

mod app;
pub mod audio_manager;
mod icons;
mod layout;
mod mobile_popup;
mod scroll_to_top;
mod surah_detail;
mod surah_list;
#[cfg(not(target_arch = "wasm32"))]
mod webview;

pub use app::*;
pub use audio_manager::{use_verse_player_provider, VersePlayer};
pub use icons::*;
pub use mobile_popup::*;
pub use scroll_to_top::*;
pub use surah_detail::*;
pub use surah_list::*;
