//! Audio Manager - owns the single verse audio element for the whole view.
//! Desktop panel and mobile popup both drive it through [`VersePlayer`].

pub(crate) mod playback_state;
pub(crate) mod scroll_sync;

#[cfg(not(target_arch = "wasm32"))]
mod controller_native;
#[cfg(target_arch = "wasm32")]
mod controller_web;

pub use playback_state::{MediaPlaybackError, PlaybackController};

use crate::api::VerseAudioRef;
use dioxus::prelude::*;
use std::rc::Rc;
use tracing::{debug, info};

#[cfg(not(target_arch = "wasm32"))]
pub type PlatformAudio = controller_native::BridgeAudio;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformScrollTarget = controller_native::VerseAnchor;

#[cfg(target_arch = "wasm32")]
pub type PlatformAudio = controller_web::WebAudio;
#[cfg(target_arch = "wasm32")]
pub type PlatformScrollTarget = web_sys::Element;

pub type PlatformController = PlaybackController<PlatformAudio, PlatformScrollTarget>;

/// DOM id of a verse row; native builds scroll to it by id.
pub fn verse_anchor_id(verse_id: u32) -> String {
    format!("verse-{verse_id}")
}

/// Context handle for the verse playback controller.
#[derive(Clone, Copy)]
pub struct VersePlayer {
    controller: Signal<PlatformController>,
}

impl VersePlayer {
    pub fn toggle(&self, audio: &VerseAudioRef) {
        let mut controller = self.controller;
        if let Err(err) = controller
            .write()
            .toggle(audio.verse_id, &audio.audio_url)
        {
            debug!(%err, "toggle did not start playback");
        }
        sync_platform(controller);
    }

    pub fn currently_playing(&self) -> Option<u32> {
        self.controller.read().currently_playing()
    }

    pub fn last_error(&self) -> Option<MediaPlaybackError> {
        self.controller.read().last_error().cloned()
    }

    /// Must run before a different chapter is requested: verse ids only mean
    /// something within one chapter.
    pub fn reset(&self) {
        let mut controller = self.controller;
        controller.write().reset();
        sync_platform(controller);
    }

    /// Mounting a row does not notify readers of the playback state.
    pub fn register_scroll_target(&self, verse_id: u32, mounted: Rc<MountedData>) {
        if let Some(target) = scroll_target_for(verse_id, mounted) {
            self.controller
                .peek()
                .register_scroll_target(verse_id, target);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn sync_platform(controller: Signal<PlatformController>) {
    controller_native::flush_pending(controller);
}

#[cfg(target_arch = "wasm32")]
fn sync_platform(controller: Signal<PlatformController>) {
    controller_web::watch_pending_play(controller);
}

#[cfg(not(target_arch = "wasm32"))]
fn release_platform(controller: &mut PlatformController) {
    controller_native::flush_commands(controller.sink_mut());
}

#[cfg(target_arch = "wasm32")]
fn release_platform(_controller: &mut PlatformController) {}

#[cfg(not(target_arch = "wasm32"))]
fn scroll_target_for(verse_id: u32, _mounted: Rc<MountedData>) -> Option<PlatformScrollTarget> {
    Some(controller_native::VerseAnchor::new(verse_anchor_id(verse_id)))
}

#[cfg(target_arch = "wasm32")]
fn scroll_target_for(_verse_id: u32, mounted: Rc<MountedData>) -> Option<PlatformScrollTarget> {
    mounted.downcast::<web_sys::Element>().cloned()
}

/// Create the controller for this view and provide it to every surface below.
/// Dropping the providing component stops playback and detaches the element.
pub fn use_verse_player_provider() -> VersePlayer {
    let controller = use_signal(|| PlatformController::new(PlatformAudio::new()));
    let player = use_context_provider(|| VersePlayer { controller });

    #[cfg(target_arch = "wasm32")]
    use_hook(move || controller_web::attach_media_listeners(controller));
    #[cfg(not(target_arch = "wasm32"))]
    use_hook(move || controller_native::start_bridge(controller));

    use_drop(move || {
        info!("tearing down verse player");
        #[cfg(target_arch = "wasm32")]
        controller_web::detach_media_listeners();
        let mut controller = controller;
        if let Ok(mut state) = controller.try_write() {
            let had_source = state.source().is_some();
            state.reset();
            if had_source {
                release_platform(&mut *state);
            }
        };
    });

    player
}
