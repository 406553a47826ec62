// Browser backend: the shared <audio> element and DOM scroll targets.
use super::playback_state::AudioSink;
use super::scroll_sync::ScrollTarget;
use super::PlatformController;
use dioxus::core::{Runtime, RuntimeGuard};
use dioxus::prelude::*;
use js_sys::{Promise, Reflect};
use tracing::debug;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    window, HtmlAudioElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

const AUDIO_ELEMENT_ID: &str = "equran-verse-audio";

/// Initialize the verse audio element once.
pub fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id(AUDIO_ELEMENT_ID) {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id(AUDIO_ELEMENT_ID);
    // Verse clips are short; metadata is enough until the user presses play.
    audio.set_attribute("preload", "metadata").ok()?;
    audio.set_attribute("hidden", "").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

pub struct WebAudio {
    element: Option<HtmlAudioElement>,
    pending_play: Option<(String, Promise)>,
}

impl WebAudio {
    pub fn new() -> Self {
        Self {
            element: get_or_create_audio_element(),
            pending_play: None,
        }
    }

    /// The promise returned by the last `play()`, with the source it was for.
    pub fn take_pending_play(&mut self) -> Option<(String, Promise)> {
        self.pending_play.take()
    }
}

impl AudioSink for WebAudio {
    fn load(&mut self, url: &str) {
        if let Some(audio) = &self.element {
            audio.set_src(url);
        }
    }

    fn play(&mut self) -> Result<(), String> {
        let audio = self
            .element
            .as_ref()
            .ok_or_else(|| "audio element unavailable".to_string())?;
        let promise = audio.play().map_err(|err| js_error_message(&err))?;
        let src = audio.get_attribute("src").unwrap_or_default();
        self.pending_play = Some((src, promise));
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(audio) = &self.element {
            let _ = audio.pause();
        }
    }

    fn clear(&mut self) {
        self.pending_play = None;
        if let Some(audio) = &self.element {
            let _ = audio.pause();
            let _ = audio.remove_attribute("src");
            audio.load();
        }
    }
}

impl ScrollTarget for web_sys::Element {
    fn scroll_into_center(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        self.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

/// Route `ended`/`error` events of the shared element back into the controller.
pub fn attach_media_listeners(controller: Signal<PlatformController>) {
    let Some(audio) = get_or_create_audio_element() else {
        return;
    };
    let runtime = Runtime::current();

    let runtime_ended = runtime.clone();
    let ended_cb = Closure::wrap(Box::new(move || {
        let _guard = RuntimeGuard::new(runtime_ended.clone());
        let mut controller = controller;
        controller.write().mark_ended();
    }) as Box<dyn FnMut()>);

    let runtime_error = runtime.clone();
    let error_cb = Closure::wrap(Box::new(move || {
        let _guard = RuntimeGuard::new(runtime_error.clone());
        let Some(audio) = get_or_create_audio_element() else {
            return;
        };
        // A cleared element has no src; nothing to report.
        let Some(src) = audio.get_attribute("src") else {
            return;
        };
        let reason = audio
            .error()
            .map(|err| media_error_label(err.code()).to_string())
            .unwrap_or_else(|| "unknown media error".to_string());
        let mut controller = controller;
        controller.write().report_media_failure(&src, reason);
    }) as Box<dyn FnMut()>);

    audio.set_onended(Some(ended_cb.as_ref().unchecked_ref()));
    audio.set_onerror(Some(error_cb.as_ref().unchecked_ref()));
    ended_cb.forget();
    error_cb.forget();
}

pub fn detach_media_listeners() {
    if let Some(audio) = get_or_create_audio_element() {
        audio.set_onended(None);
        audio.set_onerror(None);
    }
}

/// Watch the promise of a `play()` issued by the last command, if there was one.
pub fn watch_pending_play(controller: Signal<PlatformController>) {
    let mut controller = controller;
    let pending = controller.write().sink_mut().take_pending_play();
    if let Some((src, promise)) = pending {
        watch_play_promise(controller, src, promise);
    }
}

/// Report a rejected `play()` promise. Interrupted plays (pause or a new
/// source before playback began) reject with `AbortError` and are expected.
fn watch_play_promise(controller: Signal<PlatformController>, src: String, promise: Promise) {
    spawn(async move {
        let Err(err) = JsFuture::from(promise).await else {
            return;
        };
        if js_error_name(&err).as_deref() == Some("AbortError") {
            debug!(%src, "play request superseded");
            return;
        }
        let mut controller = controller;
        controller
            .write()
            .report_media_failure(&src, js_error_message(&err));
    });
}

fn js_error_name(err: &JsValue) -> Option<String> {
    Reflect::get(err, &JsValue::from_str("name")).ok()?.as_string()
}

fn js_error_message(err: &JsValue) -> String {
    let message = Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string());
    match (js_error_name(err), message) {
        (Some(name), Some(message)) => format!("{name}: {message}"),
        (None, Some(message)) => message,
        (Some(name), None) => name,
        (None, None) => err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}

fn media_error_label(code: u16) -> &'static str {
    match code {
        1 => "playback aborted",
        2 => "network error while loading audio",
        3 => "audio could not be decoded",
        4 => "audio source not supported",
        _ => "unknown media error",
    }
}
