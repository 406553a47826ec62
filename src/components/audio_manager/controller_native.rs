// Webview backend: the verse <audio> element lives inside the renderer's page
// and is driven through evaluated scripts.
use super::playback_state::{AudioSink, PlaybackController};
use super::scroll_sync::ScrollTarget;
use super::PlatformController;
use crate::components::webview::{delay_ms, eval_json, run_script};
use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

const POLL_INTERVAL_MS: u64 = 250;

const BRIDGE_BOOTSTRAP_JS: &str = r#"
(() => {
  if (window.__equranVerseBridge) {
    return true;
  }

  const existing = document.getElementById("equran-verse-audio");
  const audio = existing || document.createElement("audio");
  if (!existing) {
    audio.id = "equran-verse-audio";
    audio.preload = "metadata";
    audio.hidden = true;
    document.body.appendChild(audio);
  }

  const currentSrc = () => audio.getAttribute("src");
  const mediaErrors = {
    1: "playback aborted",
    2: "network error while loading audio",
    3: "audio could not be decoded",
    4: "audio source not supported",
  };

  const bridge = {
    ended: null,
    failure: null,
    apply(cmd) {
      if (!cmd || !cmd.type) return;

      switch (cmd.type) {
        case "load":
          audio.setAttribute("src", cmd.src);
          break;
        case "play": {
          const src = currentSrc();
          const pending = audio.play();
          if (pending && typeof pending.catch === "function") {
            pending.catch((err) => {
              if (err && err.name === "AbortError") return;
              const reason = err && err.name ? `${err.name}: ${err.message}` : String(err);
              bridge.failure = { src, reason };
            });
          }
          break;
        }
        case "pause":
          audio.pause();
          break;
        case "clear":
          audio.pause();
          audio.removeAttribute("src");
          audio.load();
          bridge.ended = null;
          bridge.failure = null;
          break;
      }
    },
    take() {
      const events = { ended: bridge.ended, failure: bridge.failure };
      bridge.ended = null;
      bridge.failure = null;
      return events;
    },
  };

  audio.addEventListener("ended", () => {
    bridge.ended = currentSrc();
  });
  audio.addEventListener("error", () => {
    const src = currentSrc();
    if (!src) return;
    const code = audio.error ? audio.error.code : 0;
    bridge.failure = { src, reason: mediaErrors[code] || "unknown media error" };
  });

  window.__equranVerseBridge = bridge;
  return true;
})();
"#;

const BRIDGE_TAKE_JS: &str = r#"return (function () {
    const bridge = window.__equranVerseBridge;
    return bridge ? bridge.take() : { ended: null, failure: null };
})();"#;

/// One instruction for the page-side audio element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BridgeCommand {
    Load { src: String },
    Play,
    Pause,
    Clear,
}

/// Media events collected by the page since the last poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BridgeEvents {
    #[serde(default)]
    pub ended: Option<String>,
    #[serde(default)]
    pub failure: Option<BridgeFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BridgeFailure {
    pub src: String,
    pub reason: String,
}

/// Queues commands for the page. `play` always succeeds here; a refusal
/// arrives later as a [`BridgeFailure`] for the source it was meant for.
#[derive(Debug, Default)]
pub struct BridgeAudio {
    outbox: Vec<BridgeCommand>,
}

impl BridgeAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_commands(&mut self) -> Vec<BridgeCommand> {
        std::mem::take(&mut self.outbox)
    }
}

impl AudioSink for BridgeAudio {
    fn load(&mut self, url: &str) {
        self.outbox.push(BridgeCommand::Load {
            src: url.to_string(),
        });
    }

    fn play(&mut self) -> Result<(), String> {
        self.outbox.push(BridgeCommand::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.outbox.push(BridgeCommand::Pause);
    }

    fn clear(&mut self) {
        // Anything not yet sent belongs to the source being dropped.
        self.outbox.clear();
        self.outbox.push(BridgeCommand::Clear);
    }
}

/// Feed page-side media events into the controller.
pub fn apply_bridge_events<A: AudioSink, T: ScrollTarget>(
    controller: &mut PlaybackController<A, T>,
    events: BridgeEvents,
) {
    if let Some(failure) = events.failure {
        controller.report_media_failure(&failure.src, failure.reason);
    }
    if let Some(src) = events.ended {
        if controller.source() == Some(src.as_str()) {
            controller.mark_ended();
        }
    }
}

fn send_command(command: &BridgeCommand) {
    let payload = serde_json::to_string(command).unwrap_or_else(|_| "{}".to_string());
    let script = format!(
        r#"(function () {{
            const bridge = window.__equranVerseBridge;
            if (!bridge) return false;
            bridge.apply({payload});
            return true;
        }})();"#
    );
    run_script(&script);
}

/// Send everything the controller queued since the last flush.
pub fn flush_commands(audio: &mut BridgeAudio) {
    for command in audio.take_commands() {
        send_command(&command);
    }
}

pub fn flush_pending(controller: Signal<PlatformController>) {
    let mut controller = controller;
    flush_commands(controller.write().sink_mut());
}

/// Install the page-side element and poll it for `ended`/`error` while a verse is loaded.
pub fn start_bridge(controller: Signal<PlatformController>) {
    run_script(BRIDGE_BOOTSTRAP_JS);

    spawn(async move {
        loop {
            if !delay_ms(POLL_INTERVAL_MS).await {
                debug!("webview stopped answering; verse audio polling ends");
                break;
            }
            if controller.peek().source().is_none() {
                continue;
            }
            let Some(events) = eval_json::<BridgeEvents>(BRIDGE_TAKE_JS).await else {
                continue;
            };
            if events == BridgeEvents::default() {
                continue;
            }
            debug!(?events, "verse audio events from the page");
            let mut controller = controller;
            apply_bridge_events(&mut *controller.write(), events);
        }
    });
}

/// A verse row addressed by its DOM id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseAnchor {
    element_id: String,
}

impl VerseAnchor {
    pub fn new(element_id: String) -> Self {
        Self { element_id }
    }
}

fn center_row_script(element_id: &str) -> String {
    format!(
        r#"(function () {{
            const row = document.getElementById("{element_id}");
            if (!row) return;
            row.scrollIntoView({{ behavior: "smooth", block: "center" }});
        }})();"#
    )
}

impl ScrollTarget for VerseAnchor {
    fn scroll_into_center(&self) {
        run_script(&center_row_script(&self.element_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::audio_manager::playback_state::PlaybackState;
    use crate::components::audio_manager::scroll_sync::test_support::CountingTarget;

    type Controller = PlaybackController<BridgeAudio, CountingTarget>;

    const VERSE_ONE: &str = "https://cdn.test/audio/001001.mp3";
    const VERSE_TWO: &str = "https://cdn.test/audio/001002.mp3";

    fn load(src: &str) -> BridgeCommand {
        BridgeCommand::Load {
            src: src.to_string(),
        }
    }

    #[test]
    fn toggle_plays_through_the_bridge() {
        let mut controller = Controller::new(BridgeAudio::new());
        let target = CountingTarget::default();
        controller.register_scroll_target(1, target.clone());

        controller.toggle(1, VERSE_ONE).unwrap();

        assert_eq!(controller.state(), PlaybackState::Playing(1));
        assert_eq!(controller.last_error(), None);
        assert_eq!(target.count(), 1);
        assert_eq!(
            controller.sink_mut().take_commands(),
            vec![load(VERSE_ONE), BridgeCommand::Play]
        );

        controller.toggle(1, VERSE_ONE).unwrap();
        assert_eq!(controller.state(), PlaybackState::Paused(1));
        assert_eq!(controller.sink_mut().take_commands(), vec![BridgeCommand::Pause]);
    }

    #[test]
    fn reset_drops_unsent_commands() {
        let mut controller = Controller::new(BridgeAudio::new());
        controller.toggle(1, VERSE_ONE).unwrap();

        controller.reset();

        assert_eq!(controller.sink_mut().take_commands(), vec![BridgeCommand::Clear]);
    }

    #[test]
    fn verse_rows_scroll_to_the_middle() {
        let script = center_row_script("verse-7");
        assert!(script.contains(r#"getElementById("verse-7")"#));
        assert!(script.contains(r#"block: "center""#));
        assert!(script.contains(r#"behavior: "smooth""#));
    }

    #[test]
    fn commands_use_the_page_wire_shape() {
        let json = serde_json::to_value(load(VERSE_ONE)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "load", "src": VERSE_ONE }));
        let json = serde_json::to_value(BridgeCommand::Pause).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "pause" }));
    }

    #[test]
    fn ended_event_pauses_the_loaded_verse() {
        let mut controller = Controller::new(BridgeAudio::new());
        controller.toggle(1, VERSE_ONE).unwrap();

        let events: BridgeEvents =
            serde_json::from_str(&format!(r#"{{"ended":"{VERSE_ONE}","failure":null}}"#)).unwrap();
        apply_bridge_events(&mut controller, events);

        assert_eq!(controller.state(), PlaybackState::Paused(1));
    }

    #[test]
    fn ended_event_for_previous_source_is_ignored() {
        let mut controller = Controller::new(BridgeAudio::new());
        controller.toggle(1, VERSE_ONE).unwrap();
        controller.toggle(2, VERSE_TWO).unwrap();

        apply_bridge_events(
            &mut controller,
            BridgeEvents {
                ended: Some(VERSE_ONE.to_string()),
                failure: None,
            },
        );

        assert_eq!(controller.state(), PlaybackState::Playing(2));
    }

    #[test]
    fn page_failure_reverts_to_idle_with_error() {
        let mut controller = Controller::new(BridgeAudio::new());
        controller.toggle(2, VERSE_TWO).unwrap();

        let events: BridgeEvents = serde_json::from_str(&format!(
            r#"{{"ended":null,"failure":{{"src":"{VERSE_TWO}","reason":"NotAllowedError: blocked"}}}}"#
        ))
        .unwrap();
        apply_bridge_events(&mut controller, events);

        assert_eq!(controller.state(), PlaybackState::Idle);
        let err = controller.last_error().expect("failure is kept");
        assert_eq!(err.verse_id, 2);
        assert_eq!(err.reason, "NotAllowedError: blocked");
    }

    #[test]
    fn failure_for_abandoned_source_keeps_playing() {
        let mut controller = Controller::new(BridgeAudio::new());
        controller.toggle(1, VERSE_ONE).unwrap();
        controller.toggle(2, VERSE_TWO).unwrap();

        apply_bridge_events(
            &mut controller,
            BridgeEvents {
                ended: None,
                failure: Some(BridgeFailure {
                    src: VERSE_ONE.to_string(),
                    reason: "network error while loading audio".to_string(),
                }),
            },
        );

        assert_eq!(controller.state(), PlaybackState::Playing(2));
        assert_eq!(controller.last_error(), None);
    }
}
