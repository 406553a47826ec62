// Verse playback state machine. Platform code lives behind `AudioSink`.
use super::scroll_sync::{ScrollSynchronizer, ScrollTarget};
use tracing::{debug, info, warn};

/// The one media element the controller drives.
pub trait AudioSink {
    /// Point the element at `url`. Whatever was loaded before is abandoned, not stopped.
    fn load(&mut self, url: &str);
    /// Start or resume playback of the loaded source.
    fn play(&mut self) -> Result<(), String>;
    fn pause(&mut self);
    /// Stop and detach the current source.
    fn clear(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(u32),
    Paused(u32),
}

impl PlaybackState {
    pub fn verse_id(&self) -> Option<u32> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Playing(id) | PlaybackState::Paused(id) => Some(*id),
        }
    }
}

/// What a successful `toggle` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Paused,
    Resumed,
    Switched { from: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Verse {verse_id} could not be played: {reason}")]
pub struct MediaPlaybackError {
    pub verse_id: u32,
    pub reason: String,
}

pub struct PlaybackController<A: AudioSink, T: ScrollTarget> {
    sink: A,
    state: PlaybackState,
    source: Option<String>,
    scroll: ScrollSynchronizer<T>,
    last_error: Option<MediaPlaybackError>,
}

impl<A: AudioSink, T: ScrollTarget> PlaybackController<A, T> {
    pub fn new(sink: A) -> Self {
        Self {
            sink,
            state: PlaybackState::Idle,
            source: None,
            scroll: ScrollSynchronizer::default(),
            last_error: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The verse whose recitation is audible right now.
    pub fn currently_playing(&self) -> Option<u32> {
        match self.state {
            PlaybackState::Playing(id) => Some(id),
            _ => None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn last_error(&self) -> Option<&MediaPlaybackError> {
        self.last_error.as_ref()
    }

    pub fn sink_mut(&mut self) -> &mut A {
        &mut self.sink
    }

    #[cfg(test)]
    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn register_scroll_target(&self, verse_id: u32, target: T) {
        self.scroll.register(verse_id, target);
    }

    /// Play, pause, resume or switch depending on what is loaded.
    ///
    /// Every entry into `Playing` scrolls the verse into view; pausing never does.
    /// If the element refuses to start, the state falls back to `Idle`.
    pub fn toggle(&mut self, verse_id: u32, url: &str) -> Result<Transition, MediaPlaybackError> {
        let transition = match self.state {
            PlaybackState::Playing(current) if current == verse_id => {
                self.sink.pause();
                self.state = PlaybackState::Paused(current);
                debug!(verse_id, "verse paused");
                return Ok(Transition::Paused);
            }
            PlaybackState::Paused(current) if current == verse_id => Transition::Resumed,
            PlaybackState::Idle => {
                self.load(url);
                Transition::Started
            }
            PlaybackState::Playing(previous) | PlaybackState::Paused(previous) => {
                self.load(url);
                Transition::Switched { from: previous }
            }
        };

        if let Err(reason) = self.sink.play() {
            return Err(self.fail(verse_id, reason));
        }

        self.state = PlaybackState::Playing(verse_id);
        self.last_error = None;
        debug!(verse_id, ?transition, "verse playing");
        self.scroll.bring_into_view(verse_id);
        Ok(transition)
    }

    /// The media layer gave up on `failed_url`. Ignored unless that source is still loaded.
    pub fn report_media_failure(
        &mut self,
        failed_url: &str,
        reason: impl Into<String>,
    ) -> Option<MediaPlaybackError> {
        let reason = reason.into();
        let verse_id = match (self.state.verse_id(), self.source.as_deref()) {
            (Some(verse_id), Some(loaded)) if loaded == failed_url => verse_id,
            _ => {
                debug!(failed_url, %reason, "ignoring failure for a source no longer loaded");
                return None;
            }
        };
        Some(self.fail(verse_id, reason))
    }

    /// The clip reached its end; the element is paused on the same source.
    pub fn mark_ended(&mut self) {
        if let PlaybackState::Playing(verse_id) = self.state {
            debug!(verse_id, "verse finished");
            self.state = PlaybackState::Paused(verse_id);
        }
    }

    /// Forget everything tied to the current chapter.
    pub fn reset(&mut self) {
        if self.state != PlaybackState::Idle || self.scroll.len() > 0 {
            info!(
                state = ?self.state,
                scroll_targets = self.scroll.len(),
                "resetting verse playback"
            );
        }
        self.sink.clear();
        self.source = None;
        self.state = PlaybackState::Idle;
        self.scroll.clear();
        self.last_error = None;
    }

    fn load(&mut self, url: &str) {
        self.sink.load(url);
        self.source = Some(url.to_string());
    }

    fn fail(&mut self, verse_id: u32, reason: String) -> MediaPlaybackError {
        warn!(verse_id, %reason, "verse playback failed");
        self.sink.clear();
        self.source = None;
        self.state = PlaybackState::Idle;
        let err = MediaPlaybackError { verse_id, reason };
        self.last_error = Some(err.clone());
        err
    }
}
