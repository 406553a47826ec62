//! Reader state shared by the chapter list and both detail surfaces.

use crate::api::{ChapterDetail, ChapterSummary, ProviderError};
use tracing::{debug, info, warn};

pub const LIST_FETCH_FAILED: &str = "Failed to fetch surah list. Please try again.";
pub const DETAIL_FETCH_FAILED: &str = "Failed to fetch surah details. Please try again.";

/// Identifies one chapter-detail request. Only the newest ticket may apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailTicket {
    pub chapter_id: u32,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    Applied,
    Failed,
    /// A newer selection was made while this response was in flight.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReaderState {
    pub chapters: Vec<ChapterSummary>,
    pub loading_chapters: bool,
    pub search_query: String,
    pub selected: Option<ChapterDetail>,
    pub loading_detail: bool,
    pub error: Option<String>,
    pub show_mobile_detail: bool,
    detail_generation: u64,
}

impl Default for ReaderState {
    fn default() -> Self {
        Self {
            chapters: Vec::new(),
            loading_chapters: true,
            search_query: String::new(),
            selected: None,
            loading_detail: false,
            error: None,
            show_mobile_detail: false,
            detail_generation: 0,
        }
    }
}

impl ReaderState {
    pub fn apply_chapter_list(&mut self, result: Result<Vec<ChapterSummary>, ProviderError>) {
        self.loading_chapters = false;
        match result {
            Ok(chapters) => {
                info!(count = chapters.len(), "chapter list loaded");
                self.chapters = chapters;
            }
            Err(err) => {
                warn!(%err, "failed to fetch chapter list");
                self.error = Some(LIST_FETCH_FAILED.to_string());
            }
        }
    }

    /// Start loading `chapter_id`. `reset_playback` runs first so no verse of
    /// the outgoing chapter can stay associated with the audio element.
    pub fn begin_detail_request(
        &mut self,
        chapter_id: u32,
        reset_playback: impl FnOnce(),
    ) -> DetailTicket {
        reset_playback();
        self.detail_generation = self.detail_generation.saturating_add(1);
        self.loading_detail = true;
        self.selected = None;
        debug!(chapter_id, generation = self.detail_generation, "requesting chapter detail");
        DetailTicket {
            chapter_id,
            generation: self.detail_generation,
        }
    }

    pub fn apply_detail(
        &mut self,
        ticket: DetailTicket,
        result: Result<ChapterDetail, ProviderError>,
        is_mobile: bool,
    ) -> DetailOutcome {
        if ticket.generation != self.detail_generation {
            debug!(
                chapter_id = ticket.chapter_id,
                generation = ticket.generation,
                latest = self.detail_generation,
                "dropping stale chapter detail"
            );
            return DetailOutcome::Stale;
        }

        self.loading_detail = false;
        match result {
            Ok(detail) => {
                info!(chapter_id = detail.id, verses = detail.verses.len(), "chapter detail loaded");
                self.selected = Some(detail);
                if self.error.as_deref() == Some(DETAIL_FETCH_FAILED) {
                    self.error = None;
                }
                if is_mobile {
                    self.show_mobile_detail = true;
                }
                DetailOutcome::Applied
            }
            Err(err) => {
                warn!(chapter_id = ticket.chapter_id, %err, "failed to fetch chapter detail");
                self.error = Some(DETAIL_FETCH_FAILED.to_string());
                DetailOutcome::Failed
            }
        }
    }

    pub fn close_mobile_detail(&mut self) {
        self.show_mobile_detail = false;
    }

    pub fn selected_chapter_id(&self) -> Option<u32> {
        self.selected.as_ref().map(|detail| detail.id)
    }

    pub fn filtered_chapters(&self) -> Vec<ChapterSummary> {
        let needle = self.search_query.trim().to_lowercase();
        self.chapters
            .iter()
            .filter(|chapter| chapter.matches(&needle))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SurahProvider, Verse};
    use crate::components::audio_manager::playback_state::test_support::RecordingSink;
    use crate::components::audio_manager::playback_state::{PlaybackController, PlaybackState};
    use crate::components::audio_manager::scroll_sync::test_support::CountingTarget;
    use std::collections::BTreeMap;

    const RECITER: &str = "05";

    fn summary(id: u32, latin: &str, native: &str) -> ChapterSummary {
        ChapterSummary {
            id,
            latin_name: latin.to_string(),
            native_name: native.to_string(),
            ..Default::default()
        }
    }

    fn detail(id: u32, verse_count: u32) -> ChapterDetail {
        let verses = (1..=verse_count)
            .map(|verse_id| Verse {
                verse_id,
                arabic_text: format!("arab {verse_id}"),
                audio_by_reciter: BTreeMap::from([(
                    RECITER.to_string(),
                    format!("https://cdn.test/{id:03}{verse_id:03}.mp3"),
                )]),
                ..Default::default()
            })
            .collect();
        ChapterDetail {
            id,
            latin_name: format!("Chapter {id}"),
            verse_count,
            verses,
            ..Default::default()
        }
    }

    /// In-memory provider: `chapter_count` chapters, chapter 2 has 286 verses.
    struct FixtureProvider {
        chapter_count: u32,
        fail_detail: bool,
    }

    impl SurahProvider for FixtureProvider {
        async fn list_chapters(&self) -> Result<Vec<ChapterSummary>, ProviderError> {
            Ok((1..=self.chapter_count)
                .map(|id| summary(id, &format!("Chapter {id}"), "سورة"))
                .collect())
        }

        async fn get_chapter_detail(&self, chapter_id: u32) -> Result<ChapterDetail, ProviderError> {
            if self.fail_detail {
                return Err(ProviderError::Status(503));
            }
            let verse_count = if chapter_id == 2 { 286 } else { 7 };
            Ok(detail(chapter_id, verse_count))
        }
    }

    #[test]
    fn starts_loading_the_chapter_list() {
        let state = ReaderState::default();
        assert!(state.loading_chapters);
        assert!(state.selected.is_none());
    }

    #[test]
    fn list_failure_sets_static_message() {
        let mut state = ReaderState::default();
        state.apply_chapter_list(Err(ProviderError::Request("offline".to_string())));
        assert!(!state.loading_chapters);
        assert_eq!(state.error.as_deref(), Some(LIST_FETCH_FAILED));
    }

    #[test]
    fn search_matches_either_name_case_insensitively() {
        let mut state = ReaderState::default();
        state.apply_chapter_list(Ok(vec![
            summary(1, "Al-Fatihah", "الفاتحة"),
            summary(2, "Al-Baqarah", "البقرة"),
            summary(36, "Yasin", "يس"),
        ]));

        state.search_query = "  BAQ ".to_string();
        let ids: Vec<u32> = state.filtered_chapters().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2]);

        state.search_query = "يس".to_string();
        let ids: Vec<u32> = state.filtered_chapters().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![36]);

        state.search_query.clear();
        assert_eq!(state.filtered_chapters().len(), 3);
    }

    #[test]
    fn begin_request_runs_reset_first_and_clears_selection() {
        let mut state = ReaderState::default();
        let ticket = state.begin_detail_request(1, || {});
        state.apply_detail(ticket, Ok(detail(1, 7)), false);

        let mut reset_calls = 0;
        let ticket = state.begin_detail_request(2, || reset_calls += 1);

        assert_eq!(reset_calls, 1);
        assert_eq!(ticket.chapter_id, 2);
        assert!(state.loading_detail);
        assert!(state.selected.is_none());
    }

    #[test]
    fn slower_earlier_response_does_not_overwrite_newer_selection() {
        let mut state = ReaderState::default();
        let first = state.begin_detail_request(2, || {});
        let second = state.begin_detail_request(3, || {});

        assert_eq!(
            state.apply_detail(second, Ok(detail(3, 88)), false),
            DetailOutcome::Applied
        );
        assert_eq!(
            state.apply_detail(first, Ok(detail(2, 286)), false),
            DetailOutcome::Stale
        );
        assert_eq!(state.selected_chapter_id(), Some(3));
        assert!(!state.loading_detail);
    }

    #[test]
    fn stale_response_leaves_loading_flag_for_pending_request() {
        let mut state = ReaderState::default();
        let first = state.begin_detail_request(2, || {});
        let _second = state.begin_detail_request(3, || {});

        assert_eq!(
            state.apply_detail(first, Err(ProviderError::Status(500)), false),
            DetailOutcome::Stale
        );
        assert!(state.loading_detail);
        assert!(state.error.is_none());
    }

    #[test]
    fn mobile_layout_opens_popup_on_arrival() {
        let mut state = ReaderState::default();
        let ticket = state.begin_detail_request(1, || {});
        state.apply_detail(ticket, Ok(detail(1, 7)), true);
        assert!(state.show_mobile_detail);

        state.close_mobile_detail();
        assert!(!state.show_mobile_detail);
        assert_eq!(state.selected_chapter_id(), Some(1));
    }

    #[tokio::test]
    async fn detail_failure_is_reported_and_cleared_by_next_success() {
        let failing = FixtureProvider {
            chapter_count: 3,
            fail_detail: true,
        };
        let mut state = ReaderState::default();

        let ticket = state.begin_detail_request(1, || {});
        let result = failing.get_chapter_detail(1).await;
        assert_eq!(state.apply_detail(ticket, result, false), DetailOutcome::Failed);
        assert_eq!(state.error.as_deref(), Some(DETAIL_FETCH_FAILED));
        assert!(!state.loading_detail);

        let working = FixtureProvider {
            chapter_count: 3,
            fail_detail: false,
        };
        let ticket = state.begin_detail_request(1, || {});
        let result = working.get_chapter_detail(1).await;
        assert_eq!(state.apply_detail(ticket, result, false), DetailOutcome::Applied);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn select_chapter_then_toggle_first_verse_twice() {
        let provider = FixtureProvider {
            chapter_count: 200,
            fail_detail: false,
        };
        let mut state = ReaderState::default();
        let mut player = PlaybackController::<RecordingSink, CountingTarget>::new(
            RecordingSink::default(),
        );

        state.apply_chapter_list(provider.list_chapters().await);
        assert_eq!(state.chapters.len(), 200);

        let ticket = state.begin_detail_request(2, || player.reset());
        let result = provider.get_chapter_detail(ticket.chapter_id).await;
        assert_eq!(state.apply_detail(ticket, result, false), DetailOutcome::Applied);

        let chapter = state.selected.clone().expect("chapter 2 selected");
        assert_eq!(chapter.verses.len(), 286);

        // Verses mount and register themselves.
        let targets: Vec<CountingTarget> = chapter
            .verses
            .iter()
            .map(|verse| {
                let target = CountingTarget::default();
                player.register_scroll_target(verse.verse_id, target.clone());
                target
            })
            .collect();

        let first = chapter.verses[0].audio_ref(RECITER).expect("verse 1 audio");
        player.toggle(first.verse_id, &first.audio_url).unwrap();
        assert_eq!(player.state(), PlaybackState::Playing(1));
        assert_eq!(targets[0].count(), 1);

        player.toggle(first.verse_id, &first.audio_url).unwrap();
        assert_eq!(player.state(), PlaybackState::Paused(1));
        assert_eq!(targets[0].count(), 1);
        assert!(targets[1..].iter().all(|t| t.count() == 0));
    }

    #[tokio::test]
    async fn switching_chapter_while_playing_resets_before_any_toggle() {
        let provider = FixtureProvider {
            chapter_count: 114,
            fail_detail: false,
        };
        let mut state = ReaderState::default();
        let mut player = PlaybackController::<RecordingSink, CountingTarget>::new(
            RecordingSink::default(),
        );

        let ticket = state.begin_detail_request(2, || player.reset());
        let result = provider.get_chapter_detail(ticket.chapter_id).await;
        state.apply_detail(ticket, result, false);
        let verse = state.selected.as_ref().unwrap().verses[2]
            .audio_ref(RECITER)
            .unwrap();
        player.toggle(verse.verse_id, &verse.audio_url).unwrap();
        assert_eq!(player.state(), PlaybackState::Playing(3));

        let _ticket = state.begin_detail_request(3, || player.reset());

        assert_eq!(player.state(), PlaybackState::Idle);
        assert_eq!(player.source(), None);
        assert!(state.selected.is_none());
    }
}
