use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Reciter code -> audio URL, as returned by the provider.
pub type AudioByReciter = BTreeMap<String, String>;

/// Every equran.id response is wrapped in `{ code, message, data }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: u16,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct ChapterSummary {
    #[serde(rename = "nomor")]
    pub id: u32,
    #[serde(rename = "namaLatin")]
    pub latin_name: String,
    #[serde(rename = "nama")]
    pub native_name: String,
    #[serde(default, rename = "arti")]
    pub meaning: String,
    #[serde(default, rename = "jumlahAyat")]
    pub verse_count: u32,
    #[serde(default, rename = "tempatTurun")]
    pub revelation_place: String,
    #[serde(default, rename = "audioFull")]
    pub full_audio_by_reciter: AudioByReciter,
}

impl ChapterSummary {
    /// Case-insensitive substring match on either name. `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.latin_name.to_lowercase().contains(needle)
            || self.native_name.to_lowercase().contains(needle)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct ChapterDetail {
    #[serde(rename = "nomor")]
    pub id: u32,
    #[serde(rename = "namaLatin")]
    pub latin_name: String,
    #[serde(rename = "nama")]
    pub native_name: String,
    #[serde(default, rename = "arti")]
    pub meaning: String,
    #[serde(default, rename = "jumlahAyat")]
    pub verse_count: u32,
    #[serde(default, rename = "tempatTurun")]
    pub revelation_place: String,
    #[serde(default, rename = "deskripsi")]
    pub description_html: String,
    #[serde(default, rename = "audioFull")]
    pub full_audio_by_reciter: AudioByReciter,
    #[serde(default, rename = "ayat")]
    pub verses: Vec<Verse>,
}

impl ChapterDetail {
    pub fn description_text(&self) -> String {
        strip_html(&self.description_html)
    }

    pub fn full_audio_url(&self, reciter: &str) -> Option<&str> {
        self.full_audio_by_reciter.get(reciter).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Verse {
    #[serde(rename = "nomorAyat")]
    pub verse_id: u32,
    #[serde(default, rename = "teksArab")]
    pub arabic_text: String,
    #[serde(default, rename = "teksLatin")]
    pub latin_transliteration: String,
    #[serde(default, rename = "teksIndonesia")]
    pub translation: String,
    #[serde(default, rename = "audio")]
    pub audio_by_reciter: AudioByReciter,
}

impl Verse {
    pub fn audio_ref(&self, reciter: &str) -> Option<VerseAudioRef> {
        self.audio_by_reciter
            .get(reciter)
            .map(|url| VerseAudioRef::new(self.verse_id, url.clone()))
    }
}

/// A verse number paired with the recitation URL chosen for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseAudioRef {
    pub verse_id: u32,
    pub audio_url: String,
}

impl VerseAudioRef {
    pub fn new(verse_id: u32, audio_url: impl Into<String>) -> Self {
        Self {
            verse_id,
            audio_url: audio_url.into(),
        }
    }
}

pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, "").trim().to_string()
}
