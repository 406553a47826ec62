use crate::api::models::*;
use crate::config::AppConfig;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const OK_CODE: u16 = 200;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Provider error {code}: {message}")]
    Api { code: u16, message: String },
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}

/// Read-only source of chapters and verses.
#[allow(async_fn_in_trait)]
pub trait SurahProvider {
    async fn list_chapters(&self) -> Result<Vec<ChapterSummary>, ProviderError>;
    async fn get_chapter_detail(&self, chapter_id: u32) -> Result<ChapterDetail, ProviderError>;
}

/// HTTP client for the equran.id v2 API.
#[derive(Debug, Clone)]
pub struct EquranClient {
    base_url: String,
}

impl EquranClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let url = self.build_url(path);
        debug!(%url, "provider request");
        let response = HTTP_CLIENT.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "provider returned error status");
            return Err(ProviderError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        decode_envelope(&body)
    }
}

impl SurahProvider for EquranClient {
    async fn list_chapters(&self) -> Result<Vec<ChapterSummary>, ProviderError> {
        self.get_data("surat").await
    }

    async fn get_chapter_detail(&self, chapter_id: u32) -> Result<ChapterDetail, ProviderError> {
        self.get_data(&format!("surat/{chapter_id}")).await
    }
}

pub(crate) fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    if envelope.code != OK_CODE {
        return Err(ProviderError::Api {
            code: envelope.code,
            message: envelope.message,
        });
    }

    envelope
        .data
        .ok_or_else(|| ProviderError::Decode("response carried no data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_without_double_slash() {
        let config = AppConfig {
            api_base_url: "https://example.test/api/v2/".to_string(),
            ..AppConfig::default()
        };
        let client = EquranClient::new(&config);
        assert_eq!(client.build_url("surat/2"), "https://example.test/api/v2/surat/2");
        assert_eq!(client.build_url("/surat"), "https://example.test/api/v2/surat");
    }

    #[test]
    fn decode_envelope_reads_chapter_list() {
        let body = r#"{"code":200,"message":"ok","data":[
            {"nomor":1,"nama":"الفاتحة","namaLatin":"Al-Fatihah","jumlahAyat":7,"tempatTurun":"Mekah","arti":"Pembukaan"},
            {"nomor":2,"nama":"البقرة","namaLatin":"Al-Baqarah","jumlahAyat":286,"tempatTurun":"Madinah","arti":"Sapi"}
        ]}"#;
        let chapters: Vec<ChapterSummary> = decode_envelope(body).expect("list decodes");
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].verse_count, 286);
        assert_eq!(chapters[1].revelation_place, "Madinah");
    }

    #[test]
    fn decode_envelope_surfaces_provider_code() {
        let body = r#"{"code":404,"message":"Surat tidak ditemukan","data":null}"#;
        let err = decode_envelope::<ChapterDetail>(body).unwrap_err();
        assert_eq!(
            err,
            ProviderError::Api {
                code: 404,
                message: "Surat tidak ditemukan".to_string()
            }
        );
    }

    #[test]
    fn decode_envelope_rejects_garbage_and_missing_data() {
        assert!(matches!(
            decode_envelope::<Vec<ChapterSummary>>("<html>"),
            Err(ProviderError::Decode(_))
        ));
        assert!(matches!(
            decode_envelope::<Vec<ChapterSummary>>(r#"{"code":200,"message":"ok"}"#),
            Err(ProviderError::Decode(_))
        ));
    }
}
