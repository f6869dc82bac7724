//! Audio models
//!
//! `POST /audio/transcriptions` and `POST /audio/translations`, both
//! multipart.

use serde::{Deserialize, Serialize};

use super::upload::FileUpload;
use super::{ApiPath, ApiRequest, ApiResponse, RequestBody};
use crate::codec::{self, MultipartForm};
use crate::utils::error::ClientResult;

/// Transcribe audio into the input language
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioTranscriptionRequest {
    pub file: FileUpload,
    /// e.g. `whisper-1`
    pub model: String,
    /// Text guiding the model's style
    pub prompt: String,
    /// `json`, `text`, `srt`, `verbose_json` or `vtt`
    pub response_format: String,
    pub temperature: f64,
    /// ISO-639-1 code of the input audio
    pub language: String,
}

/// Translate audio into English
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioTranslationRequest {
    pub file: FileUpload,
    pub model: String,
    pub prompt: String,
    pub response_format: String,
    pub temperature: f64,
}

impl AudioTranscriptionRequest {
    pub fn builder() -> AudioTranscriptionRequestBuilder {
        AudioTranscriptionRequestBuilder::default()
    }
}

impl AudioTranslationRequest {
    pub fn builder() -> AudioTranslationRequestBuilder {
        AudioTranslationRequestBuilder::default()
    }
}

/// Builder for [`AudioTranscriptionRequest`]
#[derive(Debug, Clone, Default)]
pub struct AudioTranscriptionRequestBuilder {
    inner: AudioTranscriptionRequest,
}

impl AudioTranscriptionRequestBuilder {
    pub fn file(mut self, file: FileUpload) -> Self {
        self.inner.file = file;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = model.into();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.inner.prompt = prompt.into();
        self
    }

    pub fn response_format(mut self, format: impl Into<String>) -> Self {
        self.inner.response_format = format.into();
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.inner.temperature = temperature;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.inner.language = language.into();
        self
    }

    pub fn build(self) -> AudioTranscriptionRequest {
        self.inner
    }
}

/// Builder for [`AudioTranslationRequest`]
#[derive(Debug, Clone, Default)]
pub struct AudioTranslationRequestBuilder {
    inner: AudioTranslationRequest,
}

impl AudioTranslationRequestBuilder {
    pub fn file(mut self, file: FileUpload) -> Self {
        self.inner.file = file;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = model.into();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.inner.prompt = prompt.into();
        self
    }

    pub fn response_format(mut self, format: impl Into<String>) -> Self {
        self.inner.response_format = format.into();
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.inner.temperature = temperature;
        self
    }

    pub fn build(self) -> AudioTranslationRequest {
        self.inner
    }
}

/// Transcription or translation result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioResponse {
    pub text: String,
    /// Only reported by `verbose_json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<AudioSegment>,
}

/// Timed segment of a `verbose_json` result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSegment {
    pub id: u32,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Whether `response_format` yields a JSON document
fn is_json_format(response_format: &str) -> bool {
    matches!(response_format.trim(), "" | "json" | "verbose_json")
}

impl AudioResponse {
    /// Decode a body produced by the given `response_format`
    pub fn from_format(response_format: &str, status: u16, body: &[u8]) -> ClientResult<Self> {
        if is_json_format(response_format) {
            codec::from_json(status, body)
        } else {
            // text, srt and vtt return the transcript as the raw body
            Ok(Self {
                text: String::from_utf8_lossy(body).into_owned(),
                ..Self::default()
            })
        }
    }
}

impl ApiResponse for AudioResponse {
    fn from_body(status: u16, body: &[u8]) -> ClientResult<Self> {
        codec::from_json(status, body)
    }

    fn from_error_body(body: &[u8]) -> Self {
        codec::from_json_lenient(body)
    }
}

fn audio_form(
    file: &FileUpload,
    model: &str,
    prompt: &str,
    response_format: &str,
    temperature: f64,
) -> MultipartForm {
    file.attach(MultipartForm::new(), "file")
        .text("model", model)
        .text_if_set("prompt", prompt)
        .text_if_set("response_format", response_format)
        .number_if_set("temperature", temperature)
}

impl ApiRequest for AudioTranscriptionRequest {
    type Response = AudioResponse;

    const ENDPOINT: &'static str = "audio.transcriptions";

    fn path(&self) -> ApiPath {
        ApiPath::new("/audio/transcriptions")
    }

    fn decode(&self, status: u16, body: &[u8]) -> ClientResult<AudioResponse> {
        AudioResponse::from_format(&self.response_format, status, body)
    }

    fn body(&self) -> ClientResult<RequestBody> {
        let form = audio_form(
            &self.file,
            &self.model,
            &self.prompt,
            &self.response_format,
            self.temperature,
        )
        .text_if_set("language", &self.language);
        Ok(RequestBody::Multipart(form.encode()))
    }

    fn log_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "endpoint": Self::ENDPOINT,
            "model": self.model,
            "filename": self.file.filename,
            "bytes": self.file.data.len(),
        })
    }
}

impl ApiRequest for AudioTranslationRequest {
    type Response = AudioResponse;

    const ENDPOINT: &'static str = "audio.translations";

    fn path(&self) -> ApiPath {
        ApiPath::new("/audio/translations")
    }

    fn decode(&self, status: u16, body: &[u8]) -> ClientResult<AudioResponse> {
        AudioResponse::from_format(&self.response_format, status, body)
    }

    fn body(&self) -> ClientResult<RequestBody> {
        let form = audio_form(
            &self.file,
            &self.model,
            &self.prompt,
            &self.response_format,
            self.temperature,
        );
        Ok(RequestBody::Multipart(form.encode()))
    }

    fn log_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "endpoint": Self::ENDPOINT,
            "model": self.model,
            "filename": self.file.filename,
            "bytes": self.file.data.len(),
        })
    }
}
