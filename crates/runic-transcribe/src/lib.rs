//! Optional transcription boundary: ordinary text in, IPA text out.
//!
//! The rendering pipeline consumes IPA. When the input is plain English,
//! a [`Transcriber`] rewrites it first; the default [`Passthrough`] hands
//! text through untouched for input that is already IPA, and
//! [`GeminiTranscriber`] asks a Gemini model to do the rewrite, constrained
//! to exactly the phoneme alphabet the tokenizer accepts.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

use core::fmt;

use serde::{Deserialize, Serialize};

/// System prompt pinning the model to the tokenizer's phoneme alphabet.
const SYSTEM_PROMPT: &str = "Repeat all text that you are given verbatim rewritten in IPA. \
The result should be based on standard American pronunciation but should use only characters from \
\"b,tʃ,d,f,ɡ,h,dʒ,k,l,ɫ,m,n,ŋ,p,ɹ,s,ʃ,t,θ,ð,v,w,j,z,ʒ,æ,ɑɹ,ɑ,ɔ,eɪ,ɛ,i,ɪɹ,ə,ɛɹ,ɪ,aɪ,ɝ,oʊ,ɔɪ,u,ʊ,aʊ,ɔɹ,ʊɹ\" \
and absolutely no others. Preserve punctuation.";

const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite-preview-06-17";
const API_ROOT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Rewrites ordinary text into IPA.
pub trait Transcriber {
    fn transcribe(&self, text: &str) -> Result<String, TranscribeError>;
}

/// Transcription failure.
#[derive(Debug)]
pub enum TranscribeError {
    /// No API key in the environment.
    MissingApiKey,
    /// The HTTP request failed.
    Http(String),
    /// The response body was not the expected shape.
    Decode(String),
    /// The model returned no text.
    EmptyResponse,
}

impl fmt::Display for TranscribeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => {
                write!(f, "transcription requires {} in the environment", API_KEY_ENV)
            }
            Self::Http(err) => write!(f, "transcription request failed: {}", err),
            Self::Decode(err) => write!(f, "unable to decode transcription response: {}", err),
            Self::EmptyResponse => write!(f, "transcription response contained no text"),
        }
    }
}

impl std::error::Error for TranscribeError {}

/// Uses the input verbatim as already-IPA text.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Transcriber for Passthrough {
    fn transcribe(&self, text: &str) -> Result<String, TranscribeError> {
        Ok(text.to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini-backed transcriber.
#[derive(Clone, Debug)]
pub struct GeminiTranscriber {
    api_key: String,
    model: String,
}

impl GeminiTranscriber {
    /// Builds a transcriber from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, TranscribeError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(TranscribeError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Transcriber for GeminiTranscriber {
    fn transcribe(&self, text: &str) -> Result<String, TranscribeError> {
        let url = format!("{}/{}:generateContent", API_ROOT, self.model);
        let body = serde_json::to_vec(&request_body(text))
            .map_err(|err| TranscribeError::Decode(err.to_string()))?;

        log::debug!("transcribing {} bytes via {}", text.len(), self.model);

        let response = ureq::post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .send(&body[..])
            .map_err(|err| TranscribeError::Http(err.to_string()))?;

        let bytes = response
            .into_body()
            .read_to_vec()
            .map_err(|err| TranscribeError::Http(err.to_string()))?;

        extract_text(&bytes)
    }
}

fn request_body(text: &str) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        system_instruction: Content {
            parts: vec![Part {
                text: SYSTEM_PROMPT,
            }],
        },
        contents: vec![Content {
            parts: vec![Part { text }],
        }],
    }
}

fn extract_text(bytes: &[u8]) -> Result<String, TranscribeError> {
    let response: GenerateContentResponse =
        serde_json::from_slice(bytes).map_err(|err| TranscribeError::Decode(err.to_string()))?;

    let text: String = response
        .candidates
        .first()
        .map(|candidate| {
            candidate
                .content
                .parts
                .iter()
                .map(|part| part.text.as_str())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(TranscribeError::EmptyResponse);
    }
    Ok(text)
}
