//! Client for a hosted transcription inference endpoint.
//!
//! The endpoint is an opaque remote call: WAV bytes in, JSON
//! `{ transcription, segments, load_audio_ms, transcribe_ms }` out. There
//! is deliberately no retry and no request timeout here: latency is the
//! observable under test, so a slow call must be measured in full and a
//! failed call must surface unchanged. A hung endpoint hangs the caller.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::{BoxError, TranscriptionOutput, TranscriptionSegment, TranscriptionService};

static DEFAULT_ENDPOINT: Lazy<String> = Lazy::new(|| {
    std::env::var("STT_BENCH_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:8000/transcribe".to_string())
});

static DEFAULT_API_TOKEN: Lazy<Option<String>> =
    Lazy::new(|| std::env::var("STT_BENCH_API_TOKEN").ok());

#[derive(Debug, Clone)]
pub struct HostedEndpointConfig {
    pub url: String,
    pub api_token: Option<String>,
    /// Language hint forwarded as a query parameter.
    pub language: String,
}

impl Default for HostedEndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.clone(),
            api_token: DEFAULT_API_TOKEN.clone(),
            language: "de".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EndpointResponse {
    transcription: String,
    #[serde(default)]
    segments: serde_json::Value,
    #[serde(default)]
    load_audio_ms: f64,
    transcribe_ms: f64,
}

pub struct HostedEndpoint {
    client: reqwest::blocking::Client,
    config: HostedEndpointConfig,
}

impl HostedEndpoint {
    pub fn new(config: HostedEndpointConfig) -> Result<Self, BoxError> {
        // No request timeout: the call blocks for as long as the endpoint
        // takes, and the reported timing must cover the whole run.
        let client = reqwest::blocking::Client::builder().timeout(None).build()?;
        Ok(Self { client, config })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

impl TranscriptionService for HostedEndpoint {
    fn transcribe_file(&mut self, path: &Path) -> Result<TranscriptionOutput, BoxError> {
        let audio = fs::read(path)?;
        log::debug!("posting {} bytes to {}", audio.len(), self.config.url);

        let mut request = self
            .client
            .post(&self.config.url)
            .query(&[("language", self.config.language.as_str())])
            .header("Content-Type", "audio/wav")
            .body(audio);
        if let Some(token) = &self.config.api_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(format!("endpoint returned {status}: {body}").into());
        }

        let raw: serde_json::Value = serde_json::from_str(&body)?;
        // Endpoint-level failures come back in the body; they must never be
        // mapped to an empty transcript.
        if let Some(err) = raw.get("error") {
            return Err(format!("endpoint reported an error: {err}").into());
        }

        let parsed: EndpointResponse = serde_json::from_value(raw)?;
        log::debug!(
            "endpoint transcribed in {:.2} ms (audio load {:.2} ms)",
            parsed.transcribe_ms,
            parsed.load_audio_ms
        );

        Ok(TranscriptionOutput {
            transcription: parsed.transcription,
            segments: parse_segments(&parsed.segments),
            load_audio_ms: parsed.load_audio_ms,
            transcribe_ms: parsed.transcribe_ms,
        })
    }
}

// Segments are an opaque part of the endpoint contract; only the common
// `[{start, end, text}]` shape is decoded, anything else is dropped.
fn parse_segments(value: &serde_json::Value) -> Vec<TranscriptionSegment> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_with_segment_array_decodes_fully() {
        let raw = serde_json::json!({
            "transcription": "guten tag",
            "segments": [{"start": 0.0, "end": 1.2, "text": "guten tag"}],
            "load_audio_ms": 12.5,
            "transcribe_ms": 980.0,
        });

        let parsed: EndpointResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.transcription, "guten tag");
        assert!((parsed.transcribe_ms - 980.0).abs() < f64::EPSILON);

        let segments = parse_segments(&parsed.segments);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "guten tag");
    }

    #[test]
    fn opaque_segments_decode_to_empty() {
        let value = serde_json::json!("1\n00:00:00,000 --> 00:00:01,200\nguten tag");
        assert!(parse_segments(&value).is_empty());
    }

    #[test]
    fn missing_timing_fields_default_to_zero() {
        let raw = serde_json::json!({
            "transcription": "hallo",
            "transcribe_ms": 100.0,
        });

        let parsed: EndpointResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.load_audio_ms, 0.0);
        assert!(parse_segments(&parsed.segments).is_empty());
    }
}
