use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::speech::{AudioClip, SpeechPayload, SynthesisError, SynthesisRequest, Synthesizer};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ssml: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speaking_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pitch: Option<f64>,
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a SynthesisRequest) -> Self {
        let (text, ssml) = match &request.payload {
            SpeechPayload::Text(t) => (Some(t.as_str()), None),
            SpeechPayload::Ssml(s) => (None, Some(s.as_str())),
        };
        Self {
            text,
            ssml,
            speaking_rate: request.speaking_rate,
            pitch: request.pitch,
        }
    }
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(rename = "audioDataUri")]
    audio_data_uri: String,
}

#[derive(Deserialize)]
struct WireError {
    error: String,
}

/// Blocking client for the synthesis collaborator. One POST per request,
/// 10 s timeout, no retries.
pub struct HttpSynthesizer {
    endpoint: String,
}

impl HttpSynthesizer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

#[cfg(feature = "audio")]
impl Synthesizer for HttpSynthesizer {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<AudioClip, SynthesisError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| SynthesisError::Request(e.to_string()))?;

        let response = client
            .post(&self.endpoint)
            .json(&WireRequest::from_request(request))
            .send()
            .map_err(|e| SynthesisError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<WireError>()
                .map(|e| e.error)
                .unwrap_or_else(|_| format!("status {status}"));
            return Err(SynthesisError::Service(message));
        }

        let parsed: WireResponse = response
            .json()
            .map_err(|e| SynthesisError::Decode(e.to_string()))?;
        decode_data_uri(&parsed.audio_data_uri)
    }
}

#[cfg(not(feature = "audio"))]
impl Synthesizer for HttpSynthesizer {
    fn synthesize(&self, _request: &SynthesisRequest) -> Result<AudioClip, SynthesisError> {
        Err(SynthesisError::Disabled)
    }
}

/// Unpack an inline `data:<mime>;base64,<payload>` audio URI.
pub fn decode_data_uri(uri: &str) -> Result<AudioClip, SynthesisError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| SynthesisError::Decode("not a data URI".into()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| SynthesisError::Decode("data URI has no payload".into()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| SynthesisError::Decode("data URI is not base64".into()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| SynthesisError::Decode(e.to_string()))?;
    Ok(AudioClip {
        mime: mime.to_string(),
        bytes,
    })
}
