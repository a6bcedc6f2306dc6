//! Speech-to-text: cloud transcription and the microphone transcription port

use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{ListenWindow, TranscriptOutcome, TranscriptionPort};
use crate::voice::capture::{AudioCapture, SAMPLE_RATE, rms_energy, samples_to_wav};
use crate::{Error, Result};

/// Minimum RMS energy to consider a tick speech
const SPEECH_THRESHOLD: f32 = 0.03;

/// Trailing silence that ends an utterance
const ENDPOINT_SILENCE: Duration = Duration::from_millis(800);

/// Poll interval for the capture buffer
const TICK: Duration = Duration::from_millis(100);

/// Response from the Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Transcribes WAV audio via the `OpenAI` Whisper API
pub struct CloudTranscriber {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl CloudTranscriber {
    /// Create a new cloud transcriber
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "OpenAI API key required for speech recognition".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }

    /// Transcribe WAV bytes to text
    ///
    /// # Errors
    ///
    /// Returns error if the request or response parsing fails
    pub async fn transcribe(&self, audio: Vec<u8>) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "starting transcription");

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio)
                    .file_name("utterance.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone());

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/transcriptions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "transcription API error");
            return Err(Error::Stt(format!("transcription API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await?;
        tracing::debug!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}

/// Transcription port backed by the microphone and cloud STT
///
/// Waits for speech to begin within the listen window, records until
/// trailing silence or the phrase cap, and transcribes the result. All
/// expected failures come back as [`TranscriptOutcome`] values.
pub struct MicTranscriber {
    capture: AudioCapture,
    cloud: CloudTranscriber,
}

impl MicTranscriber {
    /// Create the port, starting the capture stream
    ///
    /// # Errors
    ///
    /// Returns error if the microphone cannot be opened
    pub fn new(cloud: CloudTranscriber) -> Result<Self> {
        let mut capture = AudioCapture::new()?;
        capture.start()?;
        Ok(Self { capture, cloud })
    }

    /// Record one utterance, or `None` if no speech began within the window
    async fn record_utterance(&self, window: ListenWindow) -> Option<Vec<f32>> {
        self.capture.clear_buffer();

        // Wait for speech onset
        let mut waited = Duration::ZERO;
        let mut utterance: Vec<f32> = loop {
            if waited >= window.timeout {
                return None;
            }
            tokio::time::sleep(TICK).await;
            waited += TICK;

            let tick_samples = self.capture.take_buffer();
            if rms_energy(&tick_samples) > SPEECH_THRESHOLD {
                break tick_samples;
            }
        };

        // Accumulate until trailing silence or the phrase cap
        let mut silence_run = Duration::ZERO;
        loop {
            let captured = u64::try_from(utterance.len()).unwrap_or(u64::MAX);
            let elapsed = Duration::from_millis(captured.saturating_mul(1000) / u64::from(SAMPLE_RATE));
            if elapsed >= window.max_phrase || silence_run >= ENDPOINT_SILENCE {
                break;
            }

            tokio::time::sleep(TICK).await;
            let tick_samples = self.capture.take_buffer();

            if rms_energy(&tick_samples) > SPEECH_THRESHOLD {
                silence_run = Duration::ZERO;
            } else {
                silence_run += TICK;
            }
            utterance.extend_from_slice(&tick_samples);
        }

        tracing::debug!(samples = utterance.len(), "utterance captured");
        Some(utterance)
    }
}

#[async_trait(?Send)]
impl TranscriptionPort for MicTranscriber {
    async fn listen(&mut self, window: ListenWindow) -> TranscriptOutcome {
        let Some(samples) = self.record_utterance(window).await else {
            return TranscriptOutcome::Timeout;
        };

        let wav = match samples_to_wav(&samples, SAMPLE_RATE) {
            Ok(wav) => wav,
            Err(e) => return TranscriptOutcome::ServiceError(e.to_string()),
        };

        match self.cloud.transcribe(wav).await {
            Ok(text) if text.trim().is_empty() => TranscriptOutcome::NoMatch,
            Ok(text) => TranscriptOutcome::Text(text.trim().to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "transcription service failed");
                TranscriptOutcome::ServiceError(e.to_string())
            }
        }
    }
}
