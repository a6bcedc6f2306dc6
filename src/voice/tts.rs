//! Text-to-speech: cloud synthesis and the speech output port

use async_trait::async_trait;

use crate::ports::SpeechOutputPort;
use crate::session::{DEFAULT_VOLUME, MAX_VOLUME, MIN_VOLUME};
use crate::voice::playback::{AudioPlayback, PLAYBACK_SAMPLE_RATE, decode_mp3};
use crate::{Error, Result};

/// Capture cue frequency
const CHIME_FREQUENCY: f32 = 800.0;

/// Capture cue duration in seconds
const CHIME_SECONDS: f32 = 0.1;

/// Synthesizes speech via the `OpenAI` TTS API
pub struct SpeechSynthesizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    voice: String,
}

impl SpeechSynthesizer {
    /// Create a new synthesizer
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(api_key: String, model: String, voice: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "OpenAI API key required for speech synthesis".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            voice,
        })
    }

    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if the request fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
        }

        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/audio/speech")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("TTS API error {status}: {body}")));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Speech output port backed by cloud TTS and local playback
///
/// Holds the session output volume and applies it by scaling samples before
/// they reach the device.
pub struct Speaker {
    synthesizer: SpeechSynthesizer,
    playback: AudioPlayback,
    volume: f32,
}

impl Speaker {
    /// Create the port
    ///
    /// # Errors
    ///
    /// Returns error if the output device cannot be opened
    pub fn new(synthesizer: SpeechSynthesizer) -> Result<Self> {
        Ok(Self {
            synthesizer,
            playback: AudioPlayback::new()?,
            volume: DEFAULT_VOLUME,
        })
    }

    fn scaled(&self, samples: Vec<f32>) -> Vec<f32> {
        let volume = self.volume;
        samples.into_iter().map(|s| s * volume).collect()
    }
}

#[async_trait(?Send)]
impl SpeechOutputPort for Speaker {
    async fn speak(&mut self, text: &str) -> Result<()> {
        tracing::debug!(text, "speaking");
        let mp3 = self.synthesizer.synthesize(text).await?;
        let samples = self.scaled(decode_mp3(&mp3)?);
        self.playback.play(samples).await
    }

    async fn chime(&mut self) -> Result<()> {
        let samples = self.scaled(sine_tone(CHIME_FREQUENCY, CHIME_SECONDS));
        self.playback.play(samples).await
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(MIN_VOLUME, MAX_VOLUME);
        tracing::debug!(volume = self.volume, "playback volume set");
    }

    fn volume(&self) -> f32 {
        self.volume
    }
}

/// Generate a sine tone at the playback sample rate
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sine_tone(frequency: f32, duration_secs: f32) -> Vec<f32> {
    let num_samples = (PLAYBACK_SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / PLAYBACK_SAMPLE_RATE as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.5
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_tone_length_and_range() {
        let tone = sine_tone(CHIME_FREQUENCY, CHIME_SECONDS);
        assert_eq!(tone.len(), 2400);
        assert!(tone.iter().all(|s| s.abs() <= 0.5));
    }
}
