use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hearth_assistant::voice::{
    AudioCapture, AudioPlayback, CloudTranscriber, MicTranscriber, Speaker, SpeechSynthesizer,
    rms_energy, sine_tone,
};
use hearth_assistant::{Config, DialogueLoop, GeminiClient};

/// Hearth - wake-word voice assistant
#[derive(Parser)]
#[command(name = "hearth", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,hearth_assistant=info",
        1 => "info,hearth_assistant=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::TestTts { text } => test_tts(&text).await,
        };
    }

    // Missing GEMINI_API_KEY is fatal here, before any device is opened
    let config = Config::load()?;
    tracing::info!(wake_phrases = ?config.wake_phrases, "starting hearth");

    let openai_key = config.api_keys.openai.clone().unwrap_or_default();
    let transcriber = MicTranscriber::new(CloudTranscriber::new(
        openai_key.clone(),
        config.stt_model.clone(),
    )?)?;
    let speaker = Speaker::new(SpeechSynthesizer::new(
        openai_key,
        config.tts_model.clone(),
        config.tts_voice.clone(),
    )?)?;
    let llm = GeminiClient::new(config.api_keys.gemini.clone(), config.llm_model.clone())?;

    // Interrupt channel fed by ctrl-c; observed inside the loop's blocking points
    let (interrupt_tx, mut interrupt_rx) = tokio::sync::mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = interrupt_tx.send(()).await;
        }
    });

    let mut assistant = DialogueLoop::new(transcriber, speaker, llm, config.wake_phrases);

    tracing::info!("hearth ready - say a wake phrase");
    assistant.run(&mut interrupt_rx).await?;

    Ok(())
}

/// Test microphone input with a level meter
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.peek_buffer();
        let energy = rms_energy(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!("[{:2}s] RMS: {energy:.4} | Peak: {peak:.4} | [{meter}]", i + 1);

        capture.clear_buffer();
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If RMS stayed near 0, check your input device and levels.");

    Ok(())
}

/// Test speaker output with a sine tone
async fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let mut playback = AudioPlayback::new()?;
    let samples = sine_tone(440.0, 2.0);

    println!("Playing {} samples...", samples.len());
    playback.play(samples).await?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Test TTS synthesis and playback
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load()?;
    let synthesizer = SpeechSynthesizer::new(
        config.api_keys.openai.unwrap_or_default(),
        config.tts_model,
        config.tts_voice,
    )?;

    println!("Synthesizing speech...");
    let mp3 = synthesizer.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3.len());

    println!("Playing audio...");
    let samples = hearth_assistant::voice::playback::decode_mp3(&mp3)?;
    let mut playback = AudioPlayback::new()?;
    playback.play(samples).await?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
