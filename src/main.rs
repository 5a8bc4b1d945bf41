use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use solace_companion::emotion::FrameClassifier;
use solace_companion::llm::{LlmClient, ResponseGenerator};
use solace_companion::voice::{
    AudioCapture, AudioPlayback, ClipSource, Speaker, SynthesizeSpeech, Transcriber, TtsClient,
    WakeGate,
};
use solace_companion::{Config, Orchestrator};

/// Solace - voice-driven emotional support companion
#[derive(Parser)]
#[command(name = "solace", version, about)]
struct Cli {
    /// Wake phrase to wait for before starting the session (e.g. "hey solace")
    #[arg(long, env = "SOLACE_WAKE_PHRASE")]
    wake: Option<String>,

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
        #[arg(default_value = "Hello! I am Solace, your companion for emotional support.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // API keys commonly live in a local .env during development
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,solace_companion=info",
        1 => "info,solace_companion=debug",
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

    let mut config = Config::load()?;
    if cli.wake.is_some() {
        config.wake_phrase = cli.wake;
    }

    tracing::info!(
        name = %config.companion_name,
        wake = ?config.wake_phrase,
        "starting solace companion"
    );

    let capture = AudioCapture::new(config.capture.sample_rate, config.capture.duration)?;
    let transcriber = Transcriber::new(
        config.stt.api_url.clone(),
        config.stt.api_key.clone(),
        config.stt.model.clone(),
        config.stt.language_hint.clone(),
    )?;
    let llm = LlmClient::new(
        config.llm.api_url.clone(),
        config.llm.api_key.clone(),
        config.llm.model.clone(),
        config.llm.max_tokens,
    )?;
    let generator = ResponseGenerator::new(Box::new(llm), config.companion_name.clone());
    let tts = TtsClient::new(
        config.tts.api_url.clone(),
        config.tts.api_key.clone(),
        config.tts.model.clone(),
        config.tts.voice.clone(),
        config.tts.speed,
    )?;
    let playback = AudioPlayback::new()?;
    let speaker = Speaker::new(Box::new(tts), playback, config.tts.mode);

    // No facial backend ships with the binary; estimation runs text-only
    // unless a camera-backed classifier is wired in here
    let facial: Option<Arc<dyn FrameClassifier>> = None;
    if config.facial_emotion {
        tracing::warn!("facial emotion enabled but no camera backend available, using text only");
    }

    let wake_gate = config.wake_phrase.as_deref().map(WakeGate::new);

    let mut orchestrator = Orchestrator::new(
        Box::new(capture),
        Box::new(transcriber),
        generator,
        Box::new(speaker),
        facial,
        config.data_dir.clone(),
    );

    orchestrator.run(wake_gate.as_ref()).await?;

    Ok(())
}

/// Test microphone input
#[allow(clippy::future_not_send)]
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new(
        solace_companion::voice::SAMPLE_RATE,
        Duration::from_secs(1),
    )?;

    println!("Sample rate: {} Hz", solace_companion::voice::SAMPLE_RATE);
    println!("---");

    for i in 0..duration {
        let clip = match capture.capture().await {
            Ok(clip) => clip,
            Err(e) => {
                println!("[{:2}s] {e}", i + 1);
                continue;
            }
        };

        let mean = clip.mean_abs_amplitude();
        let rms = calculate_rms(&clip.samples);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = ((rms / 32768.0) * 400.0).min(50.0) as usize;
        let meter: String = "█".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!("[{:2}s] RMS: {rms:8.1} | Mean: {mean:8.1} | [{meter}]", i + 1);
    }

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");
    println!("If the levels stayed near 0, check:");
    println!("  1. Is your mic plugged in?");
    println!("  2. Run: pactl info | grep 'Default Source'");
    println!("  3. Run: arecord -l (to list devices)");

    Ok(())
}

/// Calculate RMS energy of i16 samples
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;

    // Generate 2 seconds of 440Hz sine wave at 24kHz sample rate
    let sample_rate = 24000_i32;
    let frequency = 440.0_f32;
    let duration_secs = 2.0_f32;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let num_samples = (sample_rate as f32 * duration_secs) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    println!("Playing {} samples at {} Hz...", samples.len(), sample_rate);

    playback.play_samples(samples).await?;

    println!("\n---");
    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Test TTS synthesis and playback
async fn test_tts(text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load()?;

    let tts = TtsClient::new(
        config.tts.api_url.clone(),
        config.tts.api_key.clone(),
        config.tts.model.clone(),
        config.tts.voice.clone(),
        config.tts.speed,
    )?;

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text, "english").await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    println!("Playing audio...");
    let playback = AudioPlayback::new()?;
    playback.play_mp3(&mp3_data).await?;

    println!("\n---");
    println!("If you heard the speech, TTS is working!");

    Ok(())
}
