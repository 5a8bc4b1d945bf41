//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use std::io::Cursor;

use solace_companion::voice::{AudioClip, SAMPLE_RATE, WakeGate, sanitize_text};

mod common;

/// Generate sine wave audio samples
fn generate_sine_samples(frequency: f32, duration_secs: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
        })
        .collect()
}

#[test]
fn sine_clip_is_loud_enough() {
    let samples = generate_sine_samples(440.0, 0.5, 0.3);
    let clip = AudioClip::from_f32(&samples, SAMPLE_RATE);

    assert!(!clip.is_too_quiet());
    assert!((clip.duration_seconds() - 0.5).abs() < 0.01);
}

#[test]
fn silent_clip_is_rejected() {
    let clip = AudioClip::from_f32(&vec![0.0; SAMPLE_RATE as usize], SAMPLE_RATE);
    assert!(clip.is_too_quiet());
}

#[test]
fn near_silence_is_rejected() {
    // Amplitude well under the i16 threshold of 50
    let samples = generate_sine_samples(440.0, 0.5, 0.0005);
    let clip = AudioClip::from_f32(&samples, SAMPLE_RATE);
    assert!(clip.is_too_quiet());
}

#[test]
fn wav_encoding_produces_valid_container() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let clip = AudioClip::from_f32(&samples, SAMPLE_RATE);
    let wav_data = clip.to_wav().unwrap();

    // Check WAV header magic
    assert_eq!(&wav_data[0..4], b"RIFF");
    assert_eq!(&wav_data[8..12], b"WAVE");
    assert!(wav_data.len() > 44); // WAV header is 44 bytes
}

#[test]
fn wav_round_trips_through_hound() {
    let clip = AudioClip {
        sample_rate: SAMPLE_RATE,
        samples: vec![0, 16000, -16000, 32767, -32768, 8000],
    };
    let original = clip.samples.clone();
    let wav_data = clip.to_wav().unwrap();

    let cursor = Cursor::new(wav_data);
    let mut reader = hound::WavReader::new(cursor).unwrap();

    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);

    let read_samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(read_samples, original);
}

#[test]
fn temp_wav_is_removed_on_drop() {
    let clip = AudioClip {
        sample_rate: SAMPLE_RATE,
        samples: vec![1000; 1600],
    };

    let wav = clip.into_temp_wav().unwrap();
    assert!(wav.is_valid());

    let path = wav.path().to_path_buf();
    assert!(path.exists());
    drop(wav);
    assert!(!path.exists());
}

#[test]
fn sanitizer_handles_full_reply() {
    let reply = "I'm glad you shared that. Don't forget: you're not alone & it's okay to rest.";
    let sanitized = sanitize_text(reply);

    assert_eq!(
        sanitized,
        "I am glad you shared that. Do not forget: you are not alone and it is okay to rest."
    );
}

#[test]
fn sanitizer_strips_injection_characters() {
    let sanitized = sanitize_text("\"; say hacked; echo '");
    assert!(!sanitized.contains('"'));
    assert!(!sanitized.contains('\''));
}

#[test]
fn wake_gate_matches_prefix_only() {
    let gate = WakeGate::new("hey solace");

    assert!(gate.matches("Hey Solace, I need to talk"));
    assert!(!gate.matches("so anyway, hey solace"));
    assert!(!gate.matches("hello"));
}
