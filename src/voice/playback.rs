//! Audio playback to speakers

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};

use crate::{Error, Result};

/// Sample rate for playback (matches common TTS output)
const PLAYBACK_SAMPLE_RATE: u32 = 24000;

/// Plays audio to the default output device
pub struct AudioPlayback {
    #[allow(dead_code)]
    device: Device,
    config: StreamConfig,
}

impl AudioPlayback {
    /// Create a new audio playback instance
    ///
    /// # Errors
    ///
    /// Returns error if audio device cannot be opened
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supported_config = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
            })
            .or_else(|| {
                // Fallback: try stereo
                device.supported_output_configs().ok()?.find(|c| {
                    c.channels() == 2
                        && c.min_sample_rate() <= SampleRate(PLAYBACK_SAMPLE_RATE)
                        && c.max_sample_rate() >= SampleRate(PLAYBACK_SAMPLE_RATE)
                })
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(PLAYBACK_SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = PLAYBACK_SAMPLE_RATE,
            channels = config.channels,
            "audio playback initialized"
        );

        Ok(Self { device, config })
    }

    /// Play audio from MP3 bytes, waiting until playback finishes
    ///
    /// # Errors
    ///
    /// Returns error if decoding or playback fails
    pub async fn play_mp3(&self, mp3_data: &[u8]) -> Result<()> {
        let samples = decode_mp3(mp3_data)?;
        self.play_samples(samples).await
    }

    /// Play f32 samples, waiting until playback finishes
    ///
    /// # Errors
    ///
    /// Returns error if playback fails
    pub async fn play_samples(&self, samples: Vec<f32>) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let sample_count = samples.len();
        let channels = self.config.channels as usize;

        let position = Arc::new(Mutex::new(0usize));
        let samples = Arc::new(samples);

        let samples_clone = Arc::clone(&samples);
        let position_clone = Arc::clone(&position);

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let Ok(mut pos) = position_clone.lock() else {
                        return;
                    };

                    for frame in data.chunks_mut(channels) {
                        let sample = samples_clone.get(*pos).copied().unwrap_or(0.0);
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                        if *pos < samples_clone.len() {
                            *pos += 1;
                        }
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio playback error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        // Sleep out the clip duration plus a pad for device latency, then
        // tear the stream down
        let duration_ms =
            (sample_count as u64 * 1000) / u64::from(PLAYBACK_SAMPLE_RATE) + 250;
        tokio::time::sleep(std::time::Duration::from_millis(duration_ms)).await;

        drop(stream);
        tracing::debug!(samples = sample_count, "playback complete");

        Ok(())
    }

    /// Fire-and-forget playback of MP3 bytes on a dedicated thread
    ///
    /// Used by the background speech configuration; failures are logged and
    /// otherwise dropped.
    pub fn play_detached(mp3_data: Vec<u8>) {
        std::thread::spawn(move || {
            let playback = match Self::new() {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!(error = %e, "detached playback unavailable");
                    return;
                }
            };

            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::warn!(error = %e, "detached playback runtime failed");
                    return;
                }
            };

            if let Err(e) = rt.block_on(playback.play_mp3(&mp3_data)) {
                tracing::warn!(error = %e, "detached playback failed");
            }
        });
    }
}

/// Decode MP3 bytes to f32 samples
///
/// # Errors
///
/// Returns error if the data is not decodable MP3
pub fn decode_mp3(mp3_data: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                // Stereo frames are averaged down to mono
                let frame_samples: Vec<f32> = if frame.channels == 2 {
                    frame
                        .data
                        .chunks(2)
                        .map(|chunk| {
                            let left = f32::from(chunk[0]) / 32768.0;
                            let right =
                                f32::from(chunk.get(1).copied().unwrap_or(chunk[0])) / 32768.0;
                            f32::midpoint(left, right)
                        })
                        .collect()
                } else {
                    frame.data.iter().map(|&s| f32::from(s) / 32768.0).collect()
                };

                samples.extend(frame_samples);
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::Audio(format!("MP3 decode error: {e}"))),
        }
    }

    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_decoding() {
        let result = decode_mp3(&[0x00, 0x01, 0x02, 0x03]);
        // minimp3 either skips to EOF (empty) or errors; both are acceptable
        if let Ok(samples) = result {
            assert!(samples.is_empty());
        }
    }

    #[test]
    fn empty_input_decodes_to_nothing() {
        let samples = decode_mp3(&[]).unwrap();
        assert!(samples.is_empty());
    }
}
