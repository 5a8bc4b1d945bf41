//! Audio capture from microphone
//!
//! Records a fixed-duration mono clip from the default input device. A clip
//! is single-use: it is transcribed once and discarded, or discarded
//! immediately if invalid.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, StreamConfig};
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16_000;

/// Default clip length
pub const CAPTURE_DURATION: Duration = Duration::from_secs(5);

/// Mean absolute amplitude (i16 scale) below which a clip counts as silence
const TOO_QUIET_MEAN_ABS: f32 = 50.0;

/// A captured mono audio clip, 16-bit signed PCM
#[derive(Debug)]
pub struct AudioClip {
    /// Samples per second
    pub sample_rate: u32,
    /// Mono PCM samples
    pub samples: Vec<i16>,
}

impl AudioClip {
    /// Build a clip from f32 samples in `[-1.0, 1.0]`
    #[must_use]
    pub fn from_f32(samples: &[f32], sample_rate: u32) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let samples = samples
            .iter()
            .map(|&s| (s * 32767.0).clamp(-32768.0, 32767.0) as i16)
            .collect();
        Self {
            sample_rate,
            samples,
        }
    }

    /// Clip length in seconds
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_seconds(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Mean absolute amplitude across the whole clip
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn mean_abs_amplitude(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(|&s| f64::from(s).abs()).sum();
        (sum / self.samples.len() as f64) as f32
    }

    /// Mean absolute amplitude of a window of the clip, in samples
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn window_mean_abs(&self, start: usize, len: usize) -> f32 {
        let end = self.samples.len().min(start.saturating_add(len));
        let window = self.samples.get(start..end).unwrap_or_default();
        if window.is_empty() {
            return 0.0;
        }
        let sum: f64 = window.iter().map(|&s| f64::from(s).abs()).sum();
        (sum / window.len() as f64) as f32
    }

    /// Whether the clip is effectively silent
    #[must_use]
    pub fn is_too_quiet(&self) -> bool {
        self.mean_abs_amplitude() < TOO_QUIET_MEAN_ABS
    }

    /// Encode the clip as WAV bytes
    ///
    /// # Errors
    ///
    /// Returns error if WAV encoding fails
    pub fn to_wav(&self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| Error::Audio(e.to_string()))?;

            for &sample in &self.samples {
                writer
                    .write_sample(sample)
                    .map_err(|e| Error::Audio(e.to_string()))?;
            }

            writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
        }

        Ok(cursor.into_inner())
    }

    /// Write the clip to a single-use temporary WAV file, consuming it
    ///
    /// The file is deleted when the returned handle drops, on every path.
    ///
    /// # Errors
    ///
    /// Returns error if encoding or writing fails
    pub fn into_temp_wav(self) -> Result<TempWav> {
        let bytes = self.to_wav()?;
        let file = NamedTempFile::new().map_err(|e| Error::Audio(e.to_string()))?;
        std::fs::write(file.path(), &bytes).map_err(|e| Error::Audio(e.to_string()))?;
        Ok(TempWav { file })
    }
}

/// A temporary WAV artifact, removed when dropped
#[derive(Debug)]
pub struct TempWav {
    file: NamedTempFile,
}

impl TempWav {
    /// Path to the WAV file
    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the file back as bytes
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read
    pub fn read(&self) -> Result<Vec<u8>> {
        std::fs::read(self.file.path()).map_err(|e| Error::Audio(e.to_string()))
    }

    /// Whether the file parses as a WAV container with at least one channel
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_wav(self.file.path())
    }
}

/// WAV validity check: opens as a WAV with channel count > 0
#[must_use]
pub fn is_valid_wav(path: &Path) -> bool {
    hound::WavReader::open(path).is_ok_and(|r| r.spec().channels > 0)
}

/// Something that produces one audio clip per call
///
/// The production implementation records from a microphone; tests script
/// their own clips.
#[async_trait(?Send)]
pub trait ClipSource {
    /// Capture one clip, blocking the turn for the capture duration
    ///
    /// # Errors
    ///
    /// Returns error if the device is unavailable or the clip is too quiet
    async fn capture(&mut self) -> Result<AudioClip>;
}

/// Captures fixed-duration clips from the default input device
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    duration: Duration,
}

impl AudioCapture {
    /// Create a new audio capture instance
    ///
    /// # Errors
    ///
    /// Returns error if no suitable input device or config is found
    pub fn new(sample_rate: u32, duration: Duration) -> Result<Self> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Capture("no input device available".to_string()))?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Capture(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(sample_rate)
                    && c.max_sample_rate() >= SampleRate(sample_rate)
            })
            .ok_or_else(|| Error::Capture("no suitable audio config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(sample_rate))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate,
            channels = config.channels,
            "audio capture initialized"
        );

        Ok(Self {
            device,
            config,
            duration,
        })
    }

    /// Record raw f32 samples for the configured duration
    async fn record(&self) -> Result<Vec<f32>> {
        let buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let buffer_clone = Arc::clone(&buffer);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer_clone.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Capture(e.to_string()))?;

        stream.play().map_err(|e| Error::Capture(e.to_string()))?;
        tokio::time::sleep(self.duration).await;
        drop(stream);

        let samples = buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default();

        tracing::debug!(samples = samples.len(), "capture complete");
        Ok(samples)
    }
}

#[async_trait(?Send)]
impl ClipSource for AudioCapture {
    async fn capture(&mut self) -> Result<AudioClip> {
        let samples = self.record().await?;
        let clip = AudioClip::from_f32(&samples, self.config.sample_rate.0);

        if clip.is_too_quiet() {
            tracing::warn!(
                mean_abs = clip.mean_abs_amplitude(),
                "recording too quiet, discarding"
            );
            return Err(Error::Capture("recording too quiet".to_string()));
        }

        Ok(clip)
    }
}
