use super::types::{AudioError, Waveform};
use hound::{SampleFormat, WavReader};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Default transcoder executable, resolved through `PATH`.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Loads recordings from disk into [`Waveform`]s.
///
/// WAV files are decoded directly. Any other container is first
/// transcoded by an external `ffmpeg` into a sibling `.wav` file, which
/// later loads reuse instead of transcoding again.
#[derive(Debug, Clone)]
pub struct AudioLoader {
    ffmpeg: PathBuf,
}

impl Default for AudioLoader {
    fn default() -> Self {
        AudioLoader {
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
        }
    }
}

impl AudioLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a specific transcoder executable.
    pub fn with_ffmpeg<P: Into<PathBuf>>(ffmpeg: P) -> Self {
        AudioLoader {
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Loads a recording with all of its channels.
    ///
    /// # Arguments
    /// * `path` - WAV file, or any container the transcoder understands
    ///
    /// # Returns
    /// * `Result<Waveform, AudioError>` - Decoded samples in [-1, 1]
    ///
    /// # Errors
    /// * If the file does not exist
    /// * If transcoding fails or the transcoder cannot be started
    /// * If the decoded WAV cannot be parsed or holds no samples
    pub fn load(&self, path: &Path) -> Result<Waveform, AudioError> {
        if !path.exists() {
            return Err(AudioError::Decode(format!(
                "Audio file not found: {}",
                path.display()
            )));
        }

        let wav_path = if is_wav(path) {
            path.to_path_buf()
        } else {
            self.transcode(path)?
        };

        read_wav_file(&wav_path)
    }

    /// Loads a recording and averages its channels into one.
    pub fn load_mono(&self, path: &Path) -> Result<Waveform, AudioError> {
        Ok(self.load(path)?.downmix())
    }

    /// Converts `path` into a sibling WAV file, reusing an earlier result.
    ///
    /// The transcoder writes into a uniquely named temporary file in the
    /// same directory, which is renamed onto the sibling only after a
    /// successful exit. A sibling that exists is therefore always complete,
    /// and concurrent loads of the same source never observe a partial file.
    fn transcode(&self, path: &Path) -> Result<PathBuf, AudioError> {
        let wav_path = path.with_extension("wav");
        if wav_path.exists() {
            tracing::debug!("Reusing transcoded file {}", wav_path.display());
            return Ok(wav_path);
        }

        let parent = match wav_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let partial = tempfile::Builder::new()
            .prefix(".transcode-")
            .suffix(".wav")
            .tempfile_in(parent)?;

        tracing::info!(
            "Transcoding {} to {} with {}",
            path.display(),
            wav_path.display(),
            self.ffmpeg.display()
        );

        let output = Command::new(&self.ffmpeg)
            .arg("-nostdin")
            .arg("-loglevel")
            .arg("error")
            .arg("-y")
            .arg("-i")
            .arg(path)
            .arg(partial.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                AudioError::Decode(format!(
                    "Failed to run transcoder {}: {}",
                    self.ffmpeg.display(),
                    e
                ))
            })?;

        // Dropping `partial` on an early return removes the temporary file
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AudioError::Decode(format!(
                "Transcoder exited with code {:?}: {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        partial
            .persist(&wav_path)
            .map_err(|e| AudioError::Io(e.error))?;

        Ok(wav_path)
    }
}

/// Loads a recording with the default loader.
pub fn load_audio(path: &Path) -> Result<Waveform, AudioError> {
    AudioLoader::default().load(path)
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("wav"))
        .unwrap_or(false)
}

/// Decodes a WAV file into a [`Waveform`].
///
/// Float files must be 32-bit. Integer files of any depth up to 32 bits are
/// scaled by their full-scale value, so every sample lands in [-1, 1].
///
/// # Arguments
/// * `path` - WAV file on disk
///
/// # Returns
/// * `Result<Waveform, AudioError>` - Interleaved samples with the file's
///   sample rate and channel count
///
/// # Errors
/// * `Decode` if the file is not a readable WAV, uses an unsupported
///   sample format, or holds no complete frame
pub fn read_wav_file(path: &Path) -> Result<Waveform, AudioError> {
    let reader = WavReader::open(path).map_err(decode_error)?;
    let spec = reader.spec();

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => collect_samples(reader, |s: f32| s)?,
        (SampleFormat::Int, bits @ 1..=32) => {
            let full_scale = (1u64 << (bits - 1)) as f32;
            collect_samples(reader, |s: i32| s as f32 / full_scale)?
        }
        (format, bits) => {
            return Err(AudioError::Decode(format!(
                "{}: {:?} samples at {} bits are not supported",
                path.display(),
                format,
                bits
            )))
        }
    };

    tracing::debug!(
        "Decoded {} samples ({} channels) at {}Hz from {}",
        samples.len(),
        spec.channels,
        spec.sample_rate,
        path.display()
    );

    // An empty or header-only file is a decoding failure, not a short signal
    Waveform::new(samples, spec.sample_rate, spec.channels).map_err(|e| match e {
        AudioError::DegenerateSignal(_) => {
            AudioError::Decode(format!("No samples in {}", path.display()))
        }
        other => AudioError::Decode(other.to_string()),
    })
}

fn collect_samples<S, R, F>(reader: WavReader<R>, convert: F) -> Result<Vec<f32>, AudioError>
where
    S: hound::Sample,
    R: Read,
    F: Fn(S) -> f32,
{
    reader
        .into_samples::<S>()
        .map(|s| s.map(&convert).map_err(decode_error))
        .collect()
}

fn decode_error(e: hound::Error) -> AudioError {
    AudioError::Decode(e.to_string())
}
