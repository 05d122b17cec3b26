//! WAV encode/decode for synthesis output.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::EngineError;

/// Raw synthesized audio: mono samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

impl AudioClip {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Write a clip as a 16-bit mono PCM WAV file.
pub fn write_wav(path: impl AsRef<Path>, clip: &AudioClip) -> Result<(), EngineError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer =
        WavWriter::create(path.as_ref(), spec).map_err(|e| EngineError::Audio(e.to_string()))?;

    for &sample in &clip.samples {
        let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| EngineError::Audio(e.to_string()))?;
    }

    writer
        .finalize()
        .map_err(|e| EngineError::Audio(e.to_string()))?;
    Ok(())
}

/// Read a WAV file into an [`AudioClip`], downmixing to mono and
/// normalizing integer formats to f32.
pub fn read_wav(path: impl AsRef<Path>) -> Result<AudioClip, EngineError> {
    let mut reader =
        hound::WavReader::open(path.as_ref()).map_err(|e| EngineError::Audio(e.to_string()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| EngineError::Audio(e.to_string()))?,
        SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| EngineError::Audio(e.to_string()))?
        }
    };

    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    Ok(AudioClip {
        sample_rate: spec.sample_rate,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_preserves_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let clip = AudioClip {
            sample_rate: 22_050,
            samples: (0..2205)
                .map(|i| (i as f32 * 0.01).sin() * 0.5)
                .collect(),
        };
        write_wav(&path, &clip).unwrap();

        let loaded = read_wav(&path).unwrap();
        assert_eq!(loaded.sample_rate, 22_050);
        assert_eq!(loaded.samples.len(), 2205);
        assert!((loaded.duration_secs() - 0.1).abs() < 0.001);

        // 16-bit quantization keeps values close.
        for (a, b) in clip.samples.iter().zip(loaded.samples.iter()) {
            assert!((a - b).abs() < 0.001);
        }
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipped.wav");

        let clip = AudioClip {
            sample_rate: 8_000,
            samples: vec![2.0, -2.0, 0.0],
        };
        write_wav(&path, &clip).unwrap();

        let loaded = read_wav(&path).unwrap();
        assert!(loaded.samples[0] <= 1.0);
        assert!(loaded.samples[1] >= -1.0);
    }

    #[test]
    fn missing_file_is_an_audio_error() {
        assert!(matches!(
            read_wav("/definitely/not/here.wav"),
            Err(EngineError::Audio(_))
        ));
    }
}
