//! WAV file writer for offline renders.
//!
//! Interleaved 16-bit stereo PCM, encoded by `hound`.

use std::io::{Seek, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

pub const CHANNELS: u16 = 2;
pub const BITS_PER_SAMPLE: u16 = 16;

fn spec(sample_rate: u32) -> WavSpec {
    WavSpec {
        channels: CHANNELS,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    }
}

/// Write interleaved stereo samples to `path`.
///
/// # Arguments
/// * `samples` - Interleaved left/right pairs
/// * `sample_rate` - Sample rate in Hz
pub fn write_wav_stereo16(
    path: impl AsRef<Path>,
    samples: &[i16],
    sample_rate: u32,
) -> hound::Result<()> {
    let writer = WavWriter::create(path, spec(sample_rate))?;
    write_samples(writer, samples)
}

/// Same as [`write_wav_stereo16`] but into any seekable writer.
pub fn write_wav<W: Write + Seek>(out: W, samples: &[i16], sample_rate: u32) -> hound::Result<()> {
    let writer = WavWriter::new(out, spec(sample_rate))?;
    write_samples(writer, samples)
}

fn write_samples<W: Write + Seek>(mut writer: WavWriter<W>, samples: &[i16]) -> hound::Result<()> {
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use hound::WavReader;

    use super::*;

    #[test]
    fn reads_back_as_stereo_pcm() {
        let mut data = Cursor::new(Vec::new());
        write_wav(&mut data, &[1, -1, i16::MAX, i16::MIN], 44_100).unwrap();

        let bytes = data.into_inner();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");

        let mut reader = WavReader::new(Cursor::new(bytes)).unwrap();
        assert_eq!(reader.spec(), spec(44_100));
        assert_eq!(reader.duration(), 2);
        let samples: Vec<i16> = reader.samples::<i16>().map(Result::unwrap).collect();
        assert_eq!(samples, vec![1, -1, i16::MAX, i16::MIN]);
    }

    #[test]
    fn writes_file() {
        let path = std::env::temp_dir().join("pianola_wav_test.wav");
        write_wav_stereo16(&path, &[0; 64], 22_050).unwrap();
        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 22_050);
        assert_eq!(reader.len(), 64);
        std::fs::remove_file(&path).unwrap();
    }
}
