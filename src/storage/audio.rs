// src/storage/audio.rs
use crate::storage::section_slug;
use crate::utils::error::StorageError;
use std::fs;
use std::path::{Path, PathBuf};

// Format of the PCM returned by the speech endpoint.
const SAMPLE_RATE: u32 = 24_000;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Directory of generated WAV files, shared by all requests.
///
/// Names carry a random suffix, so concurrent writers never collide.
#[derive(Debug, Clone)]
pub struct AudioStore {
    dir: PathBuf,
}

impl AudioStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes raw 16-bit little-endian mono PCM as a WAV file and returns
    /// its file name, `{ticker}_{section}_{hex}.wav`.
    pub fn save_wav(&self, ticker: &str, section: &str, pcm: &[u8]) -> Result<String, StorageError> {
        let ticker: String = ticker
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '.')
            .collect();
        let filename = format!(
            "{}_{}_{}.wav",
            ticker.to_uppercase(),
            section_slug(section),
            uuid::Uuid::new_v4().simple()
        );
        let path = self.dir.join(&filename);

        let spec = hound::WavSpec {
            channels: CHANNELS,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: BITS_PER_SAMPLE,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec)?;
        for frame in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([frame[0], frame[1]]))?;
        }
        writer.finalize()?;

        tracing::info!("Saved audio file: {} ({} bytes of PCM)", filename, pcm.len());
        Ok(filename)
    }

    /// Path of a previously saved file. Names that could escape the
    /// directory are rejected.
    pub fn resolve(&self, filename: &str) -> Result<PathBuf, StorageError> {
        let valid = !filename.is_empty()
            && !filename.contains("..")
            && !filename.contains('/')
            && !filename.contains('\\')
            && filename.ends_with(".wav");
        if !valid {
            return Err(StorageError::InvalidFileName(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn scratch_store() -> (TempDir, AudioStore) {
        let dir = tempdir().unwrap();
        let store = AudioStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_save_wav_names_and_header() {
        let (_dir, store) = scratch_store();
        let pcm: Vec<u8> = [0i16, 1000, -1000, 32767]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();

        let name = store.save_wav("aapl", "risk factors", &pcm).unwrap();
        assert!(name.starts_with("AAPL_risk_factors_"));
        assert!(name.ends_with(".wav"));

        let reader = hound::WavReader::open(store.dir().join(&name)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.channels, 1);
        let samples: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0, 1000, -1000, 32767]);

    }

    #[test]
    fn test_names_are_unique() {
        let (_dir, store) = scratch_store();
        let a = store.save_wav("KO", "Business", &[0, 0]).unwrap();
        let b = store.save_wav("KO", "Business", &[0, 0]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let (_dir, store) = scratch_store();
        assert!(store.resolve("AAPL_business_abc.wav").is_ok());
        assert!(matches!(store.resolve("../secret.wav"), Err(StorageError::InvalidFileName(_))));
        assert!(matches!(store.resolve("a/b.wav"), Err(StorageError::InvalidFileName(_))));
        assert!(matches!(store.resolve("notes.txt"), Err(StorageError::InvalidFileName(_))));
    }
}
