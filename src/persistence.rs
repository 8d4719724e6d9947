// persistence.rs - Index snapshots on disk
// bincode envelope, optionally gzip-compressed, written through a sibling
// temp file so a crash never leaves a half-written snapshot behind.

use crate::distance::EditDistance;
use crate::error::Error;
use crate::symspell::SymSpell;
use ahash::AHashMap;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Everything lookup needs, and nothing else: configuration parameters are
/// not part of the snapshot and must match when loading.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    deletes: AHashMap<String, Vec<u32>>,
    words: AHashMap<String, u64>,
    word_list: Vec<String>,
    max_length: usize,
}

impl<D: EditDistance> SymSpell<D> {
    /// Write the index to `path`, replacing any previous snapshot
    /// atomically.
    pub fn save(&self, path: &Path, compressed: bool) -> Result<(), Error> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let snapshot = Snapshot {
            deletes: self.deletes.clone(),
            words: self.words.clone(),
            word_list: self.word_list.clone(),
            max_length: self.max_length,
        };

        let temp = NamedTempFile::new_in(parent)?;
        let writer = BufWriter::new(&temp);
        if compressed {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            bincode::serialize_into(&mut encoder, &snapshot)?;
            encoder.finish()?.flush()?;
        } else {
            let mut writer = writer;
            bincode::serialize_into(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        info!(path = %path.display(), compressed, words = self.words.len(), "index saved");
        Ok(())
    }

    /// Replace this index's dictionary state with a snapshot produced by
    /// [`save`](Self::save). The below-threshold ledger is untouched; the
    /// configured parameters must match the ones the snapshot was built
    /// with.
    pub fn load(&mut self, path: &Path, compressed: bool) -> Result<(), Error> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let snapshot: Snapshot = if compressed {
            bincode::deserialize_from(GzDecoder::new(reader))?
        } else {
            bincode::deserialize_from(reader)?
        };

        self.deletes = snapshot.deletes;
        self.words = snapshot.words;
        self.word_list = snapshot.word_list;
        self.max_length = snapshot.max_length;

        info!(path = %path.display(), words = self.words.len(), "index loaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::symspell::{SymSpell, Verbosity};

    fn sample_index() -> SymSpell {
        let mut symspell = SymSpell::default();
        symspell.insert("bonjour", 100);
        symspell.insert("hello", 50);
        symspell
    }

    fn assert_same_lookups(a: &SymSpell, b: &SymSpell) {
        for query in ["bonjour", "bonjur", "bnojour", "helo", "xyz"] {
            for verbosity in [Verbosity::Top, Verbosity::Closest, Verbosity::All] {
                let expected = a.lookup(query, verbosity, 2);
                let restored = b.lookup(query, verbosity, 2);
                assert_eq!(expected.len(), restored.len(), "query {query:?}");
                for (e, r) in expected.iter().zip(&restored) {
                    assert_eq!(e.term, r.term);
                    assert_eq!(e.distance, r.distance);
                    assert_eq!(e.count, r.count);
                }
            }
        }
    }

    #[test]
    fn test_round_trip_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");

        let symspell = sample_index();
        symspell.save(&path, false).unwrap();

        let mut restored = SymSpell::default();
        restored.load(&path, false).unwrap();
        assert_eq!(restored.word_count(), 2);
        assert_eq!(restored.max_length(), 7);
        assert_same_lookups(&symspell, &restored);
    }

    #[test]
    fn test_round_trip_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin.gz");

        let symspell = sample_index();
        symspell.save(&path, true).unwrap();

        let mut restored = SymSpell::default();
        restored.load(&path, true).unwrap();
        assert_same_lookups(&symspell, &restored);
    }

    #[test]
    fn test_compound_survives_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");

        let symspell = sample_index();
        symspell.save(&path, false).unwrap();

        let mut restored = SymSpell::default();
        restored.load(&path, false).unwrap();
        let result = restored.lookup_compound("bonjur hello", 2);
        assert_eq!(result.term, "bonjour hello");
        assert_eq!(result.distance, 1);
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");

        sample_index().save(&path, false).unwrap();
        let mut bigger = sample_index();
        bigger.insert("world", 10);
        bigger.save(&path, false).unwrap();

        let mut restored = SymSpell::default();
        restored.load(&path, false).unwrap();
        assert_eq!(restored.word_count(), 3);
    }

    #[test]
    fn test_garbage_snapshot_is_a_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        std::fs::write(&path, b"not a snapshot").unwrap();

        let mut symspell = SymSpell::default();
        assert!(matches!(
            symspell.load(&path, false),
            Err(crate::Error::Format(_))
        ));
    }

    #[test]
    fn test_missing_snapshot_is_an_io_error() {
        let mut symspell = SymSpell::default();
        assert!(matches!(
            symspell.load(std::path::Path::new("no/such/snapshot.bin"), false),
            Err(crate::Error::Io(_))
        ));
    }
}
