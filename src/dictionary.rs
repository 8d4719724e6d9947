// dictionary.rs - Frequency dictionary loading
// One entry per line, whitespace-separated columns: a term column and a
// non-negative count column, positions configurable per file.

use crate::distance::EditDistance;
use crate::error::Error;
use crate::symspell::SymSpell;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

impl<D: EditDistance> SymSpell<D> {
    /// Load a term/count dictionary file into the index.
    ///
    /// Lines with fewer than two columns, or whose count column is not a
    /// non-negative integer, are skipped. Returns how many lines produced
    /// a new dictionary entry. The below-threshold ledger is cleared once
    /// the whole file has been consumed.
    pub fn load_dictionary(
        &mut self,
        path: &Path,
        term_index: usize,
        count_index: usize,
    ) -> Result<usize, Error> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut loaded = 0usize;
        for line in reader.lines() {
            let line = line?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 2 {
                continue;
            }
            let term = match tokens.get(term_index) {
                Some(term) => *term,
                None => continue,
            };
            let count = match tokens.get(count_index).and_then(|c| c.parse::<u64>().ok()) {
                Some(count) => count,
                None => continue,
            };
            if self.insert(term, count) {
                loaded += 1;
            }
        }
        self.below_threshold.clear();

        info!(
            path = %path.display(),
            loaded,
            words = self.word_count(),
            "dictionary loaded"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use crate::symspell::{SymSpell, Verbosity};
    use crate::DamerauLevenshtein;
    use std::io::Write;

    fn write_dictionary(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_term_count_file() {
        let file = write_dictionary("bonjour 100\nhello 50\n");
        let mut symspell = SymSpell::default();
        let loaded = symspell.load_dictionary(file.path(), 0, 1).unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(symspell.count("bonjour"), Some(100));
        assert_eq!(symspell.count("hello"), Some(50));
        assert_eq!(symspell.max_length(), 7);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let file = write_dictionary("bonjour 100\nbare\nhello fifty\n\nworld 10\n");
        let mut symspell = SymSpell::default();
        let loaded = symspell.load_dictionary(file.path(), 0, 1).unwrap();
        assert_eq!(loaded, 2);
        assert!(symspell.contains("bonjour"));
        assert!(symspell.contains("world"));
        assert!(!symspell.contains("hello"));
        assert!(!symspell.contains("bare"));
    }

    #[test]
    fn test_column_indices_are_respected() {
        let file = write_dictionary("100 bonjour\n50 hello\n");
        let mut symspell = SymSpell::default();
        let loaded = symspell.load_dictionary(file.path(), 1, 0).unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(symspell.count("bonjour"), Some(100));
    }

    #[test]
    fn test_loaded_index_answers_lookups() {
        let file = write_dictionary("bonjour 100\nhello 50\n");
        let mut symspell = SymSpell::default();
        symspell.load_dictionary(file.path(), 0, 1).unwrap();
        let suggestions = symspell.lookup("bonjur", Verbosity::Top, 2);
        assert_eq!(suggestions[0].term, "bonjour");
    }

    #[test]
    fn test_below_threshold_ledger_cleared_after_load() {
        let file = write_dictionary("rare 1\ncommon 10\n");
        let mut symspell = SymSpell::new(DamerauLevenshtein::new(), 2, 7, 2);
        symspell.load_dictionary(file.path(), 0, 1).unwrap();
        assert!(symspell.contains("common"));
        assert!(!symspell.contains("rare"));
        assert!(symspell.below_threshold.is_empty());
        // The pending count did not survive the load boundary.
        assert!(!symspell.insert("rare", 1));
        assert!(!symspell.contains("rare"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut symspell = SymSpell::default();
        assert!(symspell
            .load_dictionary(std::path::Path::new("no/such/file.txt"), 0, 1)
            .is_err());
    }
}
