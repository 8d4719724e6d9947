// symspell.rs - Symmetric-delete index and single-term lookup
// Every dictionary word is indexed under each variant reachable by deleting
// up to max_dictionary_edit_distance chars of its prefix; lookup walks the
// same variant space from the query side and meets it in the middle.

use crate::distance::{compare_by_distance_then_count, DamerauLevenshtein, EditDistance};
use ahash::{AHashMap, AHashSet};

pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;
pub const DEFAULT_PREFIX_LENGTH: usize = 7;
pub const DEFAULT_COUNT_THRESHOLD: u64 = 1;

/// A candidate correction: a dictionary term, its edit distance to the
/// query, and the term's frequency.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub term: String,
    pub distance: usize,
    pub count: u64,
}

impl Suggestion {
    pub(crate) fn new(term: String, distance: usize, count: u64) -> Self {
        Self {
            term,
            distance,
            count,
        }
    }
}

/// Two suggestions are the same correction when their terms match.
impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Eq for Suggestion {}

/// Result-set policy for single-term lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// The single best suggestion: closest distance, then highest count.
    Top,
    /// Every suggestion at the smallest edit distance found.
    Closest,
    /// Everything within the edit-distance budget, no early termination.
    All,
}

/// Symmetric-delete spelling index.
///
/// Words are interned into `word_list` in insertion order and the deletion
/// map stores indices into it, so each term string is kept once no matter
/// how many variants point at it. The map is keyed directly on the variant
/// string; the lookup filters absorb a colliding bucket either way.
pub struct SymSpell<D: EditDistance = DamerauLevenshtein> {
    pub(crate) distance: D,
    pub(crate) max_dictionary_edit_distance: usize,
    pub(crate) prefix_length: usize,
    pub(crate) count_threshold: u64,
    pub(crate) words: AHashMap<String, u64>,
    pub(crate) below_threshold: AHashMap<String, u64>,
    pub(crate) word_list: Vec<String>,
    pub(crate) deletes: AHashMap<String, Vec<u32>>,
    pub(crate) max_length: usize,
}

impl Default for SymSpell<DamerauLevenshtein> {
    fn default() -> Self {
        Self::new(
            DamerauLevenshtein::new(),
            DEFAULT_MAX_EDIT_DISTANCE,
            DEFAULT_PREFIX_LENGTH,
            DEFAULT_COUNT_THRESHOLD,
        )
    }
}

impl<D: EditDistance> SymSpell<D> {
    /// Create an empty index.
    ///
    /// `max_dictionary_edit_distance` bounds both deletion generation at
    /// insert time and the budget accepted by [`lookup`](Self::lookup);
    /// only the first `prefix_length` chars of a word (at least one)
    /// participate in deletion generation; terms below `count_threshold`
    /// are parked until their accumulated count reaches it.
    pub fn new(
        distance: D,
        max_dictionary_edit_distance: usize,
        prefix_length: usize,
        count_threshold: u64,
    ) -> Self {
        Self {
            distance,
            max_dictionary_edit_distance,
            prefix_length: prefix_length.max(1),
            count_threshold,
            words: AHashMap::new(),
            below_threshold: AHashMap::new(),
            word_list: Vec::new(),
            deletes: AHashMap::new(),
            max_length: 0,
        }
    }

    /// Number of terms in the main dictionary.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Length in chars of the longest stored term.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Whether `term` resides in the main dictionary.
    pub fn contains(&self, term: &str) -> bool {
        self.words.contains_key(term)
    }

    /// Frequency count of `term`, if stored.
    pub fn count(&self, term: &str) -> Option<u64> {
        self.words.get(term).copied()
    }

    /// Add `term` with `count` occurrences.
    ///
    /// Counts accumulate across repeated insertions (saturating), and a
    /// term only enters the dictionary once its accumulated count reaches
    /// the configured threshold. A zero count is rejected outright when the
    /// threshold is positive. Returns true iff this call moved the term
    /// into the main dictionary.
    pub fn insert(&mut self, term: &str, count: u64) -> bool {
        if count == 0 && self.count_threshold > 0 {
            return false;
        }

        if self.count_threshold > 1 {
            if let Some(&pending) = self.below_threshold.get(term) {
                let count = pending.saturating_add(count);
                if count < self.count_threshold {
                    self.below_threshold.insert(term.to_string(), count);
                    return false;
                }
                self.below_threshold.remove(term);
                self.commit(term, count);
                return true;
            }
        }

        if let Some(stored) = self.words.get_mut(term) {
            // Already indexed: counts are additive, deletions stay as-is.
            *stored = stored.saturating_add(count);
            return false;
        }

        if count < self.count_threshold {
            self.below_threshold.insert(term.to_string(), count);
            return false;
        }

        self.commit(term, count);
        true
    }

    /// Store a term that cleared the threshold and index its deletions.
    fn commit(&mut self, term: &str, count: u64) {
        self.words.insert(term.to_string(), count);

        let term_len = term.chars().count();
        if term_len > self.max_length {
            self.max_length = term_len;
        }

        let id = self.word_list.len() as u32;
        self.word_list.push(term.to_string());
        for variant in self.edits_prefix(term) {
            self.deletes.entry(variant).or_default().push(id);
        }
    }

    /// All variants reachable by deleting up to the configured number of
    /// chars from the prefix of `key`: the prefix itself, plus the empty
    /// string for words short enough to vanish entirely.
    fn edits_prefix(&self, key: &str) -> AHashSet<String> {
        let mut variants = AHashSet::new();
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= self.max_dictionary_edit_distance {
            variants.insert(String::new());
        }
        let prefix: Vec<char> = if chars.len() > self.prefix_length {
            chars[..self.prefix_length].to_vec()
        } else {
            chars
        };
        variants.insert(prefix.iter().collect());
        self.edits(&prefix, 0, &mut variants);
        variants
    }

    fn edits(&self, word: &[char], edit_distance: usize, variants: &mut AHashSet<String>) {
        let edit_distance = edit_distance + 1;
        if word.len() <= 1 || edit_distance > self.max_dictionary_edit_distance {
            return;
        }
        for index in 0..word.len() {
            let mut shorter: Vec<char> = Vec::with_capacity(word.len() - 1);
            shorter.extend_from_slice(&word[..index]);
            shorter.extend_from_slice(&word[index + 1..]);
            let variant: String = shorter.iter().collect();
            if variants.insert(variant) && edit_distance < self.max_dictionary_edit_distance {
                self.edits(&shorter, edit_distance, variants);
            }
        }
    }

    /// Ranked candidate corrections for `input` within `max_edit_distance`.
    ///
    /// Returns an empty vector when the budget exceeds the value the index
    /// was built with, or when the query is too long to match anything
    /// stored. Results are sorted by distance, then count descending.
    pub fn lookup(
        &self,
        input: &str,
        verbosity: Verbosity,
        max_edit_distance: usize,
    ) -> Vec<Suggestion> {
        if max_edit_distance > self.max_dictionary_edit_distance {
            return Vec::new();
        }
        let input_chars: Vec<char> = input.chars().collect();
        let input_len = input_chars.len();
        if input_len.saturating_sub(max_edit_distance) > self.max_length {
            return Vec::new();
        }

        let mut suggestions: Vec<Suggestion> = Vec::new();
        if let Some(&count) = self.words.get(input) {
            suggestions.push(Suggestion::new(input.to_string(), 0, count));
        }

        // Variants already enqueued, and word ids already scored.
        let mut seen_deletions: AHashSet<String> = AHashSet::new();
        let mut seen_words: AHashSet<u32> = AHashSet::new();

        // Shrinks as better suggestions land (Top and Closest only).
        let mut budget = max_edit_distance;

        let input_prefix_len = input_len.min(self.prefix_length);
        let mut queue: Vec<String> = vec![input_chars[..input_prefix_len].iter().collect()];
        let mut cursor = 0;

        while cursor < queue.len() {
            let candidate = queue[cursor].clone();
            cursor += 1;
            let candidate_chars: Vec<char> = candidate.chars().collect();
            let candidate_len = candidate_chars.len();
            let length_diff = input_prefix_len - candidate_len;

            // The queue grows by one deletion per round, so once the
            // length gap exceeds the budget nothing later can recover.
            if length_diff > budget {
                if verbosity == Verbosity::All {
                    continue;
                }
                break;
            }

            if let Some(ids) = self.deletes.get(&candidate) {
                for &id in ids {
                    let term = &self.word_list[id as usize];
                    if term == input {
                        continue;
                    }
                    let term_chars: Vec<char> = term.chars().collect();
                    let term_len = term_chars.len();
                    // A term shorter than its own deletion is impossible;
                    // equal length with different content is a collision.
                    if term_len.abs_diff(input_len) > budget
                        || term_len < candidate_len
                        || (term_len == candidate_len && term.as_str() != candidate)
                    {
                        continue;
                    }
                    let term_prefix_len = term_len.min(self.prefix_length);
                    if term_prefix_len > input_prefix_len
                        && term_prefix_len - candidate_len > budget
                    {
                        continue;
                    }

                    let distance;
                    if candidate_len == 0 {
                        // The empty variant matches anything short enough.
                        distance = input_len.min(term_len);
                        if distance > budget || !seen_words.insert(id) {
                            continue;
                        }
                    } else if term_len == 1 {
                        distance = if input_chars.contains(&term_chars[0]) {
                            input_len - 1
                        } else {
                            input_len
                        };
                        if distance > budget || !seen_words.insert(id) {
                            continue;
                        }
                    } else {
                        if self.suffix_mismatch(
                            &input_chars,
                            &term_chars,
                            candidate_len,
                            max_edit_distance,
                        ) {
                            continue;
                        }
                        if (verbosity != Verbosity::All
                            && !delete_in_suggestion_prefix(
                                &candidate_chars,
                                &term_chars,
                                self.prefix_length,
                            ))
                            || seen_words.contains(&id)
                        {
                            continue;
                        }
                        seen_words.insert(id);
                        let measured = self.distance.distance(input, term);
                        if measured < 0 {
                            continue;
                        }
                        distance = measured as usize;
                    }

                    if distance <= budget {
                        let count = self.words.get(term).copied().unwrap_or(0);
                        let suggestion = Suggestion::new(term.clone(), distance, count);
                        if !suggestions.is_empty() {
                            match verbosity {
                                Verbosity::Top => {
                                    let best_distance = suggestions[0].distance;
                                    let best_count = suggestions[0].count;
                                    if distance < best_distance
                                        || (distance == best_distance && count > best_count)
                                    {
                                        budget = distance;
                                        suggestions[0] = suggestion;
                                    }
                                    continue;
                                }
                                Verbosity::Closest => {
                                    let best_distance = suggestions[0].distance;
                                    if distance < best_distance {
                                        // A closer cluster obsoletes the old one.
                                        budget = distance;
                                        suggestions.clear();
                                        suggestions.push(suggestion);
                                    } else if distance == best_distance {
                                        suggestions.push(suggestion);
                                    }
                                    continue;
                                }
                                Verbosity::All => {}
                            }
                        }
                        if verbosity != Verbosity::All {
                            budget = distance;
                        }
                        suggestions.push(suggestion);
                    }
                }
            }

            // Grow the frontier with the next round of deletions.
            if length_diff < max_edit_distance && candidate_len <= self.prefix_length {
                if verbosity != Verbosity::All && length_diff > budget {
                    continue;
                }
                for index in 0..candidate_len {
                    let mut shorter: Vec<char> = Vec::with_capacity(candidate_len - 1);
                    shorter.extend_from_slice(&candidate_chars[..index]);
                    shorter.extend_from_slice(&candidate_chars[index + 1..]);
                    let variant: String = shorter.iter().collect();
                    if seen_deletions.insert(variant.clone()) {
                        queue.push(variant);
                    }
                }
            }
        }

        if suggestions.len() > 1 {
            suggestions.sort_by(|a, b| {
                compare_by_distance_then_count(a.distance, a.count, b.distance, b.count)
            });
        }
        suggestions
    }

    /// Cheap rejection before the real distance call: when the unaligned
    /// tails beyond the shared prefix cannot be reconciled by the budget,
    /// the pair cannot be within range.
    fn suffix_mismatch(
        &self,
        input: &[char],
        term: &[char],
        candidate_len: usize,
        max_edit_distance: usize,
    ) -> bool {
        let input_len = input.len();
        let term_len = term.len();
        let len_min = input_len.min(term_len) as i64 - self.prefix_length as i64;

        if self.prefix_length as i64 - max_edit_distance as i64 == candidate_len as i64
            && len_min > 1
        {
            let tail = (len_min - 1) as usize;
            if input[input_len - tail..] != term[term_len - tail..] {
                return true;
            }
        }
        if len_min > 0 {
            let i = input_len - len_min as usize;
            let t = term_len - len_min as usize;
            // The chars at the tail boundary must agree, or at least be a
            // transposition of their neighbors.
            if input[i] != term[t] && (input[i - 1] != term[t] || input[i] != term[t - 1]) {
                return true;
            }
        }
        false
    }
}

/// True when `delete` is a subsequence of the first `prefix_length` chars
/// of `suggestion`, i.e. the variant really is reachable by deleting chars
/// from the suggestion's prefix and not a hash-bucket accident.
fn delete_in_suggestion_prefix(delete: &[char], suggestion: &[char], prefix_length: usize) -> bool {
    if delete.is_empty() {
        return true;
    }
    let suggestion_len = suggestion.len().min(prefix_length);
    let mut j = 0;
    for &c in delete {
        while j < suggestion_len && c != suggestion[j] {
            j += 1;
        }
        if j == suggestion_len {
            return false;
        }
    }
    true
}
