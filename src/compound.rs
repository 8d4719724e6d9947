// compound.rs - Compound resolution on top of single-term lookup
// Each whitespace token is kept, replaced, merged into its left neighbor,
// or split in two, whichever costs the fewest edits overall.

use crate::distance::EditDistance;
use crate::symspell::{Suggestion, SymSpell, Verbosity};
use rayon::prelude::*;
use tracing::trace;

impl<D: EditDistance> SymSpell<D> {
    /// Correct a whole input string, resolving missing and spuriously
    /// inserted spaces along the way.
    ///
    /// Always returns a single suggestion: `term` is the corrected text,
    /// `count` the lowest count among the chosen parts, and `distance` is
    /// measured against the original input.
    pub fn lookup_compound(&self, input: &str, edit_distance_max: usize) -> Suggestion {
        let terms: Vec<&str> = input.split_whitespace().collect();
        let mut parts: Vec<Suggestion> = Vec::new();
        let mut last_combi = false;

        for (i, &term) in terms.iter().enumerate() {
            let suggestions = self.lookup(term, Verbosity::Top, edit_distance_max);

            // A missing space is one insertion, so absorbing this token
            // into its left neighbor is tried before anything else.
            if i > 0 && !last_combi {
                if let Some(merged) =
                    self.try_merge(terms[i - 1], term, suggestions.first(), parts.last(), edit_distance_max)
                {
                    trace!(left = terms[i - 1], right = term, merged = merged.term.as_str(), "merged tokens");
                    if let Some(slot) = parts.last_mut() {
                        *slot = merged;
                    }
                    last_combi = true;
                    continue;
                }
            }
            last_combi = false;

            if let Some(best) = suggestions.first() {
                if best.distance == 0 || term.chars().count() == 1 {
                    trace!(
                        token = term,
                        choice = best.term.as_str(),
                        distance = best.distance,
                        "kept single-term correction"
                    );
                    parts.push(best.clone());
                    continue;
                }
            }

            parts.push(self.resolve_split(term, &suggestions, edit_distance_max));
        }

        let mut corrected = String::new();
        let mut count = u64::MAX;
        for part in &parts {
            corrected.push_str(&part.term);
            corrected.push(' ');
            count = count.min(part.count);
        }
        let corrected = corrected.trim_end().to_string();
        let measured = self.distance.distance(&corrected, input);
        let distance = if measured < 0 {
            edit_distance_max + 1
        } else {
            measured as usize
        };
        Suggestion::new(corrected, distance, count)
    }

    /// Correct many independent inputs in parallel. Queries only read the
    /// index, so rayon workers share it freely.
    pub fn lookup_compound_batch(
        &self,
        inputs: &[String],
        edit_distance_max: usize,
    ) -> Vec<Suggestion>
    where
        D: Sync,
    {
        inputs
            .par_iter()
            .map(|input| self.lookup_compound(input, edit_distance_max))
            .collect()
    }

    /// Joining the previous token with the current one wins when its
    /// correction needs strictly fewer edits than correcting the pair
    /// separately, counting the dropped space as one extra edit.
    fn try_merge(
        &self,
        previous_term: &str,
        term: &str,
        best: Option<&Suggestion>,
        previous_part: Option<&Suggestion>,
        edit_distance_max: usize,
    ) -> Option<Suggestion> {
        let previous_part = previous_part?;
        let joined = format!("{previous_term}{term}");
        let combi = self
            .lookup(&joined, Verbosity::Top, edit_distance_max)
            .into_iter()
            .next()?;

        let current_best = match best {
            Some(suggestion) => suggestion.term.as_str(),
            None => term,
        };
        let as_pair = format!("{previous_term} {term}");
        let corrected_pair = format!("{} {}", previous_part.term, current_best);
        let pair_distance = self.distance.distance(&as_pair, &corrected_pair);
        if pair_distance > 0 && combi.distance + 1 < pair_distance as usize {
            let mut merged = combi;
            merged.distance += 1;
            return Some(merged);
        }
        None
    }

    /// Try every two-way split of `term`; the cheapest of the splits and
    /// the whole-token correction wins. Falls back to an uncorrectable
    /// marker when nothing fits the budget.
    fn resolve_split(
        &self,
        term: &str,
        suggestions: &[Suggestion],
        edit_distance_max: usize,
    ) -> Suggestion {
        let chars: Vec<char> = term.chars().collect();
        let mut candidates: Vec<Suggestion> = Vec::new();
        if let Some(best) = suggestions.first() {
            candidates.push(best.clone());
        }

        if chars.len() > 1 {
            for j in 1..chars.len() {
                let left: String = chars[..j].iter().collect();
                let right: String = chars[j..].iter().collect();

                let left_best = match self
                    .lookup(&left, Verbosity::Top, edit_distance_max)
                    .into_iter()
                    .next()
                {
                    Some(suggestion) => suggestion,
                    None => continue,
                };
                // The whole-token correction already owns this half, so
                // no split can improve on it.
                if suggestions.first().map_or(false, |s| s.term == left_best.term) {
                    break;
                }
                let right_best = match self
                    .lookup(&right, Verbosity::Top, edit_distance_max)
                    .into_iter()
                    .next()
                {
                    Some(suggestion) => suggestion,
                    None => continue,
                };
                if suggestions.first().map_or(false, |s| s.term == right_best.term) {
                    break;
                }

                let split_term = format!("{} {}", left_best.term, right_best.term);
                let measured = self.distance.distance(term, &split_term);
                let distance = if measured < 0 {
                    edit_distance_max + 1
                } else {
                    measured as usize
                };
                let split = Suggestion::new(
                    split_term,
                    distance,
                    left_best.count.min(right_best.count),
                );
                let unbeatable = split.distance == 1;
                candidates.push(split);
                if unbeatable {
                    break;
                }
            }
        }

        // Fewer edits first; at equal distance the more frequent phrasing.
        candidates.sort_by_key(|s| 2 * (s.distance as i128) - s.count as i128);
        match candidates.into_iter().next() {
            Some(choice) => {
                trace!(
                    token = term,
                    choice = choice.term.as_str(),
                    distance = choice.distance,
                    "resolved split"
                );
                choice
            }
            None => {
                trace!(token = term, "no correction within budget");
                Suggestion::new(term.to_string(), edit_distance_max + 1, 0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::symspell::SymSpell;

    fn sample_index() -> SymSpell {
        let mut symspell = SymSpell::default();
        symspell.insert("bonjour", 100);
        symspell.insert("hello", 50);
        symspell
    }

    #[test]
    fn test_clean_input_round_trips() {
        let symspell = sample_index();
        let result = symspell.lookup_compound("bonjour hello", 2);
        assert_eq!(result.term, "bonjour hello");
        assert_eq!(result.distance, 0);
        assert_eq!(result.count, 50);
    }

    #[test]
    fn test_per_token_replacement() {
        let symspell = sample_index();
        let result = symspell.lookup_compound("bonjur bonjour", 2);
        assert_eq!(result.term, "bonjour bonjour");
        assert_eq!(result.distance, 1);
        assert_eq!(result.count, 100);
    }

    #[test]
    fn test_missing_space_is_split() {
        let symspell = sample_index();
        let result = symspell.lookup_compound("bonjurhello", 2);
        assert_eq!(result.term, "bonjour hello");
        assert!(result.distance <= 2);
        assert_eq!(result.count, 50);
    }

    #[test]
    fn test_replacement_and_clean_token() {
        let symspell = sample_index();
        let result = symspell.lookup_compound("bonjur hello", 2);
        assert_eq!(result.term, "bonjour hello");
        assert_eq!(result.distance, 1);
        assert_eq!(result.count, 50);
    }

    #[test]
    fn test_split_stops_at_single_insertion() {
        let mut symspell = SymSpell::default();
        symspell.insert("hello", 50);
        symspell.insert("world", 40);
        let result = symspell.lookup_compound("helloworld", 2);
        assert_eq!(result.term, "hello world");
        assert_eq!(result.distance, 1);
        assert_eq!(result.count, 40);
    }

    #[test]
    fn test_spurious_space_is_merged() {
        let mut symspell = SymSpell::default();
        symspell.insert("whereabouts", 100);
        symspell.insert("where", 90);

        let result = symspell.lookup_compound("whereab outs", 2);
        assert_eq!(result.term, "whereabouts");
        assert_eq!(result.distance, 1);
        assert_eq!(result.count, 100);
    }

    #[test]
    fn test_tokens_after_merge_still_processed() {
        let mut symspell = SymSpell::default();
        symspell.insert("whereabouts", 100);
        symspell.insert("where", 90);
        symspell.insert("now", 70);

        let result = symspell.lookup_compound("whereab outs now", 2);
        assert_eq!(result.term, "whereabouts now");
        assert_eq!(result.count, 70);
    }

    #[test]
    fn test_adjacent_known_words_stay_apart() {
        let mut symspell = SymSpell::default();
        symspell.insert("note", 80);
        symspell.insert("book", 90);
        symspell.insert("notebook", 100);

        let result = symspell.lookup_compound("note book", 2);
        assert_eq!(result.term, "note book");
        assert_eq!(result.distance, 0);
    }

    #[test]
    fn test_uncorrectable_token_passes_through() {
        let symspell = sample_index();
        let result = symspell.lookup_compound("zzzzzz hello", 2);
        assert_eq!(result.term, "zzzzzz hello");
        assert_eq!(result.count, 0);
        assert_eq!(result.distance, 0);
    }

    #[test]
    fn test_empty_input() {
        let symspell = sample_index();
        let result = symspell.lookup_compound("   ", 2);
        assert_eq!(result.term, "");
        assert_eq!(result.distance, 3);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let symspell = sample_index();
        let lines = vec![
            "bonjur hello".to_string(),
            "bonjurhello".to_string(),
            "bonjour".to_string(),
        ];
        let batch = symspell.lookup_compound_batch(&lines, 2);
        assert_eq!(batch.len(), 3);
        for (line, suggestion) in lines.iter().zip(&batch) {
            assert_eq!(suggestion.term, symspell.lookup_compound(line, 2).term);
        }
    }
}
