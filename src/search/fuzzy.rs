use levenshtein_automata::{DFA, Distance, LevenshteinAutomatonBuilder};

use crate::core::config::SearchConfig;

/// Holds one Levenshtein builder per edit budget.
///
/// Building a builder is the expensive step (it precomputes the parametric
/// automaton), so they are created once with the index and reused per query.
pub struct AutomatonFactory {
    builders: Vec<LevenshteinAutomatonBuilder>,
}

impl AutomatonFactory {
    pub fn new(max_edits: u8) -> Self {
        let builders = (0..=max_edits)
            // Transpositions count as one edit (teh → the)
            .map(|distance| LevenshteinAutomatonBuilder::new(distance, true))
            .collect();
        AutomatonFactory { builders }
    }

    pub fn max_edits(&self) -> u8 {
        (self.builders.len() - 1) as u8
    }

    /// Build the automaton for an already normalized, non-empty pattern.
    pub fn automaton(&self, pattern: &str, threshold: f64) -> FuzzyAutomaton {
        let pattern_len = pattern.chars().count();
        let budget = (threshold * pattern_len as f64).floor().max(0.0) as usize;
        let max_edits = budget.min(self.max_edits() as usize) as u8;

        FuzzyAutomaton {
            pattern_len,
            max_edits,
            dfa: self.builders[max_edits as usize].build_dfa(pattern),
        }
    }
}

/// Best approximate occurrence of the pattern inside a text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatch {
    pub start: usize, // Character offset of the occurrence
    pub edits: u8,
    pub score: f64,
}

/// Automaton for approximate substring matching.
pub struct FuzzyAutomaton {
    pattern_len: usize,
    max_edits: u8,
    dfa: DFA,
}

impl FuzzyAutomaton {
    pub fn max_edits(&self) -> u8 {
        self.max_edits
    }

    /// Score every occurrence of the pattern in `text` and keep the best.
    ///
    /// An occurrence starting at character `s` with `d` edits scores
    /// `d / len(pattern) + |s - location| / distance`; lower is better and
    /// `0.0` is an exact match at the expected location.
    pub fn best_match(&self, text: &str, config: &SearchConfig) -> Option<FuzzyMatch> {
        // No occurrence can span more characters than this
        let window = self.pattern_len + self.max_edits as usize;
        let distance = config.distance.max(1) as f64;
        let mut best: Option<FuzzyMatch> = None;

        for (start, (offset, _)) in text.char_indices().enumerate() {
            let proximity = if config.ignore_location {
                0.0
            } else {
                start.abs_diff(config.location) as f64 / distance
            };

            if let Some(found) = best {
                if found.score == 0.0 || (start >= config.location && proximity >= found.score) {
                    break;
                }
            }

            let Some(edits) = self.edits_from(&text[offset..], window) else {
                continue;
            };

            let score = edits as f64 / self.pattern_len as f64 + proximity;
            if best.map_or(true, |found| score < found.score) {
                best = Some(FuzzyMatch { start, edits, score });
            }
        }

        best
    }

    /// Smallest edit distance between the pattern and any prefix of `text`
    /// that is at most `window` characters long.
    fn edits_from(&self, text: &str, window: usize) -> Option<u8> {
        let mut state = self.dfa.initial_state();
        let mut best = exact(self.dfa.distance(state));
        let mut buf = [0u8; 4];

        for ch in text.chars().take(window) {
            for &byte in ch.encode_utf8(&mut buf).as_bytes() {
                state = self.dfa.transition(state, byte);
            }
            if let Some(d) = exact(self.dfa.distance(state)) {
                best = Some(best.map_or(d, |b| b.min(d)));
                if d == 0 {
                    break;
                }
            }
        }

        best
    }
}

fn exact(distance: Distance) -> Option<u8> {
    match distance {
        Distance::Exact(d) => Some(d),
        Distance::AtLeast(_) => None,
    }
}
