use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::core::config::SearchConfig;
use crate::core::store::RecordStore;
use crate::core::types::Record;
use crate::search::cache::{CacheStats, SearchCache};
use crate::search::fuzzy::AutomatonFactory;
use crate::search::results::{SearchHit, rank};

/// Fuzzy index over the `name` of every record in a store.
///
/// Positions in the returned hits refer to the store the index was built
/// from; pair an index with exactly one store.
pub struct SearchIndex {
    /// Normalized names, by store position
    names: Vec<String>,

    /// Every position with a neutral score, returned for the empty term
    all: Arc<[SearchHit]>,

    config: SearchConfig,
    automata: AutomatonFactory,
    cache: SearchCache,
}

impl SearchIndex {
    pub fn build(store: &RecordStore, config: &SearchConfig) -> Self {
        let start = Instant::now();
        let names: Vec<String> = store
            .records()
            .iter()
            .map(|record| normalize(&record.name, config.case_sensitive))
            .collect();
        let all = (0..names.len()).map(|position| SearchHit::new(position, 0.0)).collect();

        let index = SearchIndex {
            names,
            all,
            config: config.clone(),
            automata: AutomatonFactory::new(config.max_edits),
            cache: SearchCache::new(config.cache_size),
        };
        info!(
            "Built search index over {} names in {}ms",
            index.names.len(),
            start.elapsed().as_millis()
        );
        index
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Ranked hits for `term`.
    ///
    /// A blank term returns every position in store order without matching.
    pub fn search(&self, term: &str) -> Arc<[SearchHit]> {
        let pattern = normalize(term.trim(), self.config.case_sensitive);
        if pattern.is_empty() {
            return Arc::clone(&self.all);
        }

        if let Some(hits) = self.cache.get(&pattern) {
            trace!("Search cache hit for '{}'", pattern);
            return hits;
        }

        let start = Instant::now();
        let automaton = self.automata.automaton(&pattern, self.config.threshold);
        let mut hits: Vec<SearchHit> = self
            .names
            .iter()
            .enumerate()
            .filter_map(|(position, name)| {
                automaton
                    .best_match(name, &self.config)
                    .filter(|found| found.score <= self.config.threshold)
                    .map(|found| SearchHit::new(position, found.score))
            })
            .collect();
        rank(&mut hits);

        debug!(
            "Search '{}' matched {}/{} names (max {} edits) in {}us",
            pattern,
            hits.len(),
            self.names.len(),
            automaton.max_edits(),
            start.elapsed().as_micros()
        );

        let hits: Arc<[SearchHit]> = hits.into();
        self.cache.put(pattern, Arc::clone(&hits));
        hits
    }

    /// Records for `term`, best match first.
    pub fn search_records<'a>(&self, store: &'a RecordStore, term: &str) -> Vec<&'a Record> {
        self.search(term)
            .iter()
            .filter_map(|hit| store.get(hit.position))
            .collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn normalize(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}
