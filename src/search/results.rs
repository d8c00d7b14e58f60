use std::cmp::Ordering;

/// A record accepted by the search index, with its match score.
///
/// `position` indexes into the record store; `score` is 0.0 for a perfect
/// match and grows with edits and distance from the expected location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub position: usize,
    pub score: f64,
}

impl SearchHit {
    pub fn new(position: usize, score: f64) -> Self {
        SearchHit { position, score }
    }

    /// Best match first, then store order.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.position.cmp(&other.position))
    }
}

/// Order hits best-first, ties by store position.
pub fn rank(hits: &mut [SearchHit]) {
    hits.sort_by(SearchHit::rank_cmp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_score_then_position() {
        let mut hits = vec![
            SearchHit::new(3, 0.2),
            SearchHit::new(0, 0.05),
            SearchHit::new(1, 0.2),
            SearchHit::new(2, 0.0),
        ];
        rank(&mut hits);
        let positions: Vec<usize> = hits.iter().map(|h| h.position).collect();
        assert_eq!(positions, vec![2, 0, 1, 3]);
    }
}
