//! Grouping of candidates by secondary key, and small statistics helpers.

use shop_types::Candidate;
use std::collections::HashMap;

/// Arithmetic mean; `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Candidates grouped by identical secondary key, buckets ordered by key descending.
///
/// Items keep their original (relevance-descending) relative order inside a bucket.
/// Entries are indices into the candidate slice the buckets were built from.
#[derive(Debug, Clone)]
pub struct RatingBuckets {
    buckets: Vec<(f64, Vec<usize>)>,
}

impl RatingBuckets {
    pub fn build<F>(candidates: &[Candidate], secondary_key: F) -> Self
    where
        F: Fn(&str) -> f64,
    {
        // f64 is not Hash; identical keys share a bit pattern.
        let mut by_key: HashMap<u64, (f64, Vec<usize>)> = HashMap::new();
        for (idx, c) in candidates.iter().enumerate() {
            let key = secondary_key(&c.id);
            by_key
                .entry(normalize(key).to_bits())
                .or_insert_with(|| (key, Vec::new()))
                .1
                .push(idx);
        }
        let mut buckets: Vec<(f64, Vec<usize>)> = by_key.into_values().collect();
        buckets.sort_by(|a, b| b.0.total_cmp(&a.0));
        Self { buckets }
    }

    /// Candidate indices in walk order: buckets by key descending, relevance order within.
    pub fn walk(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().flat_map(|(_, ids)| ids.iter().copied())
    }
}

/// -0.0 and 0.0 compare equal and must land in one bucket.
fn normalize(key: f64) -> f64 {
    if key == 0.0 {
        0.0
    } else {
        key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cands(items: &[(&str, f64)]) -> Vec<Candidate> {
        items.iter().map(|(id, r)| Candidate::new(*id, *r)).collect()
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([5.0, 4.0, 4.0]), Some(13.0 / 3.0));
    }

    #[test]
    fn buckets_sorted_by_key_descending_and_keep_relevance_order() {
        let c = cands(&[("a", 9.0), ("b", 8.0), ("c", 7.0), ("d", 6.0), ("e", 5.0)]);
        let key = |id: &str| match id {
            "a" | "d" => 4.0,
            "b" => 5.0,
            _ => 3.5,
        };
        let buckets = RatingBuckets::build(&c, key);
        let order: Vec<&str> = buckets.walk().map(|i| c[i].id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "d", "c", "e"]);
    }

    #[test]
    fn empty_candidates_give_no_buckets() {
        assert_eq!(RatingBuckets::build(&[], |_| 1.0).walk().count(), 0);
    }
}
