//! Diversity archive of high-scoring parameter sets.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::compute::FeatureVector;
use crate::schema::{ArchiveConfig, Params};

/// An archived pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub params: Params,
    pub fitness: f32,
    pub features: FeatureVector,
    /// Pattern age (steps) when archived.
    pub age: u64,
}

impl ArchiveEntry {
    /// Sort key: `fitness * entropy * dynamism`.
    #[inline]
    pub fn ranking(&self) -> f32 {
        self.fitness * self.features.diversity()
    }
}

/// Bounded set of patterns, kept sorted by [`ArchiveEntry::ranking`]
/// (highest first).
#[derive(Debug, Clone, Default)]
pub struct PatternArchive {
    entries: Vec<ArchiveEntry>,
    config: ArchiveConfig,
}

impl PatternArchive {
    /// Create a new archive.
    pub fn new(config: ArchiveConfig) -> Self {
        Self {
            entries: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// Whether `features` are far enough from everything archived.
    ///
    /// Always true while the archive holds fewer than `diversity_floor`
    /// entries.
    pub fn is_novel(&self, features: &FeatureVector) -> bool {
        self.entries.len() < self.config.diversity_floor
            || self
                .entries
                .iter()
                .all(|e| e.features.shape_distance(features) > self.config.diversity_threshold)
    }

    /// Offer a candidate. Returns true if it was stored.
    ///
    /// Candidates must clear the fitness and age gates and be novel. An
    /// accepted candidate may still be truncated straight back out if it
    /// ranks below a full archive; in that case this returns false.
    pub fn offer(&mut self, entry: ArchiveEntry) -> bool {
        if entry.fitness <= self.config.min_fitness
            || entry.age <= self.config.min_age
            || !self.is_novel(&entry.features)
        {
            return false;
        }

        let rank = entry.ranking();
        // Insert after any equal-ranked entries to keep the order stable.
        let pos = self.entries.partition_point(|e| e.ranking() >= rank);
        self.entries.insert(pos, entry);
        self.entries.truncate(self.config.capacity);
        pos < self.entries.len()
    }

    /// Entries sorted by ranking, highest first.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// The best `n` entries (fewer if the archive is smaller).
    pub fn top(&self, n: usize) -> &[ArchiveEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Uniform pick among the best `pool` entries, with its rank.
    pub fn pick_top<R: Rng + ?Sized>(&self, pool: usize, rng: &mut R) -> Option<(usize, &ArchiveEntry)> {
        let candidates = self.top(pool.max(1));
        if candidates.is_empty() {
            return None;
        }
        let rank = rng.gen_range(0..candidates.len());
        Some((rank, &candidates[rank]))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Serialize the entries as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn features(symmetry: f32, complexity: f32, entropy: f32) -> FeatureVector {
        FeatureVector {
            symmetry,
            complexity,
            entropy,
            dynamism: 0.5,
            ..Default::default()
        }
    }

    fn entry(fitness: f32, features: FeatureVector) -> ArchiveEntry {
        ArchiveEntry {
            params: Params::default(),
            fitness,
            features,
            age: 100,
        }
    }

    #[test]
    fn test_gates() {
        let mut archive = PatternArchive::default();
        let f = features(0.5, 0.5, 0.5);

        assert!(!archive.offer(entry(0.6, f)));
        assert!(!archive.offer(ArchiveEntry {
            age: 50,
            ..entry(0.9, f)
        }));
        assert!(archive.is_empty());

        assert!(archive.offer(entry(0.61, f)));
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_diversity_floor() {
        let mut archive = PatternArchive::default();
        let f = features(0.5, 0.5, 0.5);

        // The first three are accepted regardless of similarity.
        for _ in 0..3 {
            assert!(archive.offer(entry(0.8, f)));
        }
        assert!(!archive.offer(entry(0.8, f)));

        // Distance 0.31 from every entry.
        assert!(archive.offer(entry(0.8, features(0.81, 0.5, 0.5))));
        // Distance exactly 0.3 is not enough.
        assert!(!archive.offer(entry(0.8, features(0.5, 0.8, 0.5))));
        assert_eq!(archive.len(), 4);
    }

    #[test]
    fn test_sorted_and_truncated() {
        let config = ArchiveConfig {
            capacity: 3,
            diversity_floor: usize::MAX,
            ..Default::default()
        };
        let mut archive = PatternArchive::new(config);
        let f = features(0.5, 0.5, 0.5);

        for fitness in [0.7, 0.9, 0.8] {
            assert!(archive.offer(entry(fitness, f)));
        }
        assert!(archive.offer(entry(0.95, f)));
        assert!(!archive.offer(entry(0.65, f)));

        let fits: Vec<f32> = archive.entries().iter().map(|e| e.fitness).collect();
        assert_eq!(fits, vec![0.95, 0.9, 0.8]);
        assert_eq!(archive.top(2).len(), 2);
        assert_eq!(archive.top(10).len(), 3);
    }

    #[test]
    fn test_equal_rank_keeps_insertion_order() {
        let config = ArchiveConfig {
            diversity_floor: usize::MAX,
            ..Default::default()
        };
        let mut archive = PatternArchive::new(config);
        let f = features(0.5, 0.5, 0.5);

        for age in [60, 70, 80] {
            archive.offer(ArchiveEntry { age, ..entry(0.8, f) });
        }
        let ages: Vec<u64> = archive.entries().iter().map(|e| e.age).collect();
        assert_eq!(ages, vec![60, 70, 80]);
    }

    #[test]
    fn test_unbounded_capacity() {
        let mut archive = PatternArchive::new(ArchiveConfig {
            capacity: usize::MAX,
            ..Default::default()
        });
        assert!(archive.offer(entry(0.8, features(0.1, 0.1, 0.1))));
        assert!(archive.offer(entry(0.9, features(0.9, 0.9, 0.9))));
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.entries()[0].fitness, 0.9);
    }

    #[test]
    fn test_pick_top() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut archive = PatternArchive::default();
        assert!(archive.pick_top(3, &mut rng).is_none());

        for (i, s) in [0.0, 0.4, 0.8, 0.2].into_iter().enumerate() {
            archive.offer(entry(0.7 + i as f32 * 0.05, features(s, s, s)));
        }
        assert_eq!(archive.len(), 4);

        for _ in 0..50 {
            let (rank, picked) = archive.pick_top(3, &mut rng).unwrap();
            assert!(rank < 3);
            assert_eq!(picked, &archive.entries()[rank]);
        }
    }

    #[test]
    fn test_to_json_shape() {
        let mut archive = PatternArchive::default();
        archive.offer(entry(0.8, features(0.1, 0.2, 0.3)));
        let value: serde_json::Value = serde_json::from_str(&archive.to_json().unwrap()).unwrap();
        let first = &value[0];
        assert!(first["params"]["feed_rate"].is_number());
        assert!(first["features"]["entropy"].is_number());
        assert_eq!(first["age"], 100);
    }

    proptest! {
        #[test]
        fn prop_bounded_and_sorted(
            offers in prop::collection::vec(
                (0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0, 0.0f32..1.0, 0u64..200),
                0..80,
            )
        ) {
            let mut archive = PatternArchive::default();
            for (fitness, s, c, e, d, age) in offers {
                let features = FeatureVector {
                    symmetry: s,
                    complexity: c,
                    entropy: e,
                    dynamism: d,
                    ..Default::default()
                };
                archive.offer(ArchiveEntry { params: Params::default(), fitness, features, age });
            }

            prop_assert!(archive.len() <= 10);
            for pair in archive.entries().windows(2) {
                prop_assert!(pair[0].ranking() >= pair[1].ranking());
            }
            for e in archive.entries() {
                prop_assert!(e.fitness > 0.6);
                prop_assert!(e.age > 50);
            }
        }
    }
}
