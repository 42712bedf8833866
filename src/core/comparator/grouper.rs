//! Groups near-duplicate images into clusters using transitive relationships.
//!
//! If A matches B and B matches C, then {A, B, C} forms a single group
//! even if A doesn't directly match C.

use super::{DuplicateGroup, MatchResult, MatchType};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Union-find over photo indices with path halving
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_a] = root_b;
        }
    }
}

/// Per-cluster accumulator
#[derive(Default)]
struct ClusterStats {
    total_distance: f64,
    match_count: usize,
    closest: Option<MatchType>,
}

/// Groups photos into duplicate clusters using transitive relationships
#[derive(Debug, Default)]
pub struct TransitiveGrouper;

impl TransitiveGrouper {
    /// Create a new transitive grouper
    pub fn new() -> Self {
        Self
    }

    /// Group match results into duplicate clusters.
    ///
    /// Groups come back sorted by their first path, photos within a group
    /// sorted by path.
    pub fn group(&self, matches: &[MatchResult]) -> Vec<DuplicateGroup> {
        if matches.is_empty() {
            return Vec::new();
        }

        let mut index: HashMap<&PathBuf, usize> = HashMap::new();
        let mut photos: Vec<&PathBuf> = Vec::new();
        for m in matches {
            for path in [&m.photo_a, &m.photo_b] {
                index.entry(path).or_insert_with(|| {
                    photos.push(path);
                    photos.len() - 1
                });
            }
        }

        let mut set = DisjointSet::new(photos.len());
        for m in matches {
            set.union(index[&m.photo_a], index[&m.photo_b]);
        }

        let mut stats: HashMap<usize, ClusterStats> = HashMap::new();
        for m in matches {
            let root = set.find(index[&m.photo_a]);
            let entry = stats.entry(root).or_default();
            entry.total_distance += m.distance as f64;
            entry.match_count += 1;
            // Variants are declared closest-first
            entry.closest = Some(match entry.closest {
                Some(current) if (current as u8) <= (m.match_type as u8) => current,
                _ => m.match_type,
            });
        }

        let mut members: HashMap<usize, Vec<PathBuf>> = HashMap::new();
        for (i, path) in photos.iter().enumerate() {
            let root = set.find(i);
            members.entry(root).or_default().push((*path).clone());
        }

        let mut ordered: BTreeMap<PathBuf, DuplicateGroup> = BTreeMap::new();
        for (root, mut group_photos) in members {
            if group_photos.len() < 2 {
                continue;
            }
            group_photos.sort();

            let cluster = stats.remove(&root).unwrap_or_default();
            let match_type = cluster.closest.unwrap_or(MatchType::MaybeSimilar);
            let representative = group_photos[0].clone();

            let mut group = DuplicateGroup::new(group_photos, representative.clone(), match_type);
            if cluster.match_count > 0 {
                group.average_distance = cluster.total_distance / cluster.match_count as f64;
            }
            ordered.insert(representative, group);
        }

        ordered.into_values().collect()
    }
}
