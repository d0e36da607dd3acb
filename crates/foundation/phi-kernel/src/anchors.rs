//! DodecahedralAnchors - Twelve fixed reference points with pentagonal clusters
//!
//! Layout: the 12 face centres of a regular dodecahedron, i.e. the
//! icosahedron vertices (0, ±1, ±φ), (±1, ±φ, 0), (±φ, 0, ±1) scaled to the
//! unit sphere in axes 1-3. The fourth axis is (axis₁ - axis₂)/φ, which pulls
//! mirror-image faces apart across the two planes of the spiral metric.
//!
//! Ids 1..=12 follow generation order:
//! for s₁ in [+1, -1], for s₂ in [+1, -1]:
//! (0, s₁, s₂φ), (s₁, s₂φ, 0), (s₂φ, 0, s₁)
//!
//! With this layout every anchor's fifth-nearest neighbour is separated from
//! the sixth by at least 0.08, so clusters do not depend on rounding.

use crate::constants::PHI;
use crate::coord::Coordinate;
use crate::spiral::GoldenSpiral;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of anchors
pub const ANCHOR_COUNT: usize = 12;

/// Neighbours in a pentagonal cluster (excluding the anchor itself)
pub const CLUSTER_NEIGHBORS: usize = 5;

/// Relative gap under which two distances count as a tie, broken by lowest id
const TIE_TOLERANCE: f64 = 1e-12;

/// Result of an anchor lookup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorMatch {
    pub id: usize,
    pub distance: f64,
}

fn ties(lead: f64, other: f64) -> bool {
    (other - lead).abs() <= TIE_TOLERANCE * lead.max(other)
}

/// Sort nearest first
///
/// Matches within `TIE_TOLERANCE` of the nearest remaining distance form
/// one group, ordered by id, so rounding noise between mirror-image
/// anchors cannot reorder them.
fn rank(matches: &mut [AnchorMatch]) {
    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));

    let mut start = 0;
    while start < matches.len() {
        let lead = matches[start].distance;
        let group = matches[start + 1..]
            .iter()
            .take_while(|m| ties(lead, m.distance))
            .count()
            + 1;
        matches[start..start + group].sort_by_key(|m| m.id);
        start += group;
    }
}

/// Fixed 12-anchor geometry with precomputed 5-nearest clusters
#[derive(Debug, Clone)]
pub struct DodecahedralAnchors {
    spiral: GoldenSpiral,
    anchors: Vec<Coordinate>,
    /// clusters[id - 1] = [id, five nearest other ids...]
    clusters: Vec<[usize; CLUSTER_NEIGHBORS + 1]>,
}

impl DodecahedralAnchors {
    /// Build the anchor table and its adjacency using the unit spiral
    pub fn new() -> Self {
        Self::with_spiral(GoldenSpiral::new())
    }

    /// Build using a specific spiral for all distance queries
    pub fn with_spiral(spiral: GoldenSpiral) -> Self {
        let anchors = layout();
        let clusters = (1..=ANCHOR_COUNT)
            .map(|id| {
                let origin = &anchors[id - 1];
                let mut others: Vec<AnchorMatch> = anchors
                    .iter()
                    .enumerate()
                    .map(|(i, c)| AnchorMatch {
                        id: i + 1,
                        distance: spiral.distance_4d(origin, c),
                    })
                    .filter(|m| m.id != id)
                    .collect();
                rank(&mut others);

                let mut cluster = [id; CLUSTER_NEIGHBORS + 1];
                for (slot, m) in cluster[1..].iter_mut().zip(&others) {
                    *slot = m.id;
                }
                cluster
            })
            .collect();

        tracing::debug!(anchors = ANCHOR_COUNT, "built dodecahedral anchor adjacency");

        Self {
            spiral,
            anchors,
            clusters,
        }
    }

    /// Anchor coordinate for `id` in 1..=12
    pub fn get_anchor(&self, id: usize) -> Result<&Coordinate> {
        id.checked_sub(1)
            .and_then(|i| self.anchors.get(i))
            .ok_or_else(|| Error::NotFound(format!("anchor {} (valid ids are 1..=12)", id)))
    }

    /// Anchor closest to `point` under the spiral metric; ties go to the lowest id
    pub fn nearest_anchor(&self, point: &Coordinate) -> AnchorMatch {
        let best = self.ranked(point)[0];
        tracing::trace!(id = best.id, distance = best.distance, "nearest anchor");
        best
    }

    /// The `k` closest anchors, nearest first
    pub fn nearest_anchors(&self, point: &Coordinate, k: usize) -> Vec<AnchorMatch> {
        let mut all = self.ranked(point);
        all.truncate(k);
        all
    }

    /// `id` followed by its five nearest other anchors, nearest first
    pub fn get_pentagonal_cluster(&self, id: usize) -> Result<Vec<usize>> {
        self.get_anchor(id)?;
        Ok(self.clusters[id - 1].to_vec())
    }

    /// Spiral distance between two anchors
    pub fn distance_between(&self, a: usize, b: usize) -> Result<f64> {
        Ok(self.spiral.distance_4d(self.get_anchor(a)?, self.get_anchor(b)?))
    }

    /// (id, coordinate) pairs in id order
    pub fn anchors(&self) -> impl Iterator<Item = (usize, &Coordinate)> + '_ {
        self.anchors.iter().enumerate().map(|(i, c)| (i + 1, c))
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Every anchor's distance to `point`, nearest first
    fn ranked(&self, point: &Coordinate) -> Vec<AnchorMatch> {
        let mut all: Vec<AnchorMatch> = self
            .anchors()
            .map(|(id, c)| AnchorMatch {
                id,
                distance: self.spiral.distance_4d(point, c),
            })
            .collect();
        rank(&mut all);
        all
    }
}

impl Default for DodecahedralAnchors {
    fn default() -> Self {
        Self::new()
    }
}

fn layout() -> Vec<Coordinate> {
    let norm = (1.0 + PHI * PHI).sqrt();
    let mut anchors = Vec::with_capacity(ANCHOR_COUNT);

    for s1 in [1.0, -1.0] {
        for s2 in [1.0, -1.0] {
            for [x, y, z] in [[0.0, s1, s2 * PHI], [s1, s2 * PHI, 0.0], [s2 * PHI, 0.0, s1]] {
                let (x, y, z) = (x / norm, y / norm, z / norm);
                anchors.push(Coordinate::from_finite([x, y, z, (x - y) / PHI]));
            }
        }
    }

    anchors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_twelve_distinct_anchors() {
        let anchors = DodecahedralAnchors::new();
        assert_eq!(anchors.len(), ANCHOR_COUNT);

        for (id, c) in anchors.anchors() {
            let [x, y, z, w] = c.components();
            assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-12, "anchor {}", id);
            assert!((w - (x - y) / PHI).abs() < 1e-15);
        }
        for a in 1..=ANCHOR_COUNT {
            for b in (a + 1)..=ANCHOR_COUNT {
                assert!(anchors.distance_between(a, b).unwrap() > 0.5);
            }
        }
    }

    #[test]
    fn test_get_anchor_bounds() {
        let anchors = DodecahedralAnchors::new();
        assert!(anchors.get_anchor(1).is_ok());
        assert!(anchors.get_anchor(12).is_ok());
        assert!(matches!(anchors.get_anchor(0), Err(Error::NotFound(_))));
        assert!(matches!(anchors.get_anchor(13), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_layout_order() {
        let anchors = DodecahedralAnchors::new();
        let norm = (1.0 + PHI * PHI).sqrt();
        let third = anchors.get_anchor(3).unwrap();
        assert!((third.x() - PHI / norm).abs() < 1e-15);
        assert_eq!(third.y(), 0.0);
        assert!((third.z() - 1.0 / norm).abs() < 1e-15);
    }

    #[test]
    fn test_self_is_nearest() {
        let anchors = DodecahedralAnchors::new();
        for (id, c) in anchors.anchors() {
            assert_eq!(anchors.nearest_anchor(c), AnchorMatch { id, distance: 0.0 });
        }
    }

    #[test]
    fn test_cluster_shape() {
        let anchors = DodecahedralAnchors::new();
        for id in 1..=ANCHOR_COUNT {
            let cluster = anchors.get_pentagonal_cluster(id).unwrap();
            assert_eq!(cluster.len(), CLUSTER_NEIGHBORS + 1);
            assert_eq!(cluster[0], id);
            let unique: HashSet<_> = cluster.iter().collect();
            assert_eq!(unique.len(), cluster.len());
            assert!(cluster.iter().all(|&n| (1..=ANCHOR_COUNT).contains(&n)));
        }
        assert!(matches!(anchors.get_pentagonal_cluster(0), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_cluster_is_five_nearest() {
        let anchors = DodecahedralAnchors::new();
        for id in 1..=ANCHOR_COUNT {
            let cluster = anchors.get_pentagonal_cluster(id).unwrap();
            let farthest_in = cluster[1..]
                .iter()
                .map(|&n| anchors.distance_between(id, n).unwrap())
                .fold(0.0, f64::max);
            for other in (1..=ANCHOR_COUNT).filter(|n| !cluster.contains(n)) {
                assert!(anchors.distance_between(id, other).unwrap() > farthest_in + 0.05);
            }
        }
    }

    #[test]
    fn test_known_clusters() {
        let anchors = DodecahedralAnchors::new();
        assert_eq!(anchors.get_pentagonal_cluster(1).unwrap(), vec![1, 6, 7, 3, 8, 4]);
        // 3 and 9 tie on distance from 2, as do 6 and 12: lowest id first
        assert_eq!(anchors.get_pentagonal_cluster(2).unwrap(), vec![2, 3, 9, 8, 6, 12]);
        assert_eq!(anchors.get_pentagonal_cluster(5).unwrap(), vec![5, 3, 9, 7, 10, 11]);
    }

    #[test]
    fn test_nearest_anchors_sorted() {
        let anchors = DodecahedralAnchors::new();
        let point = Coordinate::new(0.2, -0.4, 0.9, 0.1).unwrap();
        let ranked = anchors.nearest_anchors(&point, 4);
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[0], anchors.nearest_anchor(&point));
        for pair in ranked.windows(2) {
            assert!(pair[0].distance <= pair[1].distance || ties(pair[0].distance, pair[1].distance));
        }
        assert_eq!(anchors.nearest_anchors(&point, 50).len(), ANCHOR_COUNT);
    }

    fn midpoint(a: &Coordinate, b: &Coordinate) -> Coordinate {
        let (a, b) = (a.components(), b.components());
        Coordinate::new(
            (a[0] + b[0]) / 2.0,
            (a[1] + b[1]) / 2.0,
            (a[2] + b[2]) / 2.0,
            (a[3] + b[3]) / 2.0,
        )
        .unwrap()
    }

    #[test]
    fn test_nearest_tie_goes_to_lowest_id() {
        let anchors = DodecahedralAnchors::new();
        for (low, high) in [(1, 7), (3, 9), (6, 12)] {
            let point = midpoint(
                anchors.get_anchor(low).unwrap(),
                anchors.get_anchor(high).unwrap(),
            );
            let to_low = anchors.spiral.distance_4d(&point, anchors.get_anchor(low).unwrap());
            let to_high = anchors.spiral.distance_4d(&point, anchors.get_anchor(high).unwrap());
            assert!((to_low - to_high).abs() < 1e-12, "{} / {}", low, high);

            assert_eq!(anchors.nearest_anchor(&point).id, low);
            let ranked = anchors.nearest_anchors(&point, 2);
            assert_eq!((ranked[0].id, ranked[1].id), (low, high));
        }
    }

    #[test]
    fn test_nearest_matches_brute_force_at_any_scale() {
        let anchors = DodecahedralAnchors::new();
        let directions = [
            [1.0, 1.0, 0.0, 0.0],
            [-1.0, 0.3, 1.0, -2.0],
            [0.1, -1.0, -1.0, 0.5],
            [0.2, -0.4, 0.9, 0.1],
        ];

        for scale in [1e-3, 1.0, 1e3, 1e10, 1e15, 1e100, 1e300] {
            for dir in &directions {
                let point = Coordinate::new(
                    dir[0] * scale,
                    dir[1] * scale,
                    dir[2] * scale,
                    dir[3] * scale,
                )
                .unwrap();

                let brute = anchors
                    .anchors()
                    .map(|(id, c)| (id, anchors.spiral.distance_4d(&point, c)))
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .unwrap();

                let best = anchors.nearest_anchor(&point);
                assert_eq!((best.id, best.distance), brute, "scale {} {:?}", scale, dir);
            }
        }
    }

    #[test]
    fn test_far_point_nearest() {
        let anchors = DodecahedralAnchors::new();
        let point = Coordinate::new(1e10, 1e10, 0.0, 0.0).unwrap();
        let best = anchors.nearest_anchor(&point);
        assert_eq!(best.id, 2);
        assert!((best.distance / 48_308_947_689.224_02 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearest_for_center_point() {
        let anchors = DodecahedralAnchors::new();
        let point = Coordinate::new(0.5, 0.5, 0.5, 0.5).unwrap();
        let best = anchors.nearest_anchor(&point);
        assert_eq!(best.id, 3);
        assert!((best.distance - 0.793_602_060_426_653_2).abs() < 1e-9);
    }
}
