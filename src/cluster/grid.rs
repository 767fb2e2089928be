//! Fixed-grid spatial index over the dataset's bounding box.
//!
//! The space is partitioned into axis-aligned hypercubes of edge `2 * sigma`.
//! Cells are identified by an integer coordinate tuple (one integer per
//! dimension, in units of the edge length), so two keys are equal exactly
//! when they denote the same cell. Points are routed to the single cell that
//! contains them; pruning then drops every cell that is neither
//! high-populated nor close, by cell-mean distance, to a high-populated
//! neighbor. Density estimation, hill-climbing and path search all draw
//! their points from the high-populated cells that survive.

use std::collections::{BTreeMap, HashSet};

use tracing::warn;

use super::point::Point;

/// Integer grid coordinates of one cell, in units of the edge length.
///
/// Component `i` identifies the cell whose upper bound along axis `i` is
/// `edge * coord[i]`; the cell spans `[edge * (coord[i] - 1), edge * coord[i])`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey(Vec<i64>);

impl CellKey {
    /// Key of the cell owning `value` along one axis: `floor(value/edge) + 1`.
    #[inline]
    fn coord(value: f64, edge: f64) -> i64 {
        (value / edge).floor() as i64 + 1
    }

    /// Key of the cell owning `point`.
    pub fn of_point(point: &Point, edge: f64) -> Self {
        Self(
            point
                .attrs()
                .iter()
                .map(|&v| Self::coord(v, edge))
                .collect(),
        )
    }

    /// Upper-bound corner of the cell this key denotes.
    pub fn upper_bounds(&self, edge: f64) -> Vec<f64> {
        self.0.iter().map(|&c| c as f64 * edge).collect()
    }
}

/// One grid cell: its members, component sums and adjacency set.
#[derive(Debug, Clone)]
pub struct HyperCube {
    key: CellKey,
    upper: Vec<f64>,
    edge: f64,
    members: Vec<usize>,
    sums: Vec<f64>,
    neighbors: HashSet<CellKey>,
}

impl HyperCube {
    fn new(key: CellKey, edge: f64) -> Self {
        let upper = key.upper_bounds(edge);
        let dim = upper.len();
        Self {
            key,
            upper,
            edge,
            members: Vec::new(),
            sums: vec![0.0; dim],
            neighbors: HashSet::new(),
        }
    }

    /// Insert a dataset point, recorded by its index.
    ///
    /// A point outside the cell's region `[upper - edge, upper)` is rejected
    /// with a diagnostic and the cube is left unchanged.
    pub fn insert(&mut self, index: usize, point: &Point) {
        for (i, &v) in point.attrs().iter().enumerate() {
            if v < self.upper[i] - self.edge || v >= self.upper[i] {
                warn!(
                    point = %point,
                    component = i,
                    lower = self.upper[i] - self.edge,
                    upper = self.upper[i],
                    "point outside cell region; not inserted"
                );
                return;
            }
        }

        for (sum, &v) in self.sums.iter_mut().zip(point.attrs()) {
            *sum += v;
        }
        self.members.push(index);
    }

    /// Number of points in the cell.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the cell holds no points.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Dataset indices of the cell's points, in insertion order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Mean of the cell's points. Only meaningful for non-empty cells.
    pub fn mean(&self) -> Point {
        let n = self.members.len() as f64;
        Point::new(self.sums.iter().map(|s| s / n).collect())
    }

    /// Keys of adjacent cells.
    pub fn neighbors(&self) -> &HashSet<CellKey> {
        &self.neighbors
    }

    /// Replace the adjacency set, dropping this cell's own key if present.
    fn set_neighbors(&mut self, keys: impl IntoIterator<Item = CellKey>) {
        self.neighbors = keys.into_iter().filter(|k| *k != self.key).collect();
    }

    /// Drop the given keys from the adjacency set.
    fn remove_empty_neighbors(&mut self, empty: &HashSet<CellKey>) {
        self.neighbors.retain(|k| !empty.contains(k));
    }

    /// Whether this cell counts as a neighbor of any cell in `keys`.
    ///
    /// A cell whose own key appears in `keys` qualifies trivially (the
    /// distance between a mean and itself is zero). Otherwise some key must
    /// be in the adjacency set with a cell-mean distance of at most
    /// `2 * edge`, a stricter criterion than grid adjacency alone, so that
    /// sparsely scattered cells do not bridge unrelated dense regions.
    fn is_neighbor_of(&self, keys: &[CellKey], cubes: &BTreeMap<CellKey, HyperCube>) -> bool {
        for key in keys {
            if *key == self.key {
                return true;
            }
            if !self.neighbors.contains(key) {
                continue;
            }
            if let Some(other) = cubes.get(key) {
                if self.mean().distance(&other.mean()) <= 2.0 * self.edge {
                    return true;
                }
            }
        }
        false
    }
}

/// The grid: every cell covering the bounding box, keyed by [`CellKey`].
///
/// Cells live in an ordered map, so every traversal is deterministic, and
/// with it the retained-point order observable in the final cluster layout.
#[derive(Debug, Clone)]
pub struct HyperSpace {
    xi: f64,
    dim: usize,
    edge: f64,
    cell_lower: Vec<i64>,
    cell_upper: Vec<i64>,
    cubes: BTreeMap<CellKey, HyperCube>,
    high_populated: Vec<CellKey>,
}

impl HyperSpace {
    /// Build the grid covering `[lower_bounds, upper_bounds]`.
    ///
    /// The edge length is `2 * sigma`. Per axis, cells run from the one
    /// owning the lower bound through the one owning the upper bound, so the
    /// routing key of every dataset point exists in the map by construction.
    /// Each cell records its up to `3^d - 1` in-range neighbor keys.
    pub fn new(lower_bounds: &[f64], upper_bounds: &[f64], sigma: f64, xi: f64) -> Self {
        let dim = lower_bounds.len();
        let edge = 2.0 * sigma;

        let cell_lower: Vec<i64> = lower_bounds
            .iter()
            .map(|&v| CellKey::coord(v, edge))
            .collect();
        let cell_upper: Vec<i64> = upper_bounds
            .iter()
            .map(|&v| CellKey::coord(v, edge))
            .collect();

        let mut space = Self {
            xi,
            dim,
            edge,
            cell_lower,
            cell_upper,
            cubes: BTreeMap::new(),
            high_populated: Vec::new(),
        };
        space.build_cells();
        space
    }

    fn build_cells(&mut self) {
        let mut coords = self.cell_lower.clone();
        loop {
            let key = CellKey(coords.clone());
            let mut cube = HyperCube::new(key.clone(), self.edge);
            cube.set_neighbors(self.neighbor_keys(&coords));
            self.cubes.insert(key, cube);

            if !advance(&mut coords, &self.cell_lower, &self.cell_upper) {
                break;
            }
        }
    }

    /// All in-range keys reachable by perturbing each coordinate by
    /// `{-1, 0, +1}`, the unperturbed key included (the cube filters itself
    /// out when the set is assigned).
    fn neighbor_keys(&self, coords: &[i64]) -> Vec<CellKey> {
        let offset_lower = vec![-1i64; self.dim];
        let offset_upper = vec![1i64; self.dim];
        let mut offset = offset_lower.clone();
        let mut keys = Vec::new();

        loop {
            let candidate: Vec<i64> = coords.iter().zip(&offset).map(|(c, o)| c + o).collect();
            let in_range = candidate
                .iter()
                .zip(&self.cell_lower)
                .zip(&self.cell_upper)
                .all(|((c, lo), hi)| lo <= c && c <= hi);
            if in_range {
                keys.push(CellKey(candidate));
            }

            if !advance(&mut offset, &offset_lower, &offset_upper) {
                break;
            }
        }
        keys
    }

    /// Edge length of every cell (`2 * sigma`).
    pub fn edge_length(&self) -> f64 {
        self.edge
    }

    /// Number of cells currently in the map.
    pub fn num_cells(&self) -> usize {
        self.cubes.len()
    }

    /// Population floor for a cell to count as high-populated: `xi / (2d)`.
    pub fn population_floor(&self) -> f64 {
        self.xi / (2.0 * self.dim as f64)
    }

    /// Look up a cell by key.
    pub fn cube(&self, key: &CellKey) -> Option<&HyperCube> {
        self.cubes.get(key)
    }

    /// Route a dataset point into the cell that owns it.
    ///
    /// A point whose key is missing from the map lies outside the declared
    /// bounding box; it is reported and dropped.
    pub fn route(&mut self, index: usize, point: &Point) {
        let key = CellKey::of_point(point, self.edge);
        match self.cubes.get_mut(&key) {
            Some(cube) => cube.insert(index, point),
            None => warn!(?key, point = %point, "no cell for point; dropping"),
        }
    }

    /// Remove low-populated cells.
    ///
    /// In order: record high-populated cells and drop empty ones; scrub the
    /// dropped keys from every adjacency set; finally drop every remaining
    /// cell that is not a neighbor (by the strict cell-mean test) of a
    /// high-populated cell. High-populated cells always survive. Running
    /// this twice is equivalent to running it once.
    pub fn prune(&mut self) {
        let floor = self.population_floor();

        self.high_populated.clear();
        let mut empty = HashSet::new();
        for (key, cube) in &self.cubes {
            if cube.len() as f64 >= floor {
                self.high_populated.push(key.clone());
            }
            if cube.is_empty() {
                empty.insert(key.clone());
            }
        }
        self.cubes.retain(|key, _| !empty.contains(key));

        for cube in self.cubes.values_mut() {
            cube.remove_empty_neighbors(&empty);
        }

        let doomed: Vec<CellKey> = self
            .cubes
            .iter()
            .filter(|(_, cube)| !cube.is_neighbor_of(&self.high_populated, &self.cubes))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            self.cubes.remove(key);
        }
    }

    /// Keys of high-populated cells, in map traversal order.
    pub fn high_populated_keys(&self) -> &[CellKey] {
        &self.high_populated
    }

    /// Dataset indices of every point in a high-populated cell, walking the
    /// high-populated keys in order and each cell's points in insertion
    /// order. This is the retained set the density, attractor and path
    /// phases operate on.
    pub fn retained_indices(&self) -> Vec<usize> {
        self.high_populated
            .iter()
            .filter_map(|key| self.cubes.get(key))
            .flat_map(|cube| cube.members().iter().copied())
            .collect()
    }
}

/// Odometer increment of `coords` within `[lower, upper]` per component.
/// Returns false once every combination has been visited.
fn advance(coords: &mut [i64], lower: &[i64], upper: &[i64]) -> bool {
    for i in (0..coords.len()).rev() {
        coords[i] += 1;
        if coords[i] <= upper[i] {
            return true;
        }
        coords[i] = lower[i];
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space_2d(sigma: f64, xi: f64) -> HyperSpace {
        // Bounding box [0, 6] x [0, 6].
        HyperSpace::new(&[0.0, 0.0], &[6.0, 6.0], sigma, xi)
    }

    #[test]
    fn grid_covers_the_bounding_box() {
        let space = space_2d(1.0, 2.0);
        // Edge 2, coords 1..=4 per axis.
        assert_eq!(space.num_cells(), 16);
    }

    #[test]
    fn routing_key_exists_for_every_in_bounds_point() {
        let space = space_2d(1.0, 2.0);
        for &x in &[0.0, 0.5, 1.9, 3.3, 5.99, 6.0] {
            for &y in &[0.0, 2.0, 6.0] {
                let key = CellKey::of_point(&Point::new(vec![x, y]), space.edge_length());
                assert!(space.cube(&key).is_some(), "missing cell for ({x},{y})");
            }
        }
    }

    #[test]
    fn routed_point_satisfies_cell_membership() {
        let mut space = space_2d(1.0, 2.0);
        let p = Point::new(vec![3.3, 0.2]);
        space.route(0, &p);

        let key = CellKey::of_point(&p, space.edge_length());
        let cube = space.cube(&key).unwrap();
        assert_eq!(cube.members(), &[0]);

        let upper = key.upper_bounds(space.edge_length());
        for (i, &v) in p.attrs().iter().enumerate() {
            assert!(upper[i] - space.edge_length() <= v && v < upper[i]);
        }
    }

    #[test]
    fn cube_rejects_point_outside_its_region() {
        let edge = 2.0;
        let key = CellKey(vec![1, 1]); // region [0,2) x [0,2)
        let mut cube = HyperCube::new(key, edge);

        cube.insert(0, &Point::new(vec![1.0, 1.0]));
        cube.insert(1, &Point::new(vec![2.5, 1.0]));

        assert_eq!(cube.members(), &[0]);
    }

    #[test]
    fn mean_is_component_sums_over_count() {
        let edge = 2.0;
        let mut cube = HyperCube::new(CellKey(vec![1, 1]), edge);
        cube.insert(0, &Point::new(vec![0.5, 1.0]));
        cube.insert(1, &Point::new(vec![1.5, 0.0]));

        assert_eq!(cube.mean(), Point::new(vec![1.0, 0.5]));
    }

    #[test]
    fn interior_cell_has_full_neighborhood() {
        let space = space_2d(1.0, 2.0);
        let interior = space.cube(&CellKey(vec![2, 2])).unwrap();
        assert_eq!(interior.neighbors().len(), 8);

        let corner = space.cube(&CellKey(vec![1, 1])).unwrap();
        assert_eq!(corner.neighbors().len(), 3);
    }

    #[test]
    fn prune_keeps_high_populated_and_their_close_neighbors() {
        // Population floor is 8/(2*2) = 2.
        let mut space = space_2d(1.0, 8.0);
        // Three points in cell (1,1): high-populated.
        // One in adjacent cell (2,2): sparse, mean within 2*edge of (1,1)'s.
        // One in cell (3,3): sparse, not adjacent to any high-populated cell.
        for (i, v) in [[0.1, 0.1], [0.2, 0.2], [0.3, 0.1], [2.5, 2.5], [5.9, 5.9]]
            .iter()
            .enumerate()
        {
            space.route(i, &Point::new(v.to_vec()));
        }
        space.prune();

        assert_eq!(space.high_populated_keys(), &[CellKey(vec![1, 1])]);
        assert!(space.cube(&CellKey(vec![2, 2])).is_some());
        assert!(space.cube(&CellKey(vec![3, 3])).is_none());
        assert_eq!(space.num_cells(), 2);

        // Only high-populated cells feed the retained set.
        assert_eq!(space.retained_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn prune_drops_everything_when_no_cell_is_dense_enough() {
        let mut space = space_2d(1.0, 100.0);
        space.route(0, &Point::new(vec![0.5, 0.5]));
        space.route(1, &Point::new(vec![5.5, 5.5]));
        space.prune();

        assert!(space.high_populated_keys().is_empty());
        assert_eq!(space.num_cells(), 0);
        assert!(space.retained_indices().is_empty());
    }

    #[test]
    fn prune_is_idempotent() {
        // Mix of high-populated, mean-distance-pruned and disconnected cells.
        let mut space = space_2d(1.0, 8.0);
        for (i, v) in [[0.1, 0.1], [0.2, 0.2], [3.5, 3.5], [5.9, 5.9]]
            .iter()
            .enumerate()
        {
            space.route(i, &Point::new(v.to_vec()));
        }

        space.prune();
        let keys_once: Vec<CellKey> = space.high_populated_keys().to_vec();
        let cells_once = space.num_cells();
        let retained_once = space.retained_indices();

        space.prune();
        assert_eq!(space.high_populated_keys(), keys_once.as_slice());
        assert_eq!(space.num_cells(), cells_once);
        assert_eq!(space.retained_indices(), retained_once);
    }

    #[test]
    fn retained_order_follows_key_then_insertion_order() {
        let mut space = space_2d(1.0, 2.0);
        // Route into two cells, interleaved.
        space.route(0, &Point::new(vec![5.0, 5.0]));
        space.route(1, &Point::new(vec![0.5, 0.5]));
        space.route(2, &Point::new(vec![5.1, 5.1]));
        space.route(3, &Point::new(vec![0.6, 0.6]));
        space.prune();

        // Cell (1,1) sorts before cell (3,3).
        assert_eq!(space.retained_indices(), vec![1, 3, 0, 2]);
    }

    #[test]
    fn negative_coordinates_route_correctly() {
        let mut space = HyperSpace::new(&[-4.0, -4.0], &[0.0, 0.0], 1.0, 2.0);
        let p = Point::new(vec![-3.5, -0.5]);
        space.route(0, &p);

        let key = CellKey::of_point(&p, space.edge_length());
        assert_eq!(key, CellKey(vec![-1, 0]));
        assert_eq!(space.cube(&key).unwrap().members(), &[0]);
    }
}
