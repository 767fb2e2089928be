//! DENCLUE: clustering by kernel density estimation (Hinneburg & Keim, 1998).
//!
//! # The Algorithm
//!
//! DENCLUE models the dataset as a superposition of Gaussian kernels and
//! defines clusters through the resulting density field:
//!
//! 1. **Grid**: partition space into hypercubes of edge `2 * sigma`, route
//!    every point to its cell, and discard cells that are neither
//!    high-populated (at least `xi / (2d)` points) nor close neighbors of a
//!    high-populated cell. Only points in high-populated cells take part in
//!    the remaining phases.
//! 2. **Density**: estimate the density at every retained point as the sum
//!    of Gaussian influences of the other retained points.
//! 3. **Attractors**: hill-climb from every retained point to a local
//!    maximum of the density field, its density attractor. Points whose
//!    attractor is weaker than `xi` are discarded as noise; the rest are
//!    grouped by attractor.
//! 4. **Merging**: groups whose attractors are joined by a path of
//!    sigma-close, xi-dense retained points are fused into one cluster.
//!
//! ## Parameters
//!
//! - **sigma**: Gaussian bandwidth. Controls the kernel radius, the grid
//!   edge (`2 * sigma`) and the path-step distance.
//! - **xi**: minimum density. Attractors below it are noise; it also sets
//!   the cell population floor `xi / (2d)`.
//!
//! ## When to Use
//!
//! - Clusters of arbitrary shape, with noise, in low-to-moderate dimension
//! - The number of clusters is unknown
//! - A mathematically explicit cluster definition is wanted (basins of
//!   attraction of the density field)
//!
//! ## References
//!
//! Hinneburg, A., Keim, D. A. (1998). "An Efficient Approach to Clustering
//! in Large Multimedia Databases with Noise." KDD-98.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use super::dataset::Dataset;
use super::density::{climb_to_attractor, density};
use super::grid::HyperSpace;
use super::point::Point;
use super::traits::Clustering;
use crate::error::{Error, Result};

/// Label assigned to points that end up in no cluster.
pub const NOISE: usize = usize::MAX;

/// Attractors are snapped to a grid of `edge_length / ATTRACTOR_GRID` for
/// identity, so climbs that differ only by floating noise share a cluster.
const ATTRACTOR_GRID: f64 = 10.0;

/// DENCLUE clustering algorithm.
#[derive(Debug, Clone)]
pub struct Denclue {
    /// Gaussian kernel bandwidth.
    sigma: f64,
    /// Minimum density threshold.
    xi: f64,
}

impl Denclue {
    /// Create a new DENCLUE clusterer.
    ///
    /// # Arguments
    ///
    /// * `sigma` - Gaussian bandwidth; also fixes the grid edge `2 * sigma`.
    /// * `xi` - Minimum density for an attractor to found a cluster.
    pub fn new(sigma: f64, xi: f64) -> Self {
        Self { sigma, xi }
    }

    /// Set sigma (kernel bandwidth).
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set xi (minimum density threshold).
    pub fn with_xi(mut self, xi: f64) -> Self {
        self.xi = xi;
        self
    }

    fn validate(&self, data: &[Vec<f64>]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if !(self.sigma > 0.0) {
            return Err(Error::InvalidParameter {
                name: "sigma",
                message: "must be positive",
            });
        }
        if !(self.xi > 0.0) {
            return Err(Error::InvalidParameter {
                name: "xi",
                message: "must be positive",
            });
        }
        if data[0].is_empty() {
            return Err(Error::InvalidParameter {
                name: "dimension",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Run the full pipeline and return the discovered clusters.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<DenclueFit> {
        self.validate(data)?;

        let dataset = Dataset::from_rows(data)?;

        let mut space = HyperSpace::new(
            dataset.lower_bounds(),
            dataset.upper_bounds(),
            self.sigma,
            self.xi,
        );
        debug!(cells = space.num_cells(), "hyperspace built");

        for (index, point) in dataset.iter().enumerate() {
            space.route(index, point);
        }
        space.prune();
        debug!(
            high_populated = space.high_populated_keys().len(),
            cells = space.num_cells(),
            "low-populated cells removed"
        );

        // Snapshot the retained points; densities are set once here and read
        // by the attractor and path phases.
        let indices = space.retained_indices();
        let mut retained: Vec<Point> = indices.iter().map(|&i| dataset.point(i).clone()).collect();
        let densities: Vec<f64> = retained
            .iter()
            .map(|p| density(p, &retained, self.sigma))
            .collect();
        for (point, d) in retained.iter_mut().zip(&densities) {
            point.set_density(*d);
        }
        debug!(retained = retained.len(), "densities computed");

        // Phase A: group retained points by the attractor they climb to.
        let quantum = space.edge_length() / ATTRACTOR_GRID;
        let mut clusters: Vec<Cluster> = Vec::new();
        let mut slots: HashMap<Vec<i64>, usize> = HashMap::new();
        for (k, point) in retained.iter().enumerate() {
            let attractor = climb_to_attractor(point, &retained, self.sigma);
            if attractor.density() < self.xi {
                continue;
            }

            let key = quantize(&attractor, quantum);
            let slot = *slots.entry(key).or_insert_with(|| {
                clusters.push(Cluster::new(attractor.clone()));
                clusters.len() - 1
            });
            clusters[slot].members.push(point.clone());
            clusters[slot].member_indices.push(indices[k]);
        }
        debug!(provisional = clusters.len(), "density attractors determined");

        // Phase B: fuse groups whose attractors are path-connected.
        let clusters = merge_connected(clusters, &retained, self.sigma, self.xi);
        debug!(clusters = clusters.len(), "clusters merged");

        Ok(DenclueFit {
            n_points: data.len(),
            clusters,
        })
    }

    /// Fit and predict, returning labels where noise is marked as `None`.
    pub fn fit_predict_with_noise(&self, data: &[Vec<f64>]) -> Result<Vec<Option<usize>>> {
        Ok(self
            .fit(data)?
            .labels()
            .into_iter()
            .map(|l| if l == NOISE { None } else { Some(l) })
            .collect())
    }
}

impl Clustering for Denclue {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels())
    }

    /// DENCLUE discovers clusters dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

/// One discovered cluster: the basin of a density attractor.
#[derive(Debug, Clone)]
pub struct Cluster {
    /// The attractor every member hill-climbs to, carrying the density
    /// computed for it during the climb.
    pub attractor: Point,
    /// Member points, densities filled in, in discovery order.
    pub members: Vec<Point>,
    /// Indices of the members into the input rows, parallel to `members`.
    pub member_indices: Vec<usize>,
}

impl Cluster {
    fn new(attractor: Point) -> Self {
        Self {
            attractor,
            members: Vec::new(),
            member_indices: Vec::new(),
        }
    }
}

/// Result of a DENCLUE fit.
#[derive(Debug, Clone)]
pub struct DenclueFit {
    n_points: usize,
    clusters: Vec<Cluster>,
}

impl DenclueFit {
    /// The discovered clusters, in discovery order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Number of discovered clusters.
    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// One label per input point; points in no cluster get [`NOISE`].
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![NOISE; self.n_points];
        for (id, cluster) in self.clusters.iter().enumerate() {
            for &index in &cluster.member_indices {
                labels[index] = id;
            }
        }
        labels
    }
}

/// Snap a point to the identity grid of the given resolution.
fn quantize(point: &Point, quantum: f64) -> Vec<i64> {
    point
        .attrs()
        .iter()
        .map(|&v| (v / quantum).round() as i64)
        .collect()
}

/// Phase B: repeatedly append each cluster that is path-connected to an
/// earlier one onto that earlier cluster. Pairs are visited in discovery
/// order, so the surviving layout is deterministic.
fn merge_connected(clusters: Vec<Cluster>, retained: &[Point], sigma: f64, xi: f64) -> Vec<Cluster> {
    let mut slots: Vec<Option<Cluster>> = clusters.into_iter().map(Some).collect();

    for a in 0..slots.len() {
        if slots[a].is_none() {
            continue;
        }
        for b in (a + 1)..slots.len() {
            let connected = match (&slots[a], &slots[b]) {
                (Some(ca), Some(cb)) => {
                    path_exists(&ca.attractor, &cb.attractor, retained, sigma, xi)
                }
                _ => false,
            };
            if !connected {
                continue;
            }
            if let (Some(absorbed), Some(keeper)) = (slots[b].take(), slots[a].as_mut()) {
                keeper.members.extend(absorbed.members);
                keeper.member_indices.extend(absorbed.member_indices);
            }
        }
    }

    slots.into_iter().flatten().collect()
}

/// Whether a path of retained points joins the two attractors.
///
/// Attractors closer than sigma are connected outright. Otherwise the search
/// walks the graph whose vertices are the retained points with density at
/// least xi (the attractors themselves excluded) and whose edges join points
/// closer than sigma; a path exists when some reachable vertex is within
/// sigma of both endpoints' chains. Every vertex is visited at most once, so
/// the search halts on every input.
fn path_exists(from: &Point, to: &Point, retained: &[Point], sigma: f64, xi: f64) -> bool {
    if from.distance(to) <= sigma {
        return true;
    }

    let usable: Vec<bool> = retained
        .iter()
        .map(|p| p.density() >= xi && p != from && p != to)
        .collect();

    let mut visited = vec![false; retained.len()];
    let mut queue = VecDeque::new();
    for (i, point) in retained.iter().enumerate() {
        if usable[i] && from.distance(point) < sigma {
            visited[i] = true;
            queue.push_back(i);
        }
    }

    while let Some(i) = queue.pop_front() {
        if retained[i].distance(to) < sigma {
            return true;
        }
        for (j, point) in retained.iter().enumerate() {
            if usable[j] && !visited[j] && retained[i].distance(point) < sigma {
                visited[j] = true;
                queue.push_back(j);
            }
        }
    }

    false
}
