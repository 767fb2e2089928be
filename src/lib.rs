//! DENCLUE density-based clustering.
//!
//! `denclue` clusters multi-dimensional numeric point sets by modeling the
//! data as a Gaussian kernel density field: each cluster is the basin of
//! attraction of a local maximum of that field, and basins joined by a dense
//! path are merged.
//!
//! The primary public API is under [`cluster`], which provides:
//! - [`Denclue`]: the clustering algorithm (parameters `sigma`, `xi`)
//! - [`DenclueFit`]: discovered clusters, their attractors, and label views
//!
//! [`io`] reads CSV point files and writes the cluster report the `denclue`
//! binary produces.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod error;
pub mod io;

pub use cluster::{
    Cluster, Clustering, Dataset, Denclue, DenclueFit, HyperSpace, Point, NOISE,
};
pub use error::{Error, Result};
