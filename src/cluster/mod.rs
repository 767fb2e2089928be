//! DENCLUE clustering over dense vectors.
//!
//! The pipeline runs in sequenced phases over a [`Dataset`]:
//!
//! 1. A [`HyperSpace`] grid partitions the bounding box into cells of edge
//!    `2 * sigma`, routes every point into its cell, and removes cells that
//!    are neither high-populated nor close neighbors of one.
//! 2. The density engine estimates a Gaussian kernel density at every
//!    retained point.
//! 3. Hill-climbing maps each retained point to its density attractor;
//!    attractors below `xi` drop their point as noise.
//! 4. Groups sharing an attractor become provisional clusters, fused when a
//!    path of sigma-close, xi-dense retained points joins their attractors.
//!
//! [`Denclue`] drives all four phases; [`DenclueFit`] carries the result.
//!
//! ## Usage
//!
//! ```rust
//! use denclue::{Clustering, Denclue, NOISE};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![0.2, 0.0],
//!     vec![8.0, 8.0],
//! ];
//!
//! let labels = Denclue::new(1.0, 1.5).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_eq!(labels[0], labels[2]);
//! assert_eq!(labels[3], NOISE); // the stray point attracts nothing
//! ```

mod dataset;
mod denclue;
pub mod density;
mod grid;
mod point;
mod traits;

pub use dataset::Dataset;
pub use denclue::{Cluster, Denclue, DenclueFit, NOISE};
pub use grid::{CellKey, HyperCube, HyperSpace};
pub use point::Point;
pub use traits::Clustering;
