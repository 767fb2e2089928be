//! A dense point with an attached density estimate.

use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A point in d-dimensional Euclidean space.
///
/// Besides its coordinates, a point carries a scalar density estimate, set
/// during the density phase of the pipeline and read by the attractor and
/// path-search phases. Arithmetic never looks at the density; results of
/// `+`, `-` and scalar `*` start with a density of zero.
#[derive(Debug, Clone, Default)]
pub struct Point {
    attrs: Vec<f64>,
    density: f64,
}

impl Point {
    /// Create a point from its coordinates, with density zero.
    pub fn new(attrs: Vec<f64>) -> Self {
        Self { attrs, density: 0.0 }
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.attrs.len()
    }

    /// Coordinate slice.
    pub fn attrs(&self) -> &[f64] {
        &self.attrs
    }

    /// Current density estimate (zero until set).
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Store a density estimate on this point.
    pub fn set_density(&mut self, density: f64) {
        self.density = density;
    }

    /// Euclidean norm of the coordinate vector.
    pub fn norm(&self) -> f64 {
        self.attrs.iter().map(|a| a * a).sum::<f64>().sqrt()
    }

    /// Euclidean distance to another point.
    ///
    /// When the dimensions differ, only the common prefix of components
    /// contributes, like the componentwise arithmetic below.
    pub fn distance(&self, other: &Point) -> f64 {
        self.attrs
            .iter()
            .zip(&other.attrs)
            .map(|(a, b)| {
                let d = a - b;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

/// Equality over coordinates only; the density estimate is ignored.
impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.attrs == other.attrs
    }
}

impl Add for &Point {
    type Output = Point;

    /// Componentwise sum over the common prefix of dimensions.
    fn add(self, rhs: &Point) -> Point {
        Point::new(
            self.attrs
                .iter()
                .zip(&rhs.attrs)
                .map(|(a, b)| a + b)
                .collect(),
        )
    }
}

impl Sub for &Point {
    type Output = Point;

    /// Componentwise difference over the common prefix of dimensions.
    fn sub(self, rhs: &Point) -> Point {
        Point::new(
            self.attrs
                .iter()
                .zip(&rhs.attrs)
                .map(|(a, b)| a - b)
                .collect(),
        )
    }
}

impl Mul<f64> for &Point {
    type Output = Point;

    fn mul(self, scalar: f64) -> Point {
        Point::new(self.attrs.iter().map(|a| a * scalar).collect())
    }
}

/// Comma-joined coordinates, e.g. `0.1,5,2.25`.
///
/// This is the canonical textual form: the cluster report renders attractors
/// with it, and parsing it back yields a numerically equal point.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, a) in self.attrs.iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{a}")?;
        }
        Ok(())
    }
}
