//! Append-only point collection with an integer-rounded bounding box.

use super::point::Point;
use crate::error::{Error, Result};

/// An ordered collection of points of common dimension.
///
/// The dataset tracks, per component, the running sum and an axis-aligned
/// bounding box. Bounds are rounded outward to integers on every insertion
/// (`floor` of the minimum, `ceil` of the maximum) so the grid layout derived
/// from them does not shift with floating noise in the input.
#[derive(Debug, Clone)]
pub struct Dataset {
    dim: usize,
    points: Vec<Point>,
    sums: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Dataset {
    /// Create an empty dataset of the given dimension.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            points: Vec::new(),
            sums: vec![0.0; dim],
            lower: vec![f64::INFINITY; dim],
            upper: vec![f64::NEG_INFINITY; dim],
        }
    }

    /// Build a dataset from rows, taking the dimension from the first row.
    ///
    /// Fails on an empty slice or on rows of inconsistent length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(Error::EmptyInput);
        };

        let mut dataset = Self::new(first.len());
        for row in rows {
            dataset.add(Point::new(row.clone()))?;
        }
        Ok(dataset)
    }

    /// Append a point, updating the component sums and the bounding box.
    pub fn add(&mut self, point: Point) -> Result<()> {
        if point.dim() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                found: point.dim(),
            });
        }

        for (i, &v) in point.attrs().iter().enumerate() {
            self.sums[i] += v;
            self.upper[i] = self.upper[i].max(v).ceil();
            self.lower[i] = self.lower[i].min(v).floor();
        }
        self.points.push(point);
        Ok(())
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the dataset holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimension of every point in the dataset.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// The i-th point, in insertion order.
    pub fn point(&self, index: usize) -> &Point {
        &self.points[index]
    }

    /// Iterate over points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    /// Per-component lower bounds, floored to integers.
    pub fn lower_bounds(&self) -> &[f64] {
        &self.lower
    }

    /// Per-component upper bounds, ceiled to integers.
    pub fn upper_bounds(&self) -> &[f64] {
        &self.upper
    }

    /// Per-component running sums.
    pub fn component_sums(&self) -> &[f64] {
        &self.sums
    }
}
