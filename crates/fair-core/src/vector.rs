use serde::Serialize;

use crate::dimension::{Dimension, DimensionReport};

/// The four dimension scores in FAIR order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairVector {
    pub findable: f64,
    pub accessible: f64,
    pub interoperable: f64,
    pub reproducible: f64,
}

impl FairVector {
    pub const fn new(findable: f64, accessible: f64, interoperable: f64, reproducible: f64) -> Self {
        Self {
            findable,
            accessible,
            interoperable,
            reproducible,
        }
    }

    pub const fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Findable => self.findable,
            Dimension::Accessible => self.accessible,
            Dimension::Interoperable => self.interoperable,
            Dimension::Reproducible => self.reproducible,
        }
    }

    pub const fn to_array(&self) -> [f64; 4] {
        [self.findable, self.accessible, self.interoperable, self.reproducible]
    }

    /// Row-major 2x2 layout: `[[F, A], [I, R]]`.
    pub const fn to_matrix(&self) -> [[f64; 2]; 2] {
        [
            [self.findable, self.accessible],
            [self.interoperable, self.reproducible],
        ]
    }
}

impl From<[f64; 4]> for FairVector {
    fn from([findable, accessible, interoperable, reproducible]: [f64; 4]) -> Self {
        Self::new(findable, accessible, interoperable, reproducible)
    }
}

/// Everything one scoring run produced for an identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairReport {
    pub identifier: String,
    pub dimensions: Vec<DimensionReport>,
    pub vector: FairVector,
}

impl FairReport {
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionReport> {
        self.dimensions.iter().find(|r| r.dimension == dimension)
    }
}
