use crate::error::RenderError;

/// A validated 2x2 score matrix, row-major `[[F, A], [I, R]]`.
///
/// Values above 1 are rejected. Negative and NaN cells are kept and drawn as
/// "no data".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreGrid {
    cells: [[f64; 2]; 2],
}

impl ScoreGrid {
    pub fn new(cells: [[f64; 2]; 2]) -> Result<Self, RenderError> {
        for (row, values) in cells.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                if *value > 1.0 {
                    return Err(RenderError::OutOfRange {
                        row,
                        col,
                        value: *value,
                    });
                }
            }
        }
        Ok(Self { cells })
    }

    /// Accepts nested rows of any shape and rejects everything but 2x2.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, RenderError> {
        let shape = || {
            let widths: Vec<String> = rows.iter().map(|r| r.as_ref().len().to_string()).collect();
            format!("{} rows with widths [{}]", rows.len(), widths.join(", "))
        };
        match rows {
            [top, bottom] => match (top.as_ref(), bottom.as_ref()) {
                ([a, b], [c, d]) => Self::new([[*a, *b], [*c, *d]]),
                _ => Err(RenderError::Shape(shape())),
            },
            _ => Err(RenderError::Shape(shape())),
        }
    }

    /// Reshapes four values in FAIR order.
    pub fn from_flat(values: &[f64]) -> Result<Self, RenderError> {
        match values {
            [f, a, i, r] => Self::new([[*f, *a], [*i, *r]]),
            _ => Err(RenderError::Shape(format!("{} values", values.len()))),
        }
    }

    pub const fn cells(&self) -> [[f64; 2]; 2] {
        self.cells
    }

    /// Cell value, or `None` when the cell is masked.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        let value = *self.cells.get(row)?.get(col)?;
        if value.is_nan() || value < 0.0 {
            None
        } else {
            Some(value)
        }
    }
}

impl TryFrom<[[f64; 2]; 2]> for ScoreGrid {
    type Error = RenderError;

    fn try_from(cells: [[f64; 2]; 2]) -> Result<Self, Self::Error> {
        Self::new(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_shapes() {
        let three_rows = vec![vec![0.1, 0.2], vec![0.3, 0.4], vec![0.5, 0.6]];
        assert!(matches!(ScoreGrid::from_rows(&three_rows), Err(RenderError::Shape(_))));

        let ragged = vec![vec![0.1, 0.2], vec![0.3]];
        let err = ScoreGrid::from_rows(&ragged).expect_err("ragged rows");
        assert_eq!(
            err.to_string(),
            "input must be a 2x2 array, got 2 rows with widths [2, 1]"
        );

        assert!(ScoreGrid::from_flat(&[0.1, 0.2, 0.3]).is_err());
    }

    #[test]
    fn rejects_values_above_one() {
        let err = ScoreGrid::from_flat(&[1.0, 0.5, 1.01, 0.0]).expect_err("out of range");
        assert!(matches!(err, RenderError::OutOfRange { row: 1, col: 0, .. }));
    }

    #[test]
    fn negative_and_nan_cells_are_masked() {
        let grid = ScoreGrid::new([[-1.0, f64::NAN], [0.0, 1.0]]).expect("valid grid");
        assert_eq!(grid.value(0, 0), None);
        assert_eq!(grid.value(0, 1), None);
        assert_eq!(grid.value(1, 0), Some(0.0));
        assert_eq!(grid.value(1, 1), Some(1.0));
        assert_eq!(grid.value(2, 0), None);
    }

    #[test]
    fn flat_values_fill_in_fair_order() {
        let grid = ScoreGrid::from_flat(&[0.1, 0.2, 0.3, 0.4]).expect("valid grid");
        assert_eq!(grid.cells(), [[0.1, 0.2], [0.3, 0.4]]);
    }
}
