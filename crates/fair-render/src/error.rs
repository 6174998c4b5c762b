use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("input must be a 2x2 array, got {0}")]
    Shape(String),

    #[error("all values must be less than or equal to 1, got {value} at row {row}, column {col}")]
    OutOfRange { row: usize, col: usize, value: f64 },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
