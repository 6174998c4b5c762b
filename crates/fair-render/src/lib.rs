pub mod colormap;
pub mod error;
pub mod glyphs;
pub mod grid;
pub mod heatmap;

pub use error::RenderError;
pub use grid::ScoreGrid;
pub use heatmap::*;
