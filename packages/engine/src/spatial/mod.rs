pub mod dirty;
pub mod grid;

pub use dirty::DirtyRows;
pub use grid::{CellGrid, GridBuffers};
