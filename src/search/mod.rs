//! Grid enumeration and exhaustive SARIMA model search.

mod engine;
mod grid;

pub use engine::{search, RankedTable, ScoredSpec, SearchReport};
pub use grid::{candidate_grid, SearchConfig};
