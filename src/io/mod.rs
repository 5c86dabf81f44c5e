//! CSV input and output.

mod results;
mod series;

pub use results::{
    read_ranked_table, read_ranked_table_from, write_ranked_table, write_ranked_table_to,
};
pub use series::{read_series, read_series_from};
