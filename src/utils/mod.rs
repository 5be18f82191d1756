pub mod format;
pub mod table;

pub use format::{format_grouped, format_usd};
pub use table::Table;
