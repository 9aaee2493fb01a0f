pub mod lines;
pub mod table;

pub use table::{parse_fixed_width, ParseOptions, Record};
