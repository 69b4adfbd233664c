//! Free-text ingredient lines into `{amount, unit, ingredient, notes}`.

pub mod amount;
mod parser;
pub mod units;

pub use parser::{format_ingredient, normalize_fractions, parse_ingredient_line, parse_ingredient_lines};
