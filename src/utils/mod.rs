pub mod constants;
pub mod debounce;
pub mod parse;
pub mod progress;

pub use constants::*;
pub use debounce::Debouncer;
pub use parse::{format_date, format_naive_date, parse_local_datetime, parse_number, NumberLike};
pub use progress::ProgressReporter;
