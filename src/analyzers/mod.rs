pub mod summary;

pub use summary::{AggregateSummary, ConsoleReport};
