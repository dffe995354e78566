pub mod aggregator;
pub mod alert_factory;
pub mod finalizer;
pub mod hmpi_scorer;
pub mod pipeline;

pub use aggregator::update;
pub use alert_factory::AlertFactory;
pub use finalizer::finalize;
pub use hmpi_scorer::{classify, score, HMPI_LIMITS};
pub use pipeline::{Pipeline, PreviewUpdate, RunReport};
