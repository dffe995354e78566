pub mod aggregate;
pub mod alert;
pub mod sample;

pub use aggregate::{
    Aggregate, DailyAverage, FinalizedAggregate, FinalizedStats, MetalCounter, PointMeta,
    RegionRollup, RegionSummary, RunningStat, RunningStats, TurbiditySeries,
};
pub use alert::Alert;
pub use sample::{
    HmpiResult, HmpiStatus, Metal, Parameter, RawRow, SampleRow, ScoredSample, TREND_PARAMETERS,
};
