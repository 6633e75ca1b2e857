pub mod dimensions;
pub mod engine;
pub mod ranked;
pub mod report;
pub mod salary;
pub mod skills;
pub mod stats;

pub use engine::AggregationEngine;
pub use ranked::Ranked;
pub use report::AggregateReport;
