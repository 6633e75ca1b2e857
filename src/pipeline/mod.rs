pub mod scheduler;
pub mod service;

pub use scheduler::run_daily;
pub use service::PipelineService;
