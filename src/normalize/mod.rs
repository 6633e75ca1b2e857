pub mod education;
pub mod experience;
pub mod location;
pub mod model;
pub mod normalizer;
pub mod position;
pub mod salary;
pub mod skills;
pub mod vocabulary;

pub use experience::ExperienceBand;
pub use model::{
    Column, DerivedColumn, NormalizedBatch, NormalizedJobRecord, RawBatch, RawJobRecord,
};
pub use normalizer::RecordNormalizer;
