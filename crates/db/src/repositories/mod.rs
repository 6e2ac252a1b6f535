//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod crop_repo;
pub mod producer_repo;
pub mod reading_repo;
pub mod sensor_repo;

pub use crop_repo::CropRepo;
pub use producer_repo::ProducerRepo;
pub use reading_repo::ReadingRepo;
pub use sensor_repo::SensorRepo;
