pub mod error;
pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use error::StoreError;
pub use pool::{create_pool, run_migrations};
pub use repos::health_record::{HealthRecordRepo, HealthRecordRow, RecordOrder};
pub use repos::user::{NewUser, UserRepo, UserRow};
