pub mod auth;
pub mod record;
pub mod user;

pub use auth::SessionClaims;
pub use record::{HealthRecord, RecordForm, RecordInput, ValidationError};
pub use user::{Role, User, normalize_email};
