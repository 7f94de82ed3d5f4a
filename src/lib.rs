// TecaiKids API - Core Library
// Exposes catalog, validation and storage for the API server and tests

pub mod catalog;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod service;
pub mod store;
pub mod validation;

// Only compile the HTTP layer when the server feature is enabled
#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use catalog::ProgramCatalog;
pub use config::{Config, CorsOrigins, DatabaseLocation, LogFormat};
pub use error::{ApiError, ApiResult};
pub use models::{
    ConsultationCreate, ConsultationRequest, Enrollment, EnrollmentCreate, PaymentMethod,
    PaymentPlan, PlatformStats, Program, ProgramType,
};
pub use store::{DocumentStore, MemoryStore, SqliteStore, CONSULTATIONS, ENROLLMENTS, LIST_LIMIT};
pub use validation::FieldError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
