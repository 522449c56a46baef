pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod repository;
pub mod services;
pub mod validation;

pub use error::{ServiceError, ServiceResult};
pub use repository::{InMemoryStreamStore, PgStreamStore, StreamStore};
pub use services::{CommentService, EndOutcome, StreamLifecycleService, StreamListingService};
