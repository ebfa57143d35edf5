//! Service layer for business logic.
//!
//! Separates business logic from UI handlers for better testability and maintainability.

pub mod availability_service;
pub mod edit_service;
pub mod notification_service;

pub use availability_service::{AvailabilityService, JsonFileStore, KeyValueStore, MemoryStore};
pub use edit_service::EditForm;
pub use notification_service::{ContactRequest, LogNotifier, NotificationService, SubmitStatus};
