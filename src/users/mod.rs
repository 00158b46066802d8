// Module declarations
pub(crate) mod users_errors;
pub(crate) mod users_model;
pub(crate) mod users_repository;
pub(crate) mod users_service;

// Re-export the public interface
pub use users_model::{RegisterUser, User, UserDB, UserProfile};
pub use users_repository::UserRepository;
pub use users_service::UserService;

// Re-export error types for convenience
pub use users_errors::{Result, UserError};
