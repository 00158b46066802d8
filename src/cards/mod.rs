// Module declarations
pub(crate) mod cards_errors;
pub(crate) mod cards_model;
pub(crate) mod cards_repository;
pub(crate) mod cards_service;

// Re-export the public interface
pub use cards_model::{Card, CardAction, CardDB, CardStatus, CardType, CardUpdate, NewCard};
pub use cards_repository::CardRepository;
pub use cards_service::CardService;

// Re-export error types for convenience
pub use cards_errors::{CardError, Result};
