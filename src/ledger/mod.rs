// Module declarations
pub(crate) mod ledger_constants;
pub(crate) mod ledger_errors;
pub(crate) mod ledger_model;
pub(crate) mod ledger_repository;
pub(crate) mod ledger_service;

// Re-export the public interface
pub use ledger_constants::*;
pub use ledger_model::{
    EntryFilter, EntryKindFilter, EntryPage, LedgerEntry, LedgerEntryDB, LedgerKind,
};
pub use ledger_repository::LedgerRepository;
pub use ledger_service::LedgerService;

// Re-export error types for convenience
pub use ledger_errors::{LedgerError, Result};
