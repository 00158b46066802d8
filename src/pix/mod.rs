// Module declarations
pub(crate) mod pix_errors;
pub(crate) mod pix_keys;
pub(crate) mod pix_model;
pub(crate) mod pix_repository;
pub(crate) mod pix_service;

// Re-export the public interface
pub use pix_keys::{gen_evp, mask_key, normalize_pix_key};
pub use pix_model::{
    NewPixKey, PixDirection, PixKey, PixKeyDB, PixKeyType, PixSendRequest, PixTransfer,
    PixTransferDB,
};
pub use pix_repository::PixRepository;
pub use pix_service::PixService;

// Re-export error types for convenience
pub use pix_errors::{PixError, Result};
