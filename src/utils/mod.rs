pub mod cpf;
pub mod money;

pub use cpf::{is_valid_cpf_strict, looks_like_cpf, only_digits, validate_cpf};
pub use money::{format_cents_brl, parse_brl_to_cents};
