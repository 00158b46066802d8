//! Pix key normalization, validation and cosmetic helpers.

use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::LAX_PIX_CPF;
use crate::pix::{PixError, Result};
use crate::utils::{is_valid_cpf_strict, only_digits};

use super::pix_model::PixKeyType;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
    static ref EVP_RE: Regex = Regex::new(r"^[a-z0-9-]{10,64}$").unwrap();
}

/// Normalizes and validates a Pix key for the given type. CPF and phone
/// keys collapse to bare digits, email and EVP keys to lowercase.
pub fn normalize_pix_key(key_type: PixKeyType, raw: &str) -> Result<String> {
    let value = raw.trim();

    match key_type {
        PixKeyType::Cpf => {
            let digits = only_digits(value);
            if digits.len() != 11 {
                return Err(PixError::InvalidKey(
                    "CPF key must have 11 digits".to_string(),
                ));
            }
            if !LAX_PIX_CPF && !is_valid_cpf_strict(&digits) {
                return Err(PixError::InvalidKey("Invalid CPF key".to_string()));
            }
            Ok(digits)
        }
        PixKeyType::Phone => {
            // BR phone without +55: area code plus 8 or 9 digits
            let digits = only_digits(value);
            if digits.len() < 10 || digits.len() > 11 {
                return Err(PixError::InvalidKey(
                    "Phone key needs an area code and number".to_string(),
                ));
            }
            Ok(digits)
        }
        PixKeyType::Email => {
            let lowered = value.to_lowercase();
            if !EMAIL_RE.is_match(&lowered) {
                return Err(PixError::InvalidKey("Invalid email key".to_string()));
            }
            Ok(lowered)
        }
        PixKeyType::Evp => {
            let lowered = value.to_lowercase();
            if !EVP_RE.is_match(&lowered) {
                return Err(PixError::InvalidKey("Invalid random key".to_string()));
            }
            Ok(lowered)
        }
    }
}

/// Generates a uuid-like random (EVP) key
pub fn gen_evp() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Masks a normalized key for display in transfer descriptions
pub fn mask_key(key_type: PixKeyType, value: &str) -> String {
    match key_type {
        PixKeyType::Cpf if value.len() == 11 => {
            format!("{}*****{}", &value[..3], &value[8..])
        }
        PixKeyType::Phone if value.len() >= 9 => {
            format!("({})*****-{}", &value[..2], &value[value.len() - 2..])
        }
        PixKeyType::Email => match value.split_once('@') {
            Some((user, domain)) if !user.is_empty() => {
                let first = user.chars().next().map(String::from).unwrap_or_default();
                format!("{}***@{}", first, domain)
            }
            _ => value.to_string(),
        },
        _ if value.len() > 10 => {
            format!("{}...{}", &value[..6], &value[value.len() - 4..])
        }
        _ => value.to_string(),
    }
}

/// End-to-end id carried by both directions of one Pix movement
pub fn gen_e2e_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string();
    format!("E2E-{}", &raw[..20])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_key_collapses_to_digits() {
        assert_eq!(
            normalize_pix_key(PixKeyType::Cpf, "529.982.247-25").unwrap(),
            "52998224725"
        );
        assert!(normalize_pix_key(PixKeyType::Cpf, "123").is_err());
    }

    #[test]
    fn phone_key_accepts_10_or_11_digits() {
        assert_eq!(
            normalize_pix_key(PixKeyType::Phone, "(11) 98765-4321").unwrap(),
            "11987654321"
        );
        assert!(normalize_pix_key(PixKeyType::Phone, "987654321").is_err());
    }

    #[test]
    fn email_key_is_lowercased_and_checked() {
        assert_eq!(
            normalize_pix_key(PixKeyType::Email, " Ana@Example.COM ").unwrap(),
            "ana@example.com"
        );
        assert!(normalize_pix_key(PixKeyType::Email, "not-an-email").is_err());
    }

    #[test]
    fn evp_key_shape() {
        let evp = gen_evp();
        assert!(normalize_pix_key(PixKeyType::Evp, &evp).is_ok());
        assert!(normalize_pix_key(PixKeyType::Evp, "short").is_err());
    }

    #[test]
    fn masks_hide_the_middle() {
        assert_eq!(mask_key(PixKeyType::Cpf, "52998224725"), "529*****725");
        assert_eq!(mask_key(PixKeyType::Email, "ana@example.com"), "a***@example.com");
        assert_eq!(mask_key(PixKeyType::Phone, "11987654321"), "(11)*****-21");
    }

    #[test]
    fn e2e_id_is_prefixed_and_fixed_length() {
        let id = gen_e2e_id();
        assert!(id.starts_with("E2E-"));
        assert_eq!(id.len(), 24);
    }
}
