//! CPF normalization and validation.

use crate::constants::DEMO_MODE;

pub fn only_digits(v: &str) -> String {
    v.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Full validation with the official two check digits.
pub fn is_valid_cpf_strict(cpf_raw: &str) -> bool {
    let s = only_digits(cpf_raw);
    if s.len() != 11 {
        return false;
    }
    if all_same(&s) {
        return false;
    }

    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();

    let calc = |len: usize, factor_start: u32| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (factor_start - i as u32))
            .sum();
        let rest = (sum * 10) % 11;
        if rest == 10 {
            0
        } else {
            rest
        }
    };

    calc(9, 10) == digits[9] && calc(10, 11) == digits[10]
}

/// Shape-only check: 11 digits, not all identical.
pub fn looks_like_cpf(cpf_raw: &str) -> bool {
    let s = only_digits(cpf_raw);
    s.len() == 11 && !all_same(&s)
}

/// Demo mode accepts anything CPF-shaped; strict mode runs the checksum.
pub fn validate_cpf(cpf_raw: &str) -> bool {
    if DEMO_MODE {
        looks_like_cpf(cpf_raw)
    } else {
        is_valid_cpf_strict(cpf_raw)
    }
}

fn all_same(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => true,
    }
}
