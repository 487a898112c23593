//! Romanian personal numeric code (CNP) validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CNP_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[1-8]\d{12}$").unwrap());

const CONTROL_WEIGHTS: [u32; 12] = [2, 7, 9, 1, 4, 6, 3, 5, 8, 2, 7, 9];

/// Outcome of checking an extracted CNP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CnpStatus {
    Missing,
    Invalid,
    Valid,
}

impl CnpStatus {
    pub fn of(cnp: &str) -> Self {
        if cnp.trim().is_empty() {
            CnpStatus::Missing
        } else if validate_cnp(cnp) {
            CnpStatus::Valid
        } else {
            CnpStatus::Invalid
        }
    }
}

/// Check format and control digit of a CNP.
///
/// The leading digit encodes sex and century (1-8). The control digit is the
/// weighted digit sum modulo 11, where a remainder of 10 becomes 1.
pub fn validate_cnp(cnp: &str) -> bool {
    if !CNP_FORMAT.is_match(cnp) {
        return false;
    }

    let digits: Vec<u32> = cnp.chars().filter_map(|c| c.to_digit(10)).collect();
    let sum: u32 = digits
        .iter()
        .zip(CONTROL_WEIGHTS.iter())
        .map(|(d, w)| d * w)
        .sum();

    let control = match sum % 11 {
        10 => 1,
        rem => rem,
    };

    digits[12] == control
}
