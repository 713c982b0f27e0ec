use anyhow::{bail, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref E164: Regex = Regex::new(r"^\+[1-9]\d{7,14}$").expect("valid E.164 regex");
    static ref SEPARATORS: Regex = Regex::new(r"[\s\-().]").expect("valid separator regex");
}

/// Normalize a user-typed phone number to E.164.
///
/// - separators (spaces, dashes, dots, parentheses) are dropped
/// - `00` international prefix becomes `+`
/// - a bare 10-digit national number gets `default_country_code`
/// - an 11-digit national number with a trunk `0` loses the `0` first
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Result<String> {
    let compact = SEPARATORS.replace_all(raw.trim(), "").to_string();

    let candidate = if let Some(rest) = compact.strip_prefix("00") {
        format!("+{}", rest)
    } else if compact.starts_with('+') {
        compact
    } else if compact.len() == 10 && compact.chars().all(|c| c.is_ascii_digit()) {
        format!("{}{}", default_country_code, compact)
    } else if compact.len() == 11
        && compact.starts_with('0')
        && compact.chars().all(|c| c.is_ascii_digit())
    {
        format!("{}{}", default_country_code, &compact[1..])
    } else {
        bail!("Enter a valid phone number with country code");
    };

    if !E164.is_match(&candidate) {
        bail!("Enter a valid phone number with country code");
    }

    Ok(candidate)
}

/// `+919876543210` -> `+91******3210`, for logs.
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    if len <= 7 {
        return "*".repeat(len);
    }
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i < 3 || i >= len - 4 { c } else { '*' })
        .collect()
}
