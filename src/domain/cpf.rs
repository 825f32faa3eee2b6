//! CPF format rules
//!
//! The CPF is the only form field with a format invariant: `XXX.XXX.XXX-XX`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Length of a fully typed, punctuated CPF
pub const CPF_LENGTH: usize = 14;

static CPF_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{3}\.[0-9]{3}\.[0-9]{3}-[0-9]{2}$").expect("CPF pattern is a valid regex")
});

/// Check that the whole string is a punctuated CPF.
pub fn is_valid_format(cpf: &str) -> bool {
    CPF_PATTERN.is_match(cpf)
}

/// True once the input is long enough that a format mismatch is a real error
/// rather than a value still being typed.
pub fn reached_full_length(cpf: &str) -> bool {
    cpf.chars().count() >= CPF_LENGTH
}
