// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Masked-input formatting for identifier, phone, and postal-code fields.
//!
//! Masks are a pure view transform over the raw digits: formatting strips
//! everything that is not a digit, truncates to the kind's maximum length, and
//! inserts separators progressively so partially typed values render correctly.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

/// Field kinds that carry an input mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    IndividualId,
    OrganizationId,
    Phone,
    PostalCode,
}

impl FieldKind {
    /// Canonical token used in configuration and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndividualId => "individual-id",
            Self::OrganizationId => "organization-id",
            Self::Phone => "phone",
            Self::PostalCode => "postal-code",
        }
    }

    /// Maximum number of raw digits the mask accepts.
    pub fn max_digits(&self) -> usize {
        match self {
            Self::IndividualId => 11,
            Self::OrganizationId => 14,
            Self::Phone => 11,
            Self::PostalCode => 8,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = anyhow::Error;

    /// Accepts the canonical tokens plus the short field names used by stored forms
    /// (`cpf`, `cnpj`, `cep`, `telefone`).
    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "individual-id" | "cpf" => Ok(Self::IndividualId),
            "organization-id" | "cnpj" => Ok(Self::OrganizationId),
            "phone" | "telefone" => Ok(Self::Phone),
            "postal-code" | "cep" => Ok(Self::PostalCode),
            other => Err(anyhow!("Unknown field kind: {other}")),
        }
    }
}

/// Strip a masked value back to its digits.
pub fn unformat(masked: &str) -> String {
    masked.chars().filter(char::is_ascii_digit).collect()
}

/// Render `raw` with the separators of `kind`.
///
/// Excess digits are dropped silently. A separator only appears once a digit
/// follows it, so `"1234"` renders as `"123.4"` for an individual ID while
/// `"123"` stays `"123"`.
///
/// # Examples
///
/// ```
/// use travelcrm::models::mask::{FieldKind, format};
///
/// assert_eq!(format("12345678901", FieldKind::IndividualId), "123.456.789-01");
/// assert_eq!(format("11999999999", FieldKind::Phone), "(11) 99999-9999");
/// assert_eq!(format("1199999999", FieldKind::Phone), "(11) 9999-9999");
/// ```
pub fn format(raw: &str, kind: FieldKind) -> String {
    let mut digits = unformat(raw);
    digits.truncate(kind.max_digits());

    match kind {
        FieldKind::IndividualId => insert_separators(&digits, &[(3, "."), (6, "."), (9, "-")]),
        FieldKind::OrganizationId => {
            insert_separators(&digits, &[(2, "."), (5, "."), (8, "/"), (12, "-")])
        }
        FieldKind::PostalCode => insert_separators(&digits, &[(5, "-")]),
        FieldKind::Phone => format_phone(&digits),
    }
}

/// Phone masks switch from 2-4-4 to 2-5-4 once the eleventh digit is typed.
fn format_phone(digits: &str) -> String {
    if digits.len() <= 2 {
        return digits.to_string();
    }
    let (area, number) = digits.split_at(2);
    let split = if digits.len() <= 10 { 4 } else { 5 };
    format!("({area}) {}", insert_separators(number, &[(split, "-")]))
}

/// Insert each separator before the digit at its offset, when such a digit exists.
fn insert_separators(digits: &str, separators: &[(usize, &str)]) -> String {
    let mut out = String::with_capacity(digits.len() + separators.len());
    for (idx, ch) in digits.chars().enumerate() {
        if let Some((_, sep)) = separators.iter().find(|(at, _)| *at == idx) {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

/// Read-only phone rendering for list views.
///
/// Only complete 10- or 11-digit numbers are masked; anything else is returned
/// untouched so malformed stored values stay visible as entered.
pub fn display_phone(phone: &str) -> String {
    let digits = unformat(phone);
    match digits.len() {
        10 | 11 => format(&digits, FieldKind::Phone),
        _ => phone.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [FieldKind; 4] = [
        FieldKind::IndividualId,
        FieldKind::OrganizationId,
        FieldKind::Phone,
        FieldKind::PostalCode,
    ];

    #[test]
    fn individual_id_formats_progressively() {
        let kind = FieldKind::IndividualId;
        assert_eq!(format("", kind), "");
        assert_eq!(format("123", kind), "123");
        assert_eq!(format("1234", kind), "123.4");
        assert_eq!(format("1234567", kind), "123.456.7");
        assert_eq!(format("1234567890", kind), "123.456.789-0");
        assert_eq!(format("12345678901", kind), "123.456.789-01");
    }

    #[test]
    fn organization_id_formats_progressively() {
        let kind = FieldKind::OrganizationId;
        assert_eq!(format("12", kind), "12");
        assert_eq!(format("123", kind), "12.3");
        assert_eq!(format("123456789", kind), "12.345.678/9");
        assert_eq!(format("1234567800012", kind), "12.345.678/0001-2");
        assert_eq!(format("12345678000123", kind), "12.345.678/0001-23");
    }

    #[test]
    fn phone_switches_shape_on_eleventh_digit() {
        assert_eq!(format("11", FieldKind::Phone), "11");
        assert_eq!(format("119", FieldKind::Phone), "(11) 9");
        assert_eq!(format("119999", FieldKind::Phone), "(11) 9999");
        assert_eq!(format("1199999", FieldKind::Phone), "(11) 9999-9");
        assert_eq!(format("1199999999", FieldKind::Phone), "(11) 9999-9999");
        assert_eq!(format("11999999999", FieldKind::Phone), "(11) 99999-9999");
    }

    #[test]
    fn postal_code_formats_progressively() {
        assert_eq!(format("12345", FieldKind::PostalCode), "12345");
        assert_eq!(format("123456", FieldKind::PostalCode), "12345-6");
        assert_eq!(format("12345678", FieldKind::PostalCode), "12345-678");
    }

    #[test]
    fn format_drops_excess_digits_and_noise() {
        assert_eq!(format("123.456.789-0123", FieldKind::IndividualId), "123.456.789-01");
        assert_eq!(format("(11) 99999-99999", FieldKind::Phone), "(11) 99999-9999");
        assert_eq!(format("12345-6789", FieldKind::PostalCode), "12345-678");
        assert_eq!(format("abc", FieldKind::PostalCode), "");
    }

    #[test]
    fn format_is_idempotent_over_its_stripped_output() {
        let inputs = ["", "1", "12", "123", "1234567", "1199999999", "119999999990", "12345678000123999"];
        for kind in ALL_KINDS {
            for raw in inputs {
                let once = format(raw, kind);
                assert_eq!(format(&unformat(&once), kind), once, "{kind} {raw}");
            }
        }
    }

    #[test]
    fn unformat_recovers_truncated_digits() {
        let raw = "98765432109876543";
        for kind in ALL_KINDS {
            let expected = &raw[..kind.max_digits().min(raw.len())];
            assert_eq!(unformat(&format(raw, kind)), expected, "{kind}");
        }
    }

    #[test]
    fn field_kind_parses_canonical_and_short_tokens() {
        assert_eq!("cpf".parse::<FieldKind>().unwrap(), FieldKind::IndividualId);
        assert_eq!("CNPJ".parse::<FieldKind>().unwrap(), FieldKind::OrganizationId);
        assert_eq!("postal-code".parse::<FieldKind>().unwrap(), FieldKind::PostalCode);
        assert!("zip".parse::<FieldKind>().is_err());
        for kind in ALL_KINDS {
            assert_eq!(kind.as_str().parse::<FieldKind>().unwrap(), kind);
        }
    }

    #[test]
    fn display_phone_only_masks_complete_numbers() {
        assert_eq!(display_phone("1133334444"), "(11) 3333-4444");
        assert_eq!(display_phone("11933334444"), "(11) 93333-4444");
        assert_eq!(display_phone("12345"), "12345");
        assert_eq!(display_phone(""), "");
    }
}
