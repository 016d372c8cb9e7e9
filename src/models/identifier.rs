// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Check-digit validation for Brazilian taxpayer identifiers.
//!
//! Both validators are total: punctuation is stripped first, and any input that
//! does not reduce to a well-formed identifier yields `false` instead of an error.

/// Digits in an individual identifier (CPF).
pub const INDIVIDUAL_LEN: usize = 11;

/// Digits in an organization identifier (CNPJ).
pub const ORGANIZATION_LEN: usize = 14;

const ORGANIZATION_WEIGHTS_FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const ORGANIZATION_WEIGHTS_SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Extract the decimal digits of `raw`, ignoring everything else.
fn digits_of(raw: &str) -> Vec<u32> {
    raw.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_identical(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

/// Mod-11 rule used by CPF: `(sum * 10) % 11`, with 10 folded to 0.
fn individual_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();
    match (sum * 10) % 11 {
        10 | 11 => 0,
        rem => rem,
    }
}

/// Mod-11 rule used by CNPJ: `0` when the remainder is below 2, else `11 - rem`.
fn organization_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        rem if rem < 2 => 0,
        rem => 11 - rem,
    }
}

/// Compute both check digits for the first nine digits of a CPF.
///
/// Returns `None` unless `first_nine` contains exactly nine digits after stripping.
pub fn individual_check_digits(first_nine: &str) -> Option<(u32, u32)> {
    let mut digits = digits_of(first_nine);
    if digits.len() != INDIVIDUAL_LEN - 2 {
        return None;
    }
    let first = individual_digit(&digits);
    digits.push(first);
    let second = individual_digit(&digits);
    Some((first, second))
}

/// Compute both check digits for the first twelve digits of a CNPJ.
///
/// Returns `None` unless `first_twelve` contains exactly twelve digits after stripping.
pub fn organization_check_digits(first_twelve: &str) -> Option<(u32, u32)> {
    let mut digits = digits_of(first_twelve);
    if digits.len() != ORGANIZATION_LEN - 2 {
        return None;
    }
    let first = organization_digit(&digits, &ORGANIZATION_WEIGHTS_FIRST);
    digits.push(first);
    let second = organization_digit(&digits, &ORGANIZATION_WEIGHTS_SECOND);
    Some((first, second))
}

/// Validate an individual identifier (CPF), punctuated or not.
///
/// # Examples
///
/// ```
/// use travelcrm::models::identifier::is_valid_individual;
///
/// assert!(is_valid_individual("111.444.777-35"));
/// assert!(!is_valid_individual("111.111.111-11"));
/// ```
pub fn is_valid_individual(raw: &str) -> bool {
    let digits = digits_of(raw);
    if digits.len() != INDIVIDUAL_LEN || all_identical(&digits) {
        return false;
    }

    individual_digit(&digits[..9]) == digits[9] && individual_digit(&digits[..10]) == digits[10]
}

/// Validate an organization identifier (CNPJ), punctuated or not.
///
/// # Examples
///
/// ```
/// use travelcrm::models::identifier::is_valid_organization;
///
/// assert!(is_valid_organization("11.222.333/0001-81"));
/// assert!(!is_valid_organization("00.000.000/0000-00"));
/// ```
pub fn is_valid_organization(raw: &str) -> bool {
    let digits = digits_of(raw);
    if digits.len() != ORGANIZATION_LEN || all_identical(&digits) {
        return false;
    }

    organization_digit(&digits[..12], &ORGANIZATION_WEIGHTS_FIRST) == digits[12]
        && organization_digit(&digits[..13], &ORGANIZATION_WEIGHTS_SECOND) == digits[13]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mutate_each_digit(valid: &str, check: fn(&str) -> bool) {
        let digits: Vec<char> = valid.chars().filter(|c| c.is_ascii_digit()).collect();
        for pos in 0..digits.len() {
            let mut mutated = digits.clone();
            let old = mutated[pos].to_digit(10).unwrap();
            mutated[pos] = char::from_digit((old + 1) % 10, 10).unwrap();
            let candidate: String = mutated.into_iter().collect();
            assert!(!check(&candidate), "mutation at {pos} accepted: {candidate}");
        }
    }

    #[test]
    fn individual_accepts_known_fixture_with_and_without_mask() {
        assert!(is_valid_individual("111.444.777-35"));
        assert!(is_valid_individual("11144477735"));
        assert!(is_valid_individual(" 111 444 777 35 "));
    }

    #[test]
    fn individual_rejects_repeated_digits() {
        for d in 0..=9 {
            let repeated = d.to_string().repeat(INDIVIDUAL_LEN);
            assert!(!is_valid_individual(&repeated));
        }
    }

    #[test]
    fn individual_rejects_wrong_length() {
        assert!(!is_valid_individual(""));
        assert!(!is_valid_individual("1114447773"));
        assert!(!is_valid_individual("111444777350"));
        assert!(!is_valid_individual("abc.def.ghi-jk"));
    }

    #[test]
    fn individual_rejects_any_single_digit_mutation() {
        mutate_each_digit("11144477735", is_valid_individual);
    }

    #[test]
    fn individual_check_digits_match_fixture() {
        assert_eq!(individual_check_digits("111.444.777"), Some((3, 5)));
        assert_eq!(individual_check_digits("12345678"), None);
    }

    #[test]
    fn individual_check_digits_build_valid_identifiers() {
        for base in ["123456789", "987654321", "529982247", "000000001"] {
            let (a, b) = individual_check_digits(base).unwrap();
            assert!(is_valid_individual(&format!("{base}{a}{b}")), "{base}");
        }
    }

    #[test]
    fn organization_accepts_known_fixture_with_and_without_mask() {
        assert!(is_valid_organization("11.222.333/0001-81"));
        assert!(is_valid_organization("11222333000181"));
    }

    #[test]
    fn organization_rejects_repeated_digits_and_wrong_length() {
        assert!(!is_valid_organization("00.000.000/0000-00"));
        assert!(!is_valid_organization("11111111111111"));
        assert!(!is_valid_organization("1122233300018"));
        assert!(!is_valid_organization("112223330001810"));
    }

    #[test]
    fn organization_rejects_any_single_digit_mutation() {
        mutate_each_digit("11222333000181", is_valid_organization);
    }

    #[test]
    fn organization_check_digits_build_valid_identifiers() {
        assert_eq!(organization_check_digits("11.222.333/0001"), Some((8, 1)));
        for base in ["123456780001", "000100020003", "450000000001"] {
            let (a, b) = organization_check_digits(base).unwrap();
            assert!(is_valid_organization(&format!("{base}{a}{b}")), "{base}");
        }
    }
}
