//! Chilean RUT validation
//!
//! Boundary checks for the national identifier customers type in. The digest
//! derivation does not depend on these: it only needs the cleaned string.

/// Format error shown when the RUT does not look like `12345678-K`
const FORMAT_MESSAGE: &str = "Invalid format. Use the format: 12345678-K";

/// Strip everything but digits, `K` and the hyphen; upper-case.
pub fn clean_formatted(rut: &str) -> String {
    rut.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K' || *c == '-')
        .collect::<String>()
        .to_uppercase()
}

/// Check the `body-checkdigit` shape without verifying the check digit.
pub fn validate_format(rut: &str) -> Result<(), String> {
    let clean = clean_formatted(rut);

    let (body, check_digit) = match clean.split_once('-') {
        Some(parts) => parts,
        None => return Err(FORMAT_MESSAGE.to_string()),
    };

    if check_digit.contains('-') {
        return Err(FORMAT_MESSAGE.to_string());
    }

    if !(7..=8).contains(&body.len()) || !body.chars().all(|c| c.is_ascii_digit()) {
        return Err("The RUT must have 7 or 8 digits before the hyphen".to_string());
    }

    let mut dv = check_digit.chars();
    match (dv.next(), dv.next()) {
        (Some(c), None) if c.is_ascii_digit() || c == 'K' => Ok(()),
        _ => Err("The check digit must be a number (0-9) or K".to_string()),
    }
}

/// Modulo-11 check digit for a numeric RUT body
pub fn check_digit(body: &str) -> Option<char> {
    let mut sum = 0u32;
    let mut factor = 2u32;

    for c in body.chars().rev() {
        sum += c.to_digit(10)? * factor;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }

    match 11 - (sum % 11) {
        11 => Some('0'),
        10 => Some('K'),
        d => char::from_digit(d, 10),
    }
}

/// Format and check digit both valid
pub fn validate(rut: &str) -> bool {
    validate_with_error(rut).is_ok()
}

/// Validate and describe the first problem found
pub fn validate_with_error(rut: &str) -> Result<(), String> {
    validate_format(rut)?;

    let clean = clean_formatted(rut);
    let (body, dv) = clean.split_once('-').ok_or_else(|| FORMAT_MESSAGE.to_string())?;

    match check_digit(body) {
        Some(expected) if dv.starts_with(expected) => Ok(()),
        _ => Err("Incorrect check digit. Please verify your RUT".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_formatted_keeps_hyphen() {
        assert_eq!(clean_formatted(" 12.345.678-k "), "12345678-K");
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(check_digit("12345678"), Some('5'));
        assert_eq!(check_digit("11111111"), Some('1'));
        assert_eq!(check_digit("1234567a"), None);
    }

    #[test]
    fn test_validate_format_errors() {
        assert!(validate_format("123456785").is_err());
        assert!(validate_format("12-34567-8").is_err());
        assert!(validate_format("123456-5").is_err());
        assert!(validate_format("123456789-5").is_err());
        assert!(validate_format("12345678-").is_err());
        assert!(validate_format("12345678-5").is_ok());
        assert!(validate_format("12.345.678-k").is_ok());
    }

    #[test]
    fn test_validate_check_digit() {
        assert!(validate("12.345.678-5"));
        assert!(validate("11111111-1"));
        assert!(!validate("12345678-9"));

        let err = validate_with_error("12345678-9").unwrap_err();
        assert!(err.contains("check digit"));
    }
}
