/// One character of a checksum payload, read right to left.
///
/// Letters never add to the sum but still advance the position counter, so
/// the parity of every digit to their left depends on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadSymbol {
    Digit(u32),
    Placeholder,
}

impl From<char> for PayloadSymbol {
    fn from(value: char) -> Self {
        match value.to_digit(10) {
            Some(digit) => PayloadSymbol::Digit(digit),
            None => PayloadSymbol::Placeholder,
        }
    }
}

/// Luhn-style check digit over an alphanumeric payload.
pub fn check_digit(payload: &str) -> u8 {
    let sum: u32 = payload
        .chars()
        .rev()
        .map(PayloadSymbol::from)
        .enumerate()
        .map(|(position, symbol)| match symbol {
            PayloadSymbol::Placeholder => 0,
            PayloadSymbol::Digit(digit) if position % 2 == 1 => {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled % 10 + 1
                } else {
                    doubled
                }
            }
            PayloadSymbol::Digit(digit) => digit,
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

/// Payload the UGC check digit is computed over: year, department code and
/// the six-digit sequence.
pub fn ugc_payload(year: u16, department_code: &str, sequence: u32) -> String {
    format!("{year:04}{department_code}{sequence:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_published_example() {
        assert_eq!(check_digit(&ugc_payload(2024, "CS", 1)), 7);
    }

    #[test]
    fn letters_shift_digit_parity() {
        // Dropping one letter moves every digit of the year to the other parity.
        assert_eq!(check_digit("2025CS000001"), 6);
        assert_eq!(check_digit("2025C000001"), 4);
    }

    #[test]
    fn doubled_digits_above_nine_fold_back() {
        // 9 at position 1 doubles to 18, folds to 9; 1 at position 0 stays 1.
        assert_eq!(check_digit("91"), 0);
        // 5 at position 1 doubles to 10, folds to 1.
        assert_eq!(check_digit("50"), 9);
    }

    #[test]
    fn all_letters_yield_zero() {
        assert_eq!(check_digit("CS"), 0);
        assert_eq!(check_digit(""), 0);
    }
}
