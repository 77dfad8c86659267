use serde::{Deserialize, Serialize};

use super::checksum::check_digit;

const UNIVERSITY_PREFIX: &str = "NU";
const UGC_PREFIX: &str = "UGC-NU-";
const UGC_LENGTH: usize = 23;

/// Fields recoverable from a university identifier.
///
/// The program and department codes share an unbounded letter run, so
/// neither can be split back out reliably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUniversityId {
    pub year: u16,
    pub sequential: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUgcId {
    pub year: u16,
    pub department_code: String,
    pub sequential: u32,
    pub check_digit: u8,
}

fn all_digits(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_digit)
}

fn all_uppercase(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().all(u8::is_ascii_uppercase)
}

fn digits_value(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0, |acc, byte| acc * 10 + u32::from(byte - b'0'))
}

/// `NU`, two digits, 3-5 uppercase letters (program then department), three digits.
///
/// Format only: this does not prove the identifier was ever issued.
pub fn is_valid_university_id(value: &str) -> bool {
    let bytes = value.as_bytes();
    if !(10..=12).contains(&bytes.len()) || !value.starts_with(UNIVERSITY_PREFIX) {
        return false;
    }

    let letters_end = bytes.len() - 3;
    all_digits(&bytes[2..4])
        && all_uppercase(&bytes[4..letters_end])
        && all_digits(&bytes[letters_end..])
}

/// `UGC-NU-YYYY-DD-NNNNNN-C`.
///
/// Format only. The check digit is not recomputed; see [`verify_ugc_checksum`].
pub fn is_valid_ugc_id(value: &str) -> bool {
    split_ugc_id(value).is_some()
}

fn split_ugc_id(value: &str) -> Option<(&[u8], &[u8], &[u8], &[u8])> {
    let bytes = value.as_bytes();
    if bytes.len() != UGC_LENGTH || !value.starts_with(UGC_PREFIX) {
        return None;
    }

    let year = &bytes[7..11];
    let department = &bytes[12..14];
    let sequence = &bytes[15..21];
    let check = &bytes[22..23];
    let separators = [bytes[11], bytes[14], bytes[21]];

    let well_formed = all_digits(year)
        && all_uppercase(department)
        && all_digits(sequence)
        && all_digits(check)
        && separators.iter().all(|byte| *byte == b'-');

    well_formed.then_some((year, department, sequence, check))
}

pub fn parse_university_id(value: &str) -> Option<ParsedUniversityId> {
    if !is_valid_university_id(value) {
        return None;
    }

    let bytes = value.as_bytes();
    Some(ParsedUniversityId {
        year: 2000 + digits_value(&bytes[2..4]) as u16,
        sequential: digits_value(&bytes[bytes.len() - 3..]),
    })
}

pub fn parse_ugc_id(value: &str) -> Option<ParsedUgcId> {
    let (year, department, sequence, check) = split_ugc_id(value)?;
    Some(ParsedUgcId {
        year: digits_value(year) as u16,
        department_code: String::from_utf8_lossy(department).into_owned(),
        sequential: digits_value(sequence),
        check_digit: digits_value(check) as u8,
    })
}

/// Well-formed UGC identifier whose trailing digit matches the recomputed checksum.
pub fn verify_ugc_checksum(value: &str) -> bool {
    let Some((year, department, sequence, check)) = split_ugc_id(value) else {
        return false;
    };

    let payload: String = [year, department, sequence]
        .iter()
        .flat_map(|part| part.iter().map(|byte| char::from(*byte)))
        .collect();

    check_digit(&payload) == check[0] - b'0'
}
