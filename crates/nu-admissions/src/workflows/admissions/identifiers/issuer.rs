use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::checksum::{check_digit, ugc_payload};
use super::sequence::MAX_SEQUENCE;
use crate::workflows::admissions::catalog::Catalog;

pub const DEFAULT_PROGRAM_CODE: &str = "B";
pub const DEFAULT_DEPARTMENT_CODE: &str = "XX";
pub const DEFAULT_DURATION_YEARS: u16 = 4;

const MIN_YEAR: u16 = 2000;
const MAX_YEAR: u16 = 2099;

/// University and UGC identifiers minted for one approved applicant.
///
/// The identifier strings never change once issued. Revocation only clears
/// `is_active`; reissuing means a new pair with a new sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentIdentifierPair {
    pub university_id: String,
    pub ugc_id: String,
    pub generated_date: NaiveDate,
    pub student_name: String,
    pub program: String,
    pub department: String,
    pub batch: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRequest {
    pub student_name: String,
    pub program: String,
    pub department: String,
    pub year: u16,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("intake year {0} is outside {MIN_YEAR}-{MAX_YEAR}")]
    YearOutOfRange(u16),
    #[error("sequence number {0} is outside 1-{MAX_SEQUENCE}")]
    SequenceOutOfRange(u32),
    #[error("'{0}' is not a valid university identifier")]
    MalformedUniversityId(String),
}

/// Codes resolved from the catalog, with fallbacks for unknown entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierCodes {
    pub program_code: String,
    pub department_code: String,
    pub duration_years: u16,
}

/// Mints identifier pairs from catalog code tables.
///
/// The issuer trusts the caller's sequence number; uniqueness is the job of
/// the [`SequenceSource`](super::sequence::SequenceSource).
#[derive(Debug, Clone)]
pub struct IdentifierIssuer {
    catalog: Arc<Catalog>,
}

impl IdentifierIssuer {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn codes_for(&self, program: &str, department: &str) -> IdentifierCodes {
        let level = self.catalog.program_level(program);
        IdentifierCodes {
            program_code: level
                .map(|entry| entry.code.clone())
                .unwrap_or_else(|| DEFAULT_PROGRAM_CODE.to_string()),
            department_code: self
                .catalog
                .department_code(department)
                .unwrap_or(DEFAULT_DEPARTMENT_CODE)
                .to_string(),
            duration_years: level
                .map(|entry| entry.duration_years)
                .unwrap_or(DEFAULT_DURATION_YEARS),
        }
    }

    pub fn issue(
        &self,
        request: &IssueRequest,
        issued_on: NaiveDate,
    ) -> Result<StudentIdentifierPair, IdentifierError> {
        let IssueRequest {
            student_name,
            program,
            department,
            year,
            sequence,
        } = request;
        let (year, sequence) = (*year, *sequence);

        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(IdentifierError::YearOutOfRange(year));
        }
        if !(1..=MAX_SEQUENCE).contains(&sequence) {
            return Err(IdentifierError::SequenceOutOfRange(sequence));
        }

        let codes = self.codes_for(program, department);

        Ok(StudentIdentifierPair {
            university_id: university_id(year, &codes, sequence),
            ugc_id: ugc_id(year, &codes.department_code, sequence),
            generated_date: issued_on,
            student_name: student_name.clone(),
            program: program.clone(),
            department: department.clone(),
            batch: batch_label(year, codes.duration_years),
            is_active: true,
        })
    }
}

fn university_id(year: u16, codes: &IdentifierCodes, sequence: u32) -> String {
    format!(
        "NU{:02}{}{}{:03}",
        year % 100,
        codes.program_code,
        codes.department_code,
        sequence
    )
}

fn ugc_id(year: u16, department_code: &str, sequence: u32) -> String {
    let check = check_digit(&ugc_payload(year, department_code, sequence));
    format!("UGC-NU-{year:04}-{department_code}-{sequence:06}-{check}")
}

/// `{year}-{yy}` where `yy` is the two-digit expected graduation year.
pub fn batch_label(year: u16, duration_years: u16) -> String {
    format!("{year}-{:02}", (year + duration_years) % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> IdentifierIssuer {
        IdentifierIssuer::new(Arc::new(Catalog::standard()))
    }

    fn request(program: &str, department: &str, year: u16, sequence: u32) -> IssueRequest {
        IssueRequest {
            student_name: "Nusrat Jahan".to_string(),
            program: program.to_string(),
            department: department.to_string(),
            year,
            sequence,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date")
    }

    #[test]
    fn issues_documented_example() {
        let pair = issuer()
            .issue(&request("bachelor", "cse", 2024, 1), today())
            .expect("pair issues");

        assert_eq!(pair.university_id, "NU24BCS001");
        assert_eq!(pair.ugc_id, "UGC-NU-2024-CS-000001-7");
        assert_eq!(pair.batch, "2024-28");
        assert!(pair.is_active);
        assert_eq!(pair.generated_date, today());
    }

    #[test]
    fn unknown_codes_fall_back_to_defaults() {
        let pair = issuer()
            .issue(&request("doctorate", "astronomy", 2024, 7), today())
            .expect("pair issues");

        assert_eq!(pair.university_id, "NU24BXX007");
        assert_eq!(pair.ugc_id, "UGC-NU-2024-XX-000007-1");
        assert_eq!(pair.batch, "2024-28");
    }

    #[test]
    fn batch_uses_program_duration() {
        let issuer = issuer();
        let masters = issuer
            .issue(&request("masters", "english", 2025, 3), today())
            .expect("pair issues");
        let diploma = issuer
            .issue(&request("diploma", "law", 2099, 3), today())
            .expect("pair issues");

        assert_eq!(masters.university_id, "NU25MEN003");
        assert_eq!(masters.batch, "2025-27");
        assert_eq!(diploma.batch, "2099-00");
    }

    #[test]
    fn code_lookup_ignores_case() {
        let codes = issuer().codes_for("MBA", "BBA");
        assert_eq!(codes.program_code, "A");
        assert_eq!(codes.department_code, "BA");
        assert_eq!(codes.duration_years, 2);
    }

    #[test]
    fn rejects_values_the_formats_cannot_hold() {
        let issuer = issuer();
        assert_eq!(
            issuer.issue(&request("bachelor", "cse", 1999, 1), today()),
            Err(IdentifierError::YearOutOfRange(1999))
        );
        assert_eq!(
            issuer.issue(&request("bachelor", "cse", 2024, 0), today()),
            Err(IdentifierError::SequenceOutOfRange(0))
        );
        assert_eq!(
            issuer.issue(&request("bachelor", "cse", 2024, 1000), today()),
            Err(IdentifierError::SequenceOutOfRange(1000))
        );
    }
}
