//! University and UGC identifier issuance, sequencing and validation.

pub mod checksum;
mod issuer;
pub mod sequence;
mod validation;

pub use issuer::{
    batch_label, IdentifierCodes, IdentifierError, IdentifierIssuer, IssueRequest,
    StudentIdentifierPair, DEFAULT_DEPARTMENT_CODE, DEFAULT_DURATION_YEARS, DEFAULT_PROGRAM_CODE,
};
pub use sequence::{InMemorySequenceSource, SequenceError, SequenceKey, SequenceSource};
pub use validation::{
    is_valid_ugc_id, is_valid_university_id, parse_ugc_id, parse_university_id,
    verify_ugc_checksum, ParsedUgcId, ParsedUniversityId,
};
