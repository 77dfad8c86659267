//! Fee, waiver, identifier and transfer-credit engine behind the admissions portal.
//!
//! Every component reads from one injected [`Catalog`]. Only identifier
//! issuance touches shared mutable state, through a [`SequenceSource`].

pub mod catalog;
pub mod fees;
pub mod identifiers;
pub mod repository;
pub mod router;
pub mod service;
pub mod transfer;
pub mod waiver;

#[cfg(test)]
mod tests;

pub use catalog::{
    Catalog, CatalogError, CostStructure, ProgramLevelCode, ProgramOffering, RegistrationPackage,
    Syllabus, SyllabusCourse, SyllabusTerm, TermCharges, WaiverCategory, WaiverPolicy,
};
pub use fees::{
    compute_fee, FeeApplication, FeeBasis, FeeBreakdown, FeeCalculator, FeeError, FeeQuote,
    FirstSemesterFee,
};
pub use identifiers::{
    is_valid_ugc_id, is_valid_university_id, parse_ugc_id, parse_university_id,
    verify_ugc_checksum, IdentifierError, IdentifierIssuer, InMemorySequenceSource, IssueRequest,
    ParsedUgcId, ParsedUniversityId, SequenceError, SequenceKey, SequenceSource,
    StudentIdentifierPair,
};
pub use repository::{
    AdmissionNotice, IdentifierRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
pub use router::{admissions_router, ValidationView};
pub use service::{AdmissionsService, AdmissionsServiceError, ApprovalRequest};
pub use transfer::{
    combine, finalize_all, AcademicRecord, GradeScale, StagedTransferCourse, TranscriptError,
    TranscriptImportError, TranscriptImporter, TransferCourse, TransferSummary,
};
pub use waiver::{WaiverResolver, MAX_WAIVER_PERCENTAGE};
