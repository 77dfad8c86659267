use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::catalog::Catalog;
use super::fees::{
    compute_fee, FeeApplication, FeeBreakdown, FeeCalculator, FeeError, FeeQuote,
    FirstSemesterFee,
};
use super::identifiers::{
    is_valid_university_id, IdentifierError, IdentifierIssuer, IssueRequest, SequenceError,
    SequenceKey, SequenceSource, StudentIdentifierPair,
};
use super::repository::{
    AdmissionNotice, IdentifierRepository, NotificationPublisher, RepositoryError,
};
use super::transfer::{
    combine, finalize_all, AcademicRecord, GradeScale, StagedTransferCourse, TranscriptError,
    TransferSummary,
};

/// Approval of an applicant, ready for identifier issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub student_name: String,
    pub program: String,
    pub department: String,
    pub year: u16,
}

/// Facade composing the catalog-bound engine with storage and notification.
pub struct AdmissionsService<R, N> {
    catalog: Arc<Catalog>,
    fees: FeeCalculator,
    issuer: IdentifierIssuer,
    grade_scale: Option<GradeScale>,
    sequence: Arc<dyn SequenceSource>,
    repository: Arc<R>,
    notices: Arc<N>,
}

impl<R, N> AdmissionsService<R, N>
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(
        catalog: Arc<Catalog>,
        sequence: Arc<dyn SequenceSource>,
        repository: Arc<R>,
        notices: Arc<N>,
    ) -> Self {
        Self {
            fees: FeeCalculator::new(catalog.clone()),
            issuer: IdentifierIssuer::new(catalog.clone()),
            grade_scale: None,
            catalog,
            sequence,
            repository,
            notices,
        }
    }

    /// Fill in missing transfer grade points from `grade_scale`. Without it,
    /// every staged course must carry its own grade point.
    pub fn with_grade_scale(mut self, grade_scale: GradeScale) -> Self {
        self.grade_scale = Some(grade_scale);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolve_waiver<I, S>(&self, selected: I) -> u8
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fees.resolver().resolve(selected)
    }

    pub fn compute_fee(&self, base_amount: u64, waiver_percentage: u8) -> FeeBreakdown {
        compute_fee(base_amount, waiver_percentage)
    }

    pub fn quote(&self, application: &FeeApplication) -> Result<FeeQuote, AdmissionsServiceError> {
        Ok(self.fees.quote(application)?)
    }

    pub fn first_semester<I, S>(
        &self,
        program_id: &str,
        selected: I,
    ) -> Result<FirstSemesterFee, AdmissionsServiceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let percentage = self.resolve_waiver(selected);
        Ok(self.fees.first_semester(program_id, percentage)?)
    }

    /// Issue identifiers for an approved applicant, dated today.
    pub fn approve(
        &self,
        request: &ApprovalRequest,
    ) -> Result<StudentIdentifierPair, AdmissionsServiceError> {
        self.approve_on(request, Local::now().date_naive())
    }

    pub fn approve_on(
        &self,
        request: &ApprovalRequest,
        issued_on: NaiveDate,
    ) -> Result<StudentIdentifierPair, AdmissionsServiceError> {
        // Scoped by the codes that end up in the identifier, so every unknown
        // department shares the `XX` counter.
        let codes = self.issuer.codes_for(&request.program, &request.department);
        let key = SequenceKey::new(&codes.program_code, &codes.department_code, request.year);
        let sequence = self.sequence.next(&key)?;

        let pair = self.issuer.issue(
            &IssueRequest {
                student_name: request.student_name.clone(),
                program: request.program.clone(),
                department: request.department.clone(),
                year: request.year,
                sequence,
            },
            issued_on,
        )?;

        let stored = self.repository.insert(pair)?;
        info!(
            university_id = %stored.university_id,
            ugc_id = %stored.ugc_id,
            %key,
            "issued student identifiers"
        );

        // Delivery failures do not undo issuance.
        if let Err(err) = self
            .notices
            .publish(AdmissionNotice::identifiers_issued(&stored))
        {
            warn!(
                university_id = %stored.university_id,
                error = %err,
                "identifier notice not delivered"
            );
        }

        Ok(stored)
    }

    pub fn lookup(
        &self,
        university_id: &str,
    ) -> Result<StudentIdentifierPair, AdmissionsServiceError> {
        if !is_valid_university_id(university_id) {
            return Err(IdentifierError::MalformedUniversityId(university_id.to_string()).into());
        }

        let pair = self
            .repository
            .fetch(university_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(pair)
    }

    /// Soft-revoke an issued pair. The identifier strings stay untouched.
    pub fn deactivate(
        &self,
        university_id: &str,
    ) -> Result<StudentIdentifierPair, AdmissionsServiceError> {
        let mut pair = self.lookup(university_id)?;
        if pair.is_active {
            pair.is_active = false;
            self.repository.update(pair.clone())?;
            info!(university_id, "deactivated student identifiers");
        }
        Ok(pair)
    }

    pub fn combine_transfer(
        &self,
        staged: &[StagedTransferCourse],
        existing: &AcademicRecord,
    ) -> Result<TransferSummary, AdmissionsServiceError> {
        existing.validate()?;
        let courses = finalize_all(staged, self.grade_scale.as_ref())?;
        Ok(combine(&courses, existing)?)
    }
}

/// Error raised by the admissions service.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionsServiceError {
    #[error(transparent)]
    Fee(#[from] FeeError),
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}
