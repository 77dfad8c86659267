//! Transfer-credit staging and CGPA combination.

mod grades;
mod import;

pub use grades::GradeScale;
pub use import::{TranscriptImportError, TranscriptImporter};

use serde::{Deserialize, Serialize};

const MAX_GRADE_POINT: f64 = 4.0;

/// A course as an operator stages it, before it is checked for submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedTransferCourse {
    pub code: String,
    pub title: String,
    pub credits: u32,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub gpa: Option<f64>,
}

/// A graded course accepted into the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferCourse {
    pub code: String,
    pub title: String,
    pub credits: u32,
    pub grade: String,
    pub gpa: f64,
}

/// Credits and CGPA already earned in the receiving program.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AcademicRecord {
    pub completed_credits: u32,
    pub previous_cgpa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferSummary {
    pub transfer_credits: u32,
    pub transfer_gpa: f64,
    pub combined_credits: u32,
    pub combined_cgpa: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranscriptError {
    #[error("transfer course is missing a course code")]
    MissingCode,
    #[error("transfer course {0} must carry at least one credit")]
    ZeroCredits(String),
    #[error("transfer course {0} has no grade")]
    MissingGrade(String),
    #[error("transfer course {code} (grade '{grade}') has no grade point")]
    MissingGradePoint { code: String, grade: String },
    #[error("transfer course {code} grade point {gpa} is outside 0.00-4.00")]
    GradePointOutOfRange { code: String, gpa: f64 },
    #[error("existing CGPA {0} is outside 0.00-4.00")]
    RecordCgpaOutOfRange(f64),
    #[error("combined credit total is too large")]
    CreditOverflow,
}

impl AcademicRecord {
    /// Rejects a record whose CGPA is not a finite value on the 4.00 scale.
    pub fn validate(&self) -> Result<(), TranscriptError> {
        if self.previous_cgpa.is_finite() && (0.0..=MAX_GRADE_POINT).contains(&self.previous_cgpa)
        {
            Ok(())
        } else {
            Err(TranscriptError::RecordCgpaOutOfRange(self.previous_cgpa))
        }
    }
}

impl StagedTransferCourse {
    /// Checks the course is complete enough for final submission. Both the
    /// grade and the grade point must be present.
    pub fn finalize(&self) -> Result<TransferCourse, TranscriptError> {
        self.finalize_against(None)
    }

    /// Like [`finalize`](Self::finalize), but a missing grade point is taken
    /// from `scale` when the grade is on it.
    pub fn finalize_with_inference(
        &self,
        scale: &GradeScale,
    ) -> Result<TransferCourse, TranscriptError> {
        self.finalize_against(Some(scale))
    }

    fn finalize_against(
        &self,
        scale: Option<&GradeScale>,
    ) -> Result<TransferCourse, TranscriptError> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(TranscriptError::MissingCode);
        }
        if self.credits == 0 {
            return Err(TranscriptError::ZeroCredits(code.to_string()));
        }

        let grade = self
            .grade
            .as_deref()
            .map(str::trim)
            .filter(|grade| !grade.is_empty())
            .ok_or_else(|| TranscriptError::MissingGrade(code.to_string()))?;

        let gpa = self
            .gpa
            .or_else(|| scale.and_then(|scale| scale.points_for(grade)))
            .ok_or_else(|| TranscriptError::MissingGradePoint {
                code: code.to_string(),
                grade: grade.to_string(),
            })?;

        if !gpa.is_finite() || !(0.0..=MAX_GRADE_POINT).contains(&gpa) {
            return Err(TranscriptError::GradePointOutOfRange {
                code: code.to_string(),
                gpa,
            });
        }

        Ok(TransferCourse {
            code: code.to_string(),
            title: self.title.trim().to_string(),
            credits: self.credits,
            grade: grade.to_ascii_uppercase(),
            gpa,
        })
    }
}

/// Finalizes every staged course; the first incomplete one fails the batch.
/// With a scale, missing grade points are inferred from it.
pub fn finalize_all(
    staged: &[StagedTransferCourse],
    scale: Option<&GradeScale>,
) -> Result<Vec<TransferCourse>, TranscriptError> {
    staged
        .iter()
        .map(|course| course.finalize_against(scale))
        .collect()
}

/// Credit-weighted merge of transferred courses into an existing record.
///
/// The record itself is not range-checked here; see [`AcademicRecord::validate`].
pub fn combine(
    courses: &[TransferCourse],
    existing: &AcademicRecord,
) -> Result<TransferSummary, TranscriptError> {
    let transfer_credits = courses
        .iter()
        .try_fold(0u32, |total, course| total.checked_add(course.credits))
        .ok_or(TranscriptError::CreditOverflow)?;
    let weighted_points: f64 = courses
        .iter()
        .map(|course| course.gpa * f64::from(course.credits))
        .sum();

    let transfer_gpa = if transfer_credits == 0 {
        0.0
    } else {
        weighted_points / f64::from(transfer_credits)
    };

    let combined_credits = existing
        .completed_credits
        .checked_add(transfer_credits)
        .ok_or(TranscriptError::CreditOverflow)?;
    let combined_cgpa = if combined_credits == 0 {
        0.0
    } else {
        (existing.previous_cgpa * f64::from(existing.completed_credits)
            + transfer_gpa * f64::from(transfer_credits))
            / f64::from(combined_credits)
    };

    Ok(TransferSummary {
        transfer_credits,
        transfer_gpa,
        combined_credits,
        combined_cgpa,
    })
}
