use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::identifiers::StudentIdentifierPair;

/// Storage abstraction for issued identifier pairs.
///
/// Pairs are keyed by university id. The UGC id carries no program level, so
/// `bachelor/cse` and `masters/cse` in the same year can hold the same UGC id;
/// implementations must not treat it as unique.
pub trait IdentifierRepository: Send + Sync {
    fn insert(&self, pair: StudentIdentifierPair)
        -> Result<StudentIdentifierPair, RepositoryError>;
    fn update(&self, pair: StudentIdentifierPair) -> Result<(), RepositoryError>;
    fn fetch(&self, university_id: &str) -> Result<Option<StudentIdentifierPair>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("identifier already issued")]
    Conflict,
    #[error("identifier not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for the e-mail/SMS collaborators.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: AdmissionNotice) -> Result<(), NotificationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionNotice {
    pub template: String,
    pub university_id: String,
    pub details: BTreeMap<String, String>,
}

impl AdmissionNotice {
    pub fn identifiers_issued(pair: &StudentIdentifierPair) -> Self {
        let mut details = BTreeMap::new();
        details.insert("student_name".to_string(), pair.student_name.clone());
        details.insert("ugc_id".to_string(), pair.ugc_id.clone());
        details.insert("batch".to_string(), pair.batch.clone());
        Self {
            template: "identifiers_issued".to_string(),
            university_id: pair.university_id.clone(),
            details,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
