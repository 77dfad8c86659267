use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::admissions::catalog::Catalog;
use crate::workflows::admissions::identifiers::{
    InMemorySequenceSource, SequenceError, SequenceKey, SequenceSource, StudentIdentifierPair,
};
use crate::workflows::admissions::repository::{
    AdmissionNotice, IdentifierRepository, NotificationError, NotificationPublisher,
    RepositoryError,
};
use crate::workflows::admissions::service::{AdmissionsService, ApprovalRequest};
use crate::workflows::admissions::transfer::StagedTransferCourse;
use crate::workflows::admissions::{admissions_router, FeeCalculator, WaiverResolver};

pub(super) fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::standard())
}

pub(super) fn resolver() -> WaiverResolver {
    WaiverResolver::new(catalog())
}

pub(super) fn calculator() -> FeeCalculator {
    FeeCalculator::new(catalog())
}

pub(super) fn issued_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 15).expect("valid date")
}

pub(super) fn approval(program: &str, department: &str, year: u16) -> ApprovalRequest {
    ApprovalRequest {
        student_name: "Tanvir Ahmed".to_string(),
        program: program.to_string(),
        department: department.to_string(),
        year,
    }
}

pub(super) fn staged(
    code: &str,
    credits: u32,
    grade: Option<&str>,
    gpa: Option<f64>,
) -> StagedTransferCourse {
    StagedTransferCourse {
        code: code.to_string(),
        title: format!("{code} transfer"),
        credits,
        grade: grade.map(str::to_string),
        gpa,
    }
}

pub(super) type MemoryService = AdmissionsService<MemoryRepository, MemoryNotices>;

pub(super) fn build_service() -> (MemoryService, Arc<MemoryRepository>, Arc<MemoryNotices>) {
    let repository = Arc::new(MemoryRepository::default());
    let notices = Arc::new(MemoryNotices::default());
    let service = AdmissionsService::new(
        catalog(),
        Arc::new(InMemorySequenceSource::default()),
        repository.clone(),
        notices.clone(),
    );
    (service, repository, notices)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<String, StudentIdentifierPair>>>,
}

impl IdentifierRepository for MemoryRepository {
    fn insert(
        &self,
        pair: StudentIdentifierPair,
    ) -> Result<StudentIdentifierPair, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&pair.university_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(pair.university_id.clone(), pair.clone());
        Ok(pair)
    }

    fn update(&self, pair: StudentIdentifierPair) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(pair.university_id.clone(), pair);
        Ok(())
    }

    fn fetch(&self, university_id: &str) -> Result<Option<StudentIdentifierPair>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(university_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotices {
    events: Arc<Mutex<Vec<AdmissionNotice>>>,
}

impl MemoryNotices {
    pub(super) fn events(&self) -> Vec<AdmissionNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotices {
    fn publish(&self, notice: AdmissionNotice) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notice mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct OfflineNotices;

impl NotificationPublisher for OfflineNotices {
    fn publish(&self, _notice: AdmissionNotice) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp relay offline".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl IdentifierRepository for UnavailableRepository {
    fn insert(
        &self,
        _pair: StudentIdentifierPair,
    ) -> Result<StudentIdentifierPair, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _pair: StudentIdentifierPair) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _university_id: &str) -> Result<Option<StudentIdentifierPair>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Deterministic stand-in that always hands out the same number.
pub(super) struct FixedSequence(pub(super) u32);

impl SequenceSource for FixedSequence {
    fn next(&self, _key: &SequenceKey) -> Result<u32, SequenceError> {
        Ok(self.0)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    admissions_router(Arc::new(service))
}
