use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use nu_admissions::workflows::admissions::{
    AdmissionNotice, IdentifierRepository, NotificationError, NotificationPublisher,
    RepositoryError, StudentIdentifierPair,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryIdentifierRepository {
    pairs: Arc<Mutex<HashMap<String, StudentIdentifierPair>>>,
}

impl IdentifierRepository for InMemoryIdentifierRepository {
    fn insert(
        &self,
        pair: StudentIdentifierPair,
    ) -> Result<StudentIdentifierPair, RepositoryError> {
        let mut guard = self
            .pairs
            .lock()
            .map_err(|_| RepositoryError::Unavailable("identifier store poisoned".into()))?;
        if guard.contains_key(&pair.university_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(pair.university_id.clone(), pair.clone());
        Ok(pair)
    }

    fn update(&self, pair: StudentIdentifierPair) -> Result<(), RepositoryError> {
        let mut guard = self
            .pairs
            .lock()
            .map_err(|_| RepositoryError::Unavailable("identifier store poisoned".into()))?;
        match guard.get_mut(&pair.university_id) {
            Some(existing) => {
                *existing = pair;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, university_id: &str) -> Result<Option<StudentIdentifierPair>, RepositoryError> {
        let guard = self
            .pairs
            .lock()
            .map_err(|_| RepositoryError::Unavailable("identifier store poisoned".into()))?;
        Ok(guard.get(university_id).cloned())
    }
}

/// Records notices in memory and logs them; stands in for the mail/SMS relay.
#[derive(Default, Clone)]
pub(crate) struct InMemoryNotificationPublisher {
    events: Arc<Mutex<Vec<AdmissionNotice>>>,
}

impl NotificationPublisher for InMemoryNotificationPublisher {
    fn publish(&self, notice: AdmissionNotice) -> Result<(), NotificationError> {
        info!(
            template = %notice.template,
            university_id = %notice.university_id,
            "queued admission notice"
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| NotificationError::Transport("notice outbox poisoned".into()))?;
        guard.push(notice);
        Ok(())
    }
}

#[cfg(test)]
impl InMemoryNotificationPublisher {
    pub(crate) fn events(&self) -> Vec<AdmissionNotice> {
        self.events.lock().expect("notice mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_dates() {
        let date = parse_date(" 2024-07-15 ").expect("date parses");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 7, 15).expect("valid date"));
    }

    #[test]
    fn parse_date_rejects_other_layouts() {
        let err = parse_date("15/07/2024").expect_err("layout rejected");
        assert!(err.contains("YYYY-MM-DD"));
    }
}
