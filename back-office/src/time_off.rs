//! Staff time-off requests
//!
//! Requests are created `pending` and decided exactly once. Storage goes
//! through [`TimeOffRepository`] so the service can run against Postgres or
//! an in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use shared::error::{AppError, ErrorCode};
use shared::models::{TimeOffCreate, TimeOffDecision, TimeOffRequest, TimeOffStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use crate::db::time_off;
use crate::error::ServiceResult;
use crate::kds::RepoResult;
use crate::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};

/// Longest single request
const MAX_SPAN_DAYS: i64 = 60;

#[async_trait]
pub trait TimeOffRepository: Send + Sync {
    async fn create(&self, request: &TimeOffRequest) -> RepoResult<()>;

    async fn find(&self, tenant_id: &str, id: i64) -> RepoResult<Option<TimeOffRequest>>;

    async fn list_by_location(
        &self,
        tenant_id: &str,
        location_id: i64,
    ) -> RepoResult<Vec<TimeOffRequest>>;

    /// Set the final status if the request is still pending
    async fn decide_if_pending(
        &self,
        tenant_id: &str,
        id: i64,
        status: TimeOffStatus,
        decided_by: &str,
        now: i64,
    ) -> RepoResult<Option<TimeOffRequest>>;
}

pub struct PgTimeOffRepository {
    pool: PgPool,
}

impl PgTimeOffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimeOffRepository for PgTimeOffRepository {
    async fn create(&self, request: &TimeOffRequest) -> RepoResult<()> {
        Ok(time_off::insert(&self.pool, request).await?)
    }

    async fn find(&self, tenant_id: &str, id: i64) -> RepoResult<Option<TimeOffRequest>> {
        Ok(time_off::find(&self.pool, tenant_id, id).await?)
    }

    async fn list_by_location(
        &self,
        tenant_id: &str,
        location_id: i64,
    ) -> RepoResult<Vec<TimeOffRequest>> {
        Ok(time_off::list_for_location(&self.pool, tenant_id, location_id).await?)
    }

    async fn decide_if_pending(
        &self,
        tenant_id: &str,
        id: i64,
        status: TimeOffStatus,
        decided_by: &str,
        now: i64,
    ) -> RepoResult<Option<TimeOffRequest>> {
        Ok(time_off::decide_if_pending(&self.pool, tenant_id, id, status, decided_by, now).await?)
    }
}

pub fn validate(input: &TimeOffCreate) -> Result<(), AppError> {
    validate_required_text(&input.employee_name, "employee_name", MAX_NAME_LEN)?;
    validate_optional_text(&input.reason, "reason", MAX_NOTE_LEN)?;
    if input.end_date < input.start_date {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "end_date must not be before start_date",
        )
        .with_detail("field", "end_date"));
    }
    let span = (input.end_date - input.start_date).num_days() + 1;
    if span > MAX_SPAN_DAYS {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Request spans {span} days (max {MAX_SPAN_DAYS})"),
        )
        .with_detail("field", "end_date"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct TimeOffService {
    repo: Arc<dyn TimeOffRepository>,
}

impl TimeOffService {
    pub fn new(repo: Arc<dyn TimeOffRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, tenant_id: &str, input: TimeOffCreate) -> ServiceResult<TimeOffRequest> {
        validate(&input)?;
        let request = TimeOffRequest {
            id: snowflake_id(),
            tenant_id: tenant_id.to_string(),
            location_id: input.location_id,
            employee_id: input.employee_id,
            employee_name: input.employee_name.trim().to_string(),
            start_date: input.start_date,
            end_date: input.end_date,
            reason: input.reason,
            status: TimeOffStatus::Pending,
            decided_by: None,
            decided_at: None,
            created_at: now_millis(),
        };
        self.repo.create(&request).await?;
        tracing::info!(
            tenant_id = %tenant_id,
            request_id = request.id,
            employee_id = request.employee_id,
            "Time-off request created"
        );
        Ok(request)
    }

    pub async fn list(&self, tenant_id: &str, location_id: i64) -> ServiceResult<Vec<TimeOffRequest>> {
        Ok(self.repo.list_by_location(tenant_id, location_id).await?)
    }

    /// Approve or reject a pending request
    pub async fn decide(
        &self,
        tenant_id: &str,
        id: i64,
        decision: TimeOffDecision,
        decided_by: &str,
    ) -> ServiceResult<TimeOffRequest> {
        let target = decision.target_status();
        if let Some(decided) = self
            .repo
            .decide_if_pending(tenant_id, id, target, decided_by, now_millis())
            .await?
        {
            tracing::info!(tenant_id = %tenant_id, request_id = id, status = ?target, "Time-off request decided");
            return Ok(decided);
        }

        match self.repo.find(tenant_id, id).await? {
            None => Err(AppError::new(ErrorCode::TimeOffNotFound)
                .with_detail("request_id", id)
                .into()),
            Some(current) => Err(AppError::new(ErrorCode::TimeOffAlreadyDecided)
                .with_detail("request_id", id)
                .with_detail(
                    "status",
                    serde_json::to_value(current.status).unwrap_or_default(),
                )
                .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryRepo {
        rows: Mutex<HashMap<i64, TimeOffRequest>>,
    }

    #[async_trait]
    impl TimeOffRepository for MemoryRepo {
        async fn create(&self, request: &TimeOffRequest) -> RepoResult<()> {
            self.rows.lock().insert(request.id, request.clone());
            Ok(())
        }

        async fn find(&self, tenant_id: &str, id: i64) -> RepoResult<Option<TimeOffRequest>> {
            Ok(self
                .rows
                .lock()
                .get(&id)
                .filter(|r| r.tenant_id == tenant_id)
                .cloned())
        }

        async fn list_by_location(
            &self,
            tenant_id: &str,
            location_id: i64,
        ) -> RepoResult<Vec<TimeOffRequest>> {
            let mut rows: Vec<_> = self
                .rows
                .lock()
                .values()
                .filter(|r| r.tenant_id == tenant_id && r.location_id == location_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.start_date.cmp(&b.start_date));
            Ok(rows)
        }

        async fn decide_if_pending(
            &self,
            tenant_id: &str,
            id: i64,
            status: TimeOffStatus,
            decided_by: &str,
            now: i64,
        ) -> RepoResult<Option<TimeOffRequest>> {
            let mut rows = self.rows.lock();
            match rows.get_mut(&id) {
                Some(r) if r.tenant_id == tenant_id && r.status == TimeOffStatus::Pending => {
                    r.status = status;
                    r.decided_by = Some(decided_by.to_string());
                    r.decided_at = Some(now);
                    Ok(Some(r.clone()))
                }
                _ => Ok(None),
            }
        }
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    fn input(start: u32, end: u32) -> TimeOffCreate {
        TimeOffCreate {
            location_id: 1,
            employee_id: 42,
            employee_name: "Lucía Martín".into(),
            start_date: date(start),
            end_date: date(end),
            reason: Some("Vacaciones".into()),
        }
    }

    fn service() -> TimeOffService {
        TimeOffService::new(Arc::new(MemoryRepo::default()))
    }

    fn app_code(err: crate::error::ServiceError) -> ErrorCode {
        AppError::from(err).code
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = validate(&input(10, 9)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        assert!(validate(&input(10, 10)).is_ok());
    }

    #[test]
    fn employee_name_is_required() {
        let mut req = input(1, 2);
        req.employee_name = "  ".into();
        assert_eq!(validate(&req).unwrap_err().code, ErrorCode::RequiredField);
    }

    #[tokio::test]
    async fn create_then_approve() {
        let svc = service();
        let created = svc.create("t1", input(3, 7)).await.unwrap();
        assert_eq!(created.status, TimeOffStatus::Pending);

        let decided = svc
            .decide("t1", created.id, TimeOffDecision::Approve, "manager@casapepe.es")
            .await
            .unwrap();
        assert_eq!(decided.status, TimeOffStatus::Approved);
        assert_eq!(decided.decided_by.as_deref(), Some("manager@casapepe.es"));
        assert!(decided.decided_at.is_some());

        let listed = svc.list("t1", 1).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(svc.list("t2", 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn decision_is_final() {
        let svc = service();
        let created = svc.create("t1", input(3, 7)).await.unwrap();
        svc.decide("t1", created.id, TimeOffDecision::Reject, "m")
            .await
            .unwrap();

        let err = svc
            .decide("t1", created.id, TimeOffDecision::Approve, "m")
            .await
            .unwrap_err();
        assert_eq!(app_code(err), ErrorCode::TimeOffAlreadyDecided);
    }

    #[tokio::test]
    async fn other_tenant_cannot_decide() {
        let svc = service();
        let created = svc.create("t1", input(3, 7)).await.unwrap();
        let err = svc
            .decide("t2", created.id, TimeOffDecision::Approve, "m")
            .await
            .unwrap_err();
        assert_eq!(app_code(err), ErrorCode::TimeOffNotFound);
    }
}
