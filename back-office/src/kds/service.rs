//! KDS service: guarded transitions, board rendering, flags

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    Destination, KdsAction, KdsBoard, OrderFlagKind, PrepStatus, Ticket, TicketLine,
    TicketOrderFlag, TicketOrderFlagInput,
};
use shared::util::now_millis;

use super::board::{BoardInput, build_board};
use super::feed::RowChange;
use super::overdue::OverduePolicy;
use super::repository::{KdsRepository, RepoError};
use super::state_machine::{self, LineUpdate};
use crate::config::KdsThresholds;
use crate::error::{ServiceError, ServiceResult};
use crate::live::LiveKdsHub;

/// Transition failure reported to the screen
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("Ticket not found: {0}")]
    TicketNotFound(i64),

    #[error("Ticket line not found: {0}")]
    LineNotFound(i64),

    #[error("Ticket {0} is closed")]
    TicketClosed(i64),

    #[error("Cannot {action} a line that is {current}")]
    InvalidTransition {
        line_id: i64,
        action: KdsAction,
        current: PrepStatus,
    },

    /// The row moved under us; carries the row as it is now
    #[error("Line {} was changed by another device", .0.id)]
    Conflict(Box<TicketLine>),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        let message = err.to_string();
        let app = match err {
            TransitionError::TicketNotFound(id) => {
                AppError::with_message(ErrorCode::TicketNotFound, message).with_detail("ticket_id", id)
            }
            TransitionError::LineNotFound(id) => {
                AppError::with_message(ErrorCode::TicketLineNotFound, message)
                    .with_detail("line_id", id)
            }
            TransitionError::TicketClosed(id) => {
                AppError::with_message(ErrorCode::TicketClosed, message).with_detail("ticket_id", id)
            }
            TransitionError::InvalidTransition {
                line_id,
                action,
                current,
            } => AppError::with_message(ErrorCode::InvalidTransition, message)
                .with_detail("line_id", line_id)
                .with_detail("action", action.as_str())
                .with_detail("current_status", current.as_str()),
            TransitionError::Conflict(line) => {
                let current = serde_json::to_value(&*line).unwrap_or_default();
                AppError::with_message(ErrorCode::TransitionConflict, message)
                    .with_detail("current", current)
            }
            TransitionError::Repo(e) => return ServiceError::from(e),
        };
        ServiceError::App(app)
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        ServiceError::from(err).into()
    }
}

#[derive(Clone)]
pub struct KdsService {
    repo: Arc<dyn KdsRepository>,
    hub: LiveKdsHub,
    thresholds: KdsThresholds,
}

impl KdsService {
    pub fn new(repo: Arc<dyn KdsRepository>, hub: LiveKdsHub, thresholds: KdsThresholds) -> Self {
        Self {
            repo,
            hub,
            thresholds,
        }
    }

    pub fn hub(&self) -> &LiveKdsHub {
        &self.hub
    }

    /// Apply `action` to a single line
    pub async fn transition_line(
        &self,
        tenant_id: &str,
        line_id: i64,
        action: KdsAction,
    ) -> Result<TicketLine, TransitionError> {
        let line = self
            .repo
            .find_line(tenant_id, line_id)
            .await?
            .ok_or(TransitionError::LineNotFound(line_id))?;
        let ticket = self.open_ticket(tenant_id, line.ticket_id).await?;

        if !state_machine::can_apply(action, line.prep_status) {
            return Err(TransitionError::InvalidTransition {
                line_id,
                action,
                current: line.prep_status,
            });
        }

        let update = state_machine::plan(action, now_millis());
        match self.repo.compare_and_set(tenant_id, line_id, &update).await? {
            Some(updated) => {
                tracing::info!(
                    tenant_id = %tenant_id,
                    line_id,
                    action = %action,
                    status = %updated.prep_status,
                    "KDS line transitioned"
                );
                self.hub
                    .publish_line(tenant_id, ticket.location_id, updated.clone());
                Ok(updated)
            }
            None => Err(self.explain_lost_race(tenant_id, line_id, &update).await),
        }
    }

    /// Apply `action` to every line of a ticket (or one course) in the
    /// action's source state. Lines in other states are left alone.
    pub async fn transition_group(
        &self,
        tenant_id: &str,
        ticket_id: i64,
        course: Option<i32>,
        action: KdsAction,
    ) -> Result<Vec<TicketLine>, TransitionError> {
        let ticket = self.open_ticket(tenant_id, ticket_id).await?;
        let update = state_machine::plan(action, now_millis());
        let updated = self
            .repo
            .transition_group(tenant_id, ticket_id, course, &update)
            .await?;

        if updated.is_empty() {
            // Closed between the check and the write
            self.open_ticket(tenant_id, ticket_id).await?;
            tracing::debug!(tenant_id = %tenant_id, ticket_id, ?course, action = %action, "No lines matched bulk transition");
            return Ok(updated);
        }

        tracing::info!(
            tenant_id = %tenant_id,
            ticket_id,
            ?course,
            action = %action,
            count = updated.len(),
            "KDS bulk transition"
        );
        for line in &updated {
            self.hub
                .publish_line(tenant_id, ticket.location_id, line.clone());
        }
        Ok(updated)
    }

    /// Board of open tickets for a location
    pub async fn board(
        &self,
        tenant_id: &str,
        location_id: i64,
        destination: Option<Destination>,
    ) -> ServiceResult<KdsBoard> {
        let tickets = self.repo.list_open_tickets(tenant_id, location_id).await?;
        let ticket_ids: Vec<i64> = tickets.iter().map(|t| t.id).collect();
        let (lines, flags, overrides) = if ticket_ids.is_empty() {
            Default::default()
        } else {
            (
                self.repo.list_lines(tenant_id, &ticket_ids).await?,
                self.repo.list_flags(tenant_id, &ticket_ids).await?,
                self.repo.product_thresholds(tenant_id).await?,
            )
        };
        let policy = OverduePolicy::new(self.thresholds, overrides);

        Ok(build_board(BoardInput {
            location_id,
            destination,
            tickets: &tickets,
            lines,
            flags: &flags,
            policy: &policy,
            now: now_millis(),
        }))
    }

    /// Set (or replace the note of) a ticket flag; returns the ticket's flags
    pub async fn set_flag(
        &self,
        tenant_id: &str,
        ticket_id: i64,
        input: TicketOrderFlagInput,
    ) -> Result<Vec<TicketOrderFlag>, ServiceError> {
        let ticket = self.open_ticket(tenant_id, ticket_id).await?;
        let flag = TicketOrderFlag {
            ticket_id,
            tenant_id: tenant_id.to_string(),
            flag: input.flag,
            note: input.note,
            created_at: now_millis(),
        };
        self.repo.upsert_flag(&flag).await?;
        self.publish_flags(&ticket).await
    }

    pub async fn clear_flag(
        &self,
        tenant_id: &str,
        ticket_id: i64,
        flag: OrderFlagKind,
    ) -> Result<Vec<TicketOrderFlag>, ServiceError> {
        let ticket = self.open_ticket(tenant_id, ticket_id).await?;
        if !self.repo.clear_flag(tenant_id, ticket_id, flag).await? {
            return Err(AppError::not_found(format!("Flag {flag:?} on ticket {ticket_id}")).into());
        }
        self.publish_flags(&ticket).await
    }

    /// Push a row written outside this service (POS, seeding) to the screens
    pub async fn relay_change(&self, change: &RowChange) -> ServiceResult<()> {
        match change {
            RowChange::TicketLines { tenant_id, line_id } => {
                let Some(line) = self.repo.find_line(tenant_id, *line_id).await? else {
                    return Ok(());
                };
                let Some(ticket) = self.repo.find_ticket(tenant_id, line.ticket_id).await? else {
                    return Ok(());
                };
                self.hub.publish_line(tenant_id, ticket.location_id, line);
            }
            RowChange::TicketOrderFlags {
                tenant_id,
                ticket_id,
            } => {
                if let Some(ticket) = self.repo.find_ticket(tenant_id, *ticket_id).await? {
                    self.publish_flags(&ticket).await?;
                }
            }
        }
        Ok(())
    }

    async fn publish_flags(&self, ticket: &Ticket) -> Result<Vec<TicketOrderFlag>, ServiceError> {
        let flags = self.repo.list_flags(&ticket.tenant_id, &[ticket.id]).await?;
        self.hub
            .publish_flags(&ticket.tenant_id, ticket.location_id, ticket.id, flags.clone());
        Ok(flags)
    }

    async fn open_ticket(&self, tenant_id: &str, ticket_id: i64) -> Result<Ticket, TransitionError> {
        let ticket = self
            .repo
            .find_ticket(tenant_id, ticket_id)
            .await?
            .ok_or(TransitionError::TicketNotFound(ticket_id))?;
        if ticket.is_closed() {
            return Err(TransitionError::TicketClosed(ticket_id));
        }
        Ok(ticket)
    }

    /// The guarded write matched nothing: re-read to report why
    async fn explain_lost_race(
        &self,
        tenant_id: &str,
        line_id: i64,
        update: &LineUpdate,
    ) -> TransitionError {
        let line = match self.repo.find_line(tenant_id, line_id).await {
            Ok(Some(line)) => line,
            Ok(None) => return TransitionError::LineNotFound(line_id),
            Err(e) => return e.into(),
        };
        if let Err(e) = self.open_ticket(tenant_id, line.ticket_id).await {
            return e;
        }
        tracing::warn!(
            tenant_id = %tenant_id,
            line_id,
            expected = %update.expected,
            current = %line.prep_status,
            "KDS transition lost a concurrent update"
        );
        TransitionError::Conflict(Box::new(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kds::memory::InMemoryKdsRepository;
    use crate::kds::repository::RepoResult;
    use async_trait::async_trait;
    use shared::live::KdsMessage;
    use std::collections::HashMap;

    const TENANT: &str = "t1";

    fn ticket(id: i64) -> Ticket {
        Ticket {
            id,
            tenant_id: TENANT.into(),
            location_id: 1,
            table_name: Some("Terraza 4".into()),
            opened_at: 0,
            closed_at: None,
        }
    }

    fn line(id: i64, ticket_id: i64, course: i32, status: PrepStatus) -> TicketLine {
        TicketLine {
            id,
            tenant_id: TENANT.into(),
            ticket_id,
            product_id: 100 + id,
            product_name: format!("Plato {id}"),
            quantity: 1,
            course,
            destination: Destination::Kitchen,
            prep_status: status,
            note: None,
            created_at: id,
            prep_started_at: None,
            ready_at: None,
            served_at: None,
            updated_at: 0,
        }
    }

    fn create_test_service() -> (KdsService, Arc<InMemoryKdsRepository>) {
        let repo = Arc::new(InMemoryKdsRepository::new());
        repo.insert_ticket(ticket(1));
        let service = KdsService::new(repo.clone(), LiveKdsHub::new(), KdsThresholds::default());
        (service, repo)
    }

    #[tokio::test]
    async fn start_then_finish_then_serve() {
        let (service, repo) = create_test_service();
        repo.insert_line(line(1, 1, 1, PrepStatus::Pending));

        let l = service.transition_line(TENANT, 1, KdsAction::Start).await.unwrap();
        assert_eq!(l.prep_status, PrepStatus::Preparing);
        assert!(l.prep_started_at.is_some());

        let l = service.transition_line(TENANT, 1, KdsAction::Finish).await.unwrap();
        assert_eq!(l.prep_status, PrepStatus::Ready);
        assert!(l.ready_at.is_some());

        let l = service.transition_line(TENANT, 1, KdsAction::Serve).await.unwrap();
        assert_eq!(l.prep_status, PrepStatus::Served);
        assert!(l.served_at.is_some());

        let l = service.transition_line(TENANT, 1, KdsAction::Recover).await.unwrap();
        assert_eq!(l.prep_status, PrepStatus::Ready);
        assert!(l.served_at.is_none());
    }

    #[tokio::test]
    async fn start_requires_pending() {
        let (service, repo) = create_test_service();
        repo.insert_line(line(1, 1, 1, PrepStatus::Ready));

        let err = service
            .transition_line(TENANT, 1, KdsAction::Start)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransitionError::InvalidTransition {
                current: PrepStatus::Ready,
                ..
            }
        ));
        let app: AppError = ServiceError::from(err).into();
        assert_eq!(app.code, ErrorCode::InvalidTransition);
    }

    #[tokio::test]
    async fn unknown_line_and_other_tenant() {
        let (service, repo) = create_test_service();
        repo.insert_line(line(1, 1, 1, PrepStatus::Pending));

        let err = service
            .transition_line(TENANT, 99, KdsAction::Start)
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::LineNotFound(99)));

        let err = service
            .transition_line("other", 1, KdsAction::Start)
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::LineNotFound(1)));
    }

    #[tokio::test]
    async fn closed_ticket_rejects_transitions() {
        let (service, repo) = create_test_service();
        repo.insert_line(line(1, 1, 1, PrepStatus::Pending));
        repo.close_ticket(1, 50);

        let err = service
            .transition_line(TENANT, 1, KdsAction::Start)
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::TicketClosed(1)));

        let err = service
            .transition_group(TENANT, 1, None, KdsAction::Start)
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionError::TicketClosed(1)));
    }

    #[tokio::test]
    async fn bulk_course_only_touches_source_state() {
        let (service, repo) = create_test_service();
        repo.insert_line(line(1, 1, 1, PrepStatus::Pending));
        repo.insert_line(line(2, 1, 1, PrepStatus::Preparing));
        repo.insert_line(line(3, 1, 1, PrepStatus::Pending));
        repo.insert_line(line(4, 1, 2, PrepStatus::Pending));

        let updated = service
            .transition_group(TENANT, 1, Some(1), KdsAction::Start)
            .await
            .unwrap();
        let ids: Vec<i64> = updated.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let untouched = repo.find_line(TENANT, 2).await.unwrap().unwrap();
        assert_eq!(untouched.prep_status, PrepStatus::Preparing);
        assert!(untouched.prep_started_at.is_none());
        let other_course = repo.find_line(TENANT, 4).await.unwrap().unwrap();
        assert_eq!(other_course.prep_status, PrepStatus::Pending);
    }

    #[tokio::test]
    async fn whole_ticket_and_empty_match() {
        let (service, repo) = create_test_service();
        repo.insert_line(line(1, 1, 1, PrepStatus::Pending));
        repo.insert_line(line(2, 1, 2, PrepStatus::Pending));

        let updated = service
            .transition_group(TENANT, 1, None, KdsAction::Start)
            .await
            .unwrap();
        assert_eq!(updated.len(), 2);

        let none = service
            .transition_group(TENANT, 1, None, KdsAction::Serve)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    /// Hands out a stale read, then lets another device win the write
    struct RacingRepo {
        inner: InMemoryKdsRepository,
        winner: TicketLine,
    }

    #[async_trait]
    impl KdsRepository for RacingRepo {
        async fn find_ticket(&self, t: &str, id: i64) -> RepoResult<Option<Ticket>> {
            self.inner.find_ticket(t, id).await
        }
        async fn find_line(&self, t: &str, id: i64) -> RepoResult<Option<TicketLine>> {
            self.inner.find_line(t, id).await
        }
        async fn compare_and_set(
            &self,
            t: &str,
            id: i64,
            update: &LineUpdate,
        ) -> RepoResult<Option<TicketLine>> {
            self.inner.insert_line(self.winner.clone());
            self.inner.compare_and_set(t, id, update).await
        }
        async fn transition_group(
            &self,
            t: &str,
            ticket_id: i64,
            course: Option<i32>,
            update: &LineUpdate,
        ) -> RepoResult<Vec<TicketLine>> {
            self.inner.transition_group(t, ticket_id, course, update).await
        }
        async fn list_open_tickets(&self, t: &str, location_id: i64) -> RepoResult<Vec<Ticket>> {
            self.inner.list_open_tickets(t, location_id).await
        }
        async fn list_lines(&self, t: &str, ids: &[i64]) -> RepoResult<Vec<TicketLine>> {
            self.inner.list_lines(t, ids).await
        }
        async fn list_flags(&self, t: &str, ids: &[i64]) -> RepoResult<Vec<TicketOrderFlag>> {
            self.inner.list_flags(t, ids).await
        }
        async fn product_thresholds(&self, t: &str) -> RepoResult<HashMap<i64, i64>> {
            self.inner.product_thresholds(t).await
        }
        async fn upsert_flag(&self, flag: &TicketOrderFlag) -> RepoResult<()> {
            self.inner.upsert_flag(flag).await
        }
        async fn clear_flag(&self, t: &str, id: i64, flag: OrderFlagKind) -> RepoResult<bool> {
            self.inner.clear_flag(t, id, flag).await
        }
    }

    #[tokio::test]
    async fn lost_race_returns_conflict_with_current_line() {
        let inner = InMemoryKdsRepository::new();
        inner.insert_ticket(ticket(1));
        inner.insert_line(line(1, 1, 1, PrepStatus::Pending));
        let mut winner = line(1, 1, 1, PrepStatus::Preparing);
        winner.prep_started_at = Some(42);
        let repo = Arc::new(RacingRepo { inner, winner });
        let service = KdsService::new(repo, LiveKdsHub::new(), KdsThresholds::default());

        let err = service
            .transition_line(TENANT, 1, KdsAction::Start)
            .await
            .unwrap_err();
        match &err {
            TransitionError::Conflict(current) => {
                assert_eq!(current.prep_status, PrepStatus::Preparing);
                assert_eq!(current.prep_started_at, Some(42));
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let app: AppError = ServiceError::from(err).into();
        assert_eq!(app.code, ErrorCode::TransitionConflict);
        let details = app.details.unwrap();
        assert_eq!(details["current"]["prep_status"], "preparing");
    }

    #[tokio::test]
    async fn transitions_are_published() {
        let (service, repo) = create_test_service();
        repo.insert_line(line(1, 1, 1, PrepStatus::Pending));
        let mut rx = service.hub().subscribe(TENANT);

        service.transition_line(TENANT, 1, KdsAction::Start).await.unwrap();

        match rx.recv().await.unwrap() {
            KdsMessage::LineChanged { location_id, line } => {
                assert_eq!(location_id, 1);
                assert_eq!(line.prep_status, PrepStatus::Preparing);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn flags_set_clear_and_sort_board() {
        let (service, repo) = create_test_service();
        repo.insert_ticket(ticket(2));
        repo.insert_line(line(1, 1, 1, PrepStatus::Pending));
        repo.insert_line(line(2, 2, 1, PrepStatus::Pending));

        let flags = service
            .set_flag(
                TENANT,
                2,
                TicketOrderFlagInput {
                    flag: OrderFlagKind::Rush,
                    note: Some("VIP".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(flags.len(), 1);

        let board = service.board(TENANT, 1, None).await.unwrap();
        assert_eq!(board.tickets[0].ticket_id, 2);

        let flags = service.clear_flag(TENANT, 2, OrderFlagKind::Rush).await.unwrap();
        assert!(flags.is_empty());
        let board = service.board(TENANT, 1, None).await.unwrap();
        assert_eq!(board.tickets[0].ticket_id, 1);

        let err: AppError = service
            .clear_flag(TENANT, 2, OrderFlagKind::Rush)
            .await
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn board_uses_product_override() {
        let (service, repo) = create_test_service();
        let mut l = line(1, 1, 1, PrepStatus::Preparing);
        l.prep_started_at = Some(now_millis() - 10 * 60_000);
        repo.insert_line(l);

        let board = service.board(TENANT, 1, None).await.unwrap();
        assert!(board.tickets[0].courses[0].lines[0].overdue);

        repo.set_threshold(TENANT, 101, 20);
        let board = service.board(TENANT, 1, None).await.unwrap();
        assert!(!board.tickets[0].courses[0].lines[0].overdue);
    }
}
