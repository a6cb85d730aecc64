//! KDS persistence seam
//!
//! The service only talks to [`KdsRepository`]; Postgres and an in-memory
//! store both implement it. Every call is scoped by tenant.

use std::collections::HashMap;

use async_trait::async_trait;
use shared::models::{OrderFlagKind, Ticket, TicketLine, TicketOrderFlag};
use sqlx::PgPool;

use super::state_machine::LineUpdate;
use crate::db::tickets;

/// Repository failure
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<RepoError> for crate::error::ServiceError {
    fn from(e: RepoError) -> Self {
        crate::error::ServiceError::Db(Box::new(e))
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[async_trait]
pub trait KdsRepository: Send + Sync {
    async fn find_ticket(&self, tenant_id: &str, ticket_id: i64) -> RepoResult<Option<Ticket>>;

    async fn find_line(&self, tenant_id: &str, line_id: i64) -> RepoResult<Option<TicketLine>>;

    /// Apply `update` only if the line still has `update.expected` and its
    /// ticket is open. `None` when the guard did not match.
    async fn compare_and_set(
        &self,
        tenant_id: &str,
        line_id: i64,
        update: &LineUpdate,
    ) -> RepoResult<Option<TicketLine>>;

    /// Apply `update` atomically to every line of the ticket (optionally one
    /// course) currently in `update.expected`. Returns the updated lines.
    async fn transition_group(
        &self,
        tenant_id: &str,
        ticket_id: i64,
        course: Option<i32>,
        update: &LineUpdate,
    ) -> RepoResult<Vec<TicketLine>>;

    async fn list_open_tickets(&self, tenant_id: &str, location_id: i64) -> RepoResult<Vec<Ticket>>;

    async fn list_lines(&self, tenant_id: &str, ticket_ids: &[i64]) -> RepoResult<Vec<TicketLine>>;

    async fn list_flags(
        &self,
        tenant_id: &str,
        ticket_ids: &[i64],
    ) -> RepoResult<Vec<TicketOrderFlag>>;

    /// product_id → overdue minutes
    async fn product_thresholds(&self, tenant_id: &str) -> RepoResult<HashMap<i64, i64>>;

    async fn upsert_flag(&self, flag: &TicketOrderFlag) -> RepoResult<()>;

    async fn clear_flag(
        &self,
        tenant_id: &str,
        ticket_id: i64,
        flag: OrderFlagKind,
    ) -> RepoResult<bool>;
}

/// Postgres-backed repository
#[derive(Clone)]
pub struct PgKdsRepository {
    pool: PgPool,
}

impl PgKdsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KdsRepository for PgKdsRepository {
    async fn find_ticket(&self, tenant_id: &str, ticket_id: i64) -> RepoResult<Option<Ticket>> {
        Ok(tickets::find_ticket(&self.pool, tenant_id, ticket_id).await?)
    }

    async fn find_line(&self, tenant_id: &str, line_id: i64) -> RepoResult<Option<TicketLine>> {
        Ok(tickets::find_line(&self.pool, tenant_id, line_id).await?)
    }

    async fn compare_and_set(
        &self,
        tenant_id: &str,
        line_id: i64,
        update: &LineUpdate,
    ) -> RepoResult<Option<TicketLine>> {
        Ok(tickets::update_line_if_status(&self.pool, tenant_id, line_id, update).await?)
    }

    async fn transition_group(
        &self,
        tenant_id: &str,
        ticket_id: i64,
        course: Option<i32>,
        update: &LineUpdate,
    ) -> RepoResult<Vec<TicketLine>> {
        Ok(tickets::update_group_if_status(&self.pool, tenant_id, ticket_id, course, update).await?)
    }

    async fn list_open_tickets(&self, tenant_id: &str, location_id: i64) -> RepoResult<Vec<Ticket>> {
        Ok(tickets::list_open_tickets(&self.pool, tenant_id, location_id).await?)
    }

    async fn list_lines(&self, tenant_id: &str, ticket_ids: &[i64]) -> RepoResult<Vec<TicketLine>> {
        Ok(tickets::list_lines(&self.pool, tenant_id, ticket_ids).await?)
    }

    async fn list_flags(
        &self,
        tenant_id: &str,
        ticket_ids: &[i64],
    ) -> RepoResult<Vec<TicketOrderFlag>> {
        Ok(tickets::list_flags(&self.pool, tenant_id, ticket_ids).await?)
    }

    async fn product_thresholds(&self, tenant_id: &str) -> RepoResult<HashMap<i64, i64>> {
        Ok(tickets::product_thresholds(&self.pool, tenant_id).await?)
    }

    async fn upsert_flag(&self, flag: &TicketOrderFlag) -> RepoResult<()> {
        Ok(tickets::upsert_flag(&self.pool, flag).await?)
    }

    async fn clear_flag(
        &self,
        tenant_id: &str,
        ticket_id: i64,
        flag: OrderFlagKind,
    ) -> RepoResult<bool> {
        Ok(tickets::clear_flag(&self.pool, tenant_id, ticket_id, flag).await?)
    }
}
