//! Ticket / ticket line / flag queries
//!
//! All queries enforce tenant_id isolation. Line writes are guarded by the
//! expected status and by the ticket still being open.

use std::collections::HashMap;

use shared::models::{OrderFlagKind, Ticket, TicketLine, TicketOrderFlag};
use sqlx::PgPool;

use crate::kds::state_machine::LineUpdate;

const LINE_COLUMNS: &str = "l.id, l.tenant_id, l.ticket_id, l.product_id, l.product_name, \
    l.quantity, l.course, l.destination, l.prep_status, l.note, l.created_at, \
    l.prep_started_at, l.ready_at, l.served_at, l.updated_at";

const TICKET_COLUMNS: &str = "id, tenant_id, location_id, table_name, opened_at, closed_at";

pub async fn find_ticket(
    pool: &PgPool,
    tenant_id: &str,
    ticket_id: i64,
) -> Result<Option<Ticket>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {TICKET_COLUMNS} FROM tickets WHERE tenant_id = $1 AND id = $2"
    ))
    .bind(tenant_id)
    .bind(ticket_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_line(
    pool: &PgPool,
    tenant_id: &str,
    line_id: i64,
) -> Result<Option<TicketLine>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {LINE_COLUMNS} FROM ticket_lines l WHERE l.tenant_id = $1 AND l.id = $2"
    ))
    .bind(tenant_id)
    .bind(line_id)
    .fetch_optional(pool)
    .await
}

/// Guarded single-line update; `None` if the status moved or the ticket closed
pub async fn update_line_if_status(
    pool: &PgPool,
    tenant_id: &str,
    line_id: i64,
    update: &LineUpdate,
) -> Result<Option<TicketLine>, sqlx::Error> {
    let (set_started, started) = update.prep_started_at.bind_parts();
    let (set_ready, ready) = update.ready_at.bind_parts();
    let (set_served, served) = update.served_at.bind_parts();

    sqlx::query_as(&format!(
        r#"
        UPDATE ticket_lines l SET
            prep_status = $4,
            prep_started_at = CASE WHEN $5 THEN $6 ELSE l.prep_started_at END,
            ready_at = CASE WHEN $7 THEN $8 ELSE l.ready_at END,
            served_at = CASE WHEN $9 THEN $10 ELSE l.served_at END,
            updated_at = $11
        FROM tickets t
        WHERE l.tenant_id = $1 AND l.id = $2 AND l.prep_status = $3
            AND t.tenant_id = l.tenant_id AND t.id = l.ticket_id AND t.closed_at IS NULL
        RETURNING {LINE_COLUMNS}
        "#
    ))
    .bind(tenant_id)
    .bind(line_id)
    .bind(update.expected)
    .bind(update.target)
    .bind(set_started)
    .bind(started)
    .bind(set_ready)
    .bind(ready)
    .bind(set_served)
    .bind(served)
    .bind(update.updated_at)
    .fetch_optional(pool)
    .await
}

/// Guarded bulk update over a ticket (optionally one course), one statement
pub async fn update_group_if_status(
    pool: &PgPool,
    tenant_id: &str,
    ticket_id: i64,
    course: Option<i32>,
    update: &LineUpdate,
) -> Result<Vec<TicketLine>, sqlx::Error> {
    let (set_started, started) = update.prep_started_at.bind_parts();
    let (set_ready, ready) = update.ready_at.bind_parts();
    let (set_served, served) = update.served_at.bind_parts();

    let mut lines: Vec<TicketLine> = sqlx::query_as(&format!(
        r#"
        UPDATE ticket_lines l SET
            prep_status = $5,
            prep_started_at = CASE WHEN $6 THEN $7 ELSE l.prep_started_at END,
            ready_at = CASE WHEN $8 THEN $9 ELSE l.ready_at END,
            served_at = CASE WHEN $10 THEN $11 ELSE l.served_at END,
            updated_at = $12
        FROM tickets t
        WHERE l.tenant_id = $1 AND l.ticket_id = $2
            AND ($3::INTEGER IS NULL OR l.course = $3)
            AND l.prep_status = $4
            AND t.tenant_id = l.tenant_id AND t.id = l.ticket_id AND t.closed_at IS NULL
        RETURNING {LINE_COLUMNS}
        "#
    ))
    .bind(tenant_id)
    .bind(ticket_id)
    .bind(course)
    .bind(update.expected)
    .bind(update.target)
    .bind(set_started)
    .bind(started)
    .bind(set_ready)
    .bind(ready)
    .bind(set_served)
    .bind(served)
    .bind(update.updated_at)
    .fetch_all(pool)
    .await?;
    lines.sort_by_key(|l| (l.course, l.created_at, l.id));
    Ok(lines)
}

pub async fn list_open_tickets(
    pool: &PgPool,
    tenant_id: &str,
    location_id: i64,
) -> Result<Vec<Ticket>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        SELECT {TICKET_COLUMNS} FROM tickets
        WHERE tenant_id = $1 AND location_id = $2 AND closed_at IS NULL
        ORDER BY opened_at
        "#
    ))
    .bind(tenant_id)
    .bind(location_id)
    .fetch_all(pool)
    .await
}

pub async fn list_lines(
    pool: &PgPool,
    tenant_id: &str,
    ticket_ids: &[i64],
) -> Result<Vec<TicketLine>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        SELECT {LINE_COLUMNS} FROM ticket_lines l
        WHERE l.tenant_id = $1 AND l.ticket_id = ANY($2)
        ORDER BY l.ticket_id, l.course, l.created_at, l.id
        "#
    ))
    .bind(tenant_id)
    .bind(ticket_ids)
    .fetch_all(pool)
    .await
}

pub async fn list_flags(
    pool: &PgPool,
    tenant_id: &str,
    ticket_ids: &[i64],
) -> Result<Vec<TicketOrderFlag>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT ticket_id, tenant_id, flag, note, created_at FROM ticket_order_flags
        WHERE tenant_id = $1 AND ticket_id = ANY($2)
        ORDER BY ticket_id, created_at
        "#,
    )
    .bind(tenant_id)
    .bind(ticket_ids)
    .fetch_all(pool)
    .await
}

pub async fn product_thresholds(
    pool: &PgPool,
    tenant_id: &str,
) -> Result<HashMap<i64, i64>, sqlx::Error> {
    let rows: Vec<(i64, i32)> = sqlx::query_as(
        "SELECT product_id, overdue_minutes FROM kds_product_thresholds WHERE tenant_id = $1",
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(product_id, minutes)| (product_id, i64::from(minutes)))
        .collect())
}

pub async fn upsert_flag(pool: &PgPool, flag: &TicketOrderFlag) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO ticket_order_flags (ticket_id, tenant_id, flag, note, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (tenant_id, ticket_id, flag) DO UPDATE SET note = EXCLUDED.note
        "#,
    )
    .bind(flag.ticket_id)
    .bind(&flag.tenant_id)
    .bind(flag.flag)
    .bind(&flag.note)
    .bind(flag.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn clear_flag(
    pool: &PgPool,
    tenant_id: &str,
    ticket_id: i64,
    flag: OrderFlagKind,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM ticket_order_flags WHERE tenant_id = $1 AND ticket_id = $2 AND flag = $3",
    )
    .bind(tenant_id)
    .bind(ticket_id)
    .bind(flag)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

// ========== Inserts (demo seeding) ==========

pub async fn insert_ticket(
    conn: impl sqlx::Executor<'_, Database = sqlx::Postgres>,
    ticket: &Ticket,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tickets (id, tenant_id, location_id, table_name, opened_at, closed_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(ticket.id)
    .bind(&ticket.tenant_id)
    .bind(ticket.location_id)
    .bind(&ticket.table_name)
    .bind(ticket.opened_at)
    .bind(ticket.closed_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn insert_line(
    conn: impl sqlx::Executor<'_, Database = sqlx::Postgres>,
    line: &TicketLine,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO ticket_lines (
            id, tenant_id, ticket_id, product_id, product_name, quantity, course,
            destination, prep_status, note, created_at, prep_started_at, ready_at,
            served_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        "#,
    )
    .bind(line.id)
    .bind(&line.tenant_id)
    .bind(line.ticket_id)
    .bind(line.product_id)
    .bind(&line.product_name)
    .bind(line.quantity)
    .bind(line.course)
    .bind(line.destination)
    .bind(line.prep_status)
    .bind(&line.note)
    .bind(line.created_at)
    .bind(line.prep_started_at)
    .bind(line.ready_at)
    .bind(line.served_at)
    .bind(line.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}
