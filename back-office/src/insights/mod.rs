//! Reviews / insights narrative

pub mod narrative;

use shared::error::AppError;
use shared::models::{FinanceTotals, InsightNarrative, InsightQuery};
use sqlx::PgPool;

use crate::db::finance;
use crate::error::ServiceResult;

/// Maximum range a single narrative may cover
const MAX_RANGE_DAYS: i64 = 366;

/// Aggregate `pos_daily_finance` over the range and narrate it
pub async fn build_narrative(
    pool: &PgPool,
    tenant_id: &str,
    query: &InsightQuery,
) -> ServiceResult<InsightNarrative> {
    if query.to < query.from {
        return Err(AppError::validation("`to` must not be before `from`").into());
    }
    if (query.to - query.from).num_days() >= MAX_RANGE_DAYS {
        return Err(AppError::validation(format!(
            "Date range must be shorter than {MAX_RANGE_DAYS} days"
        ))
        .into());
    }

    let days = finance::list_range(pool, tenant_id, query.location_id, query.from, query.to).await?;
    let totals = FinanceTotals::from_days(&days);

    Ok(InsightNarrative {
        location_id: query.location_id,
        from: query.from,
        to: query.to,
        totals,
        sentences: narrative::generate(&totals),
    })
}
