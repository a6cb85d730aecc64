//! Demo data for development environments

use chrono::{Days, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{DailyFinance, Destination, IngredientSku, PrepStatus, Ticket, TicketLine};
use shared::util::{SnowflakeBatch, minutes_to_millis};
use sqlx::PgPool;

use crate::db::{finance, ingredients, locations, tickets};
use crate::error::ServiceResult;

const MAX_FINANCE_DAYS: u32 = 90;
const TICKET_COUNT: usize = 8;

/// (name, destination, course)
const MENU: [(&str, Destination, i32); 10] = [
    ("Croquetas de jamón", Destination::Kitchen, 1),
    ("Ensalada mixta", Destination::Prep, 1),
    ("Pan con tomate", Destination::Prep, 1),
    ("Pulpo a la gallega", Destination::Kitchen, 1),
    ("Solomillo al whisky", Destination::Kitchen, 2),
    ("Merluza en salsa verde", Destination::Kitchen, 2),
    ("Tarta de queso", Destination::Prep, 3),
    ("Caña", Destination::Bar, 1),
    ("Tinto de verano", Destination::Bar, 1),
    ("Café solo", Destination::Bar, 3),
];

/// (name, supplier, unit, pack size, pack price, daily usage)
const PANTRY: [(&str, &str, &str, f64, f64, f64); 6] = [
    ("Aceite de oliva", "Distribuciones Sur", "l", 5.0, 32.5, 1.8),
    ("Harina", "Distribuciones Sur", "kg", 25.0, 18.0, 3.5),
    ("Patata", "Huerta Levante", "kg", 10.0, 7.9, 12.0),
    ("Tomate", "Huerta Levante", "kg", 5.0, 9.5, 6.0),
    ("Merluza", "Pescados Cantábrico", "kg", 3.0, 41.0, 2.2),
    ("Pulpo", "Pescados Cantábrico", "kg", 2.0, 38.0, 1.1),
];

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRequest {
    pub location_id: i64,
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_days() -> u32 {
    30
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeedSummary {
    pub tickets: usize,
    pub lines: usize,
    pub skus: usize,
    pub finance_days: usize,
}

#[derive(Debug, Default)]
pub struct SeedData {
    pub tickets: Vec<Ticket>,
    pub lines: Vec<TicketLine>,
    pub skus: Vec<IngredientSku>,
    pub finance: Vec<DailyFinance>,
}

impl SeedData {
    pub fn summary(&self) -> SeedSummary {
        SeedSummary {
            tickets: self.tickets.len(),
            lines: self.lines.len(),
            skus: self.skus.len(),
            finance_days: self.finance.len(),
        }
    }
}

/// Build random but plausible rows for one location
///
/// Finance days end at `today` (inclusive). Open tickets are spread over the
/// last hour before `now`, with line statuses consistent with their stamps.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    tenant_id: &str,
    location_id: i64,
    today: NaiveDate,
    days: u32,
    now: i64,
) -> SeedData {
    let mut data = SeedData::default();
    let mut ids = SnowflakeBatch::new();

    for n in 0..TICKET_COUNT {
        let opened_at = now - minutes_to_millis(rng.gen_range(2..60));
        let ticket = Ticket {
            id: ids.next_id(),
            tenant_id: tenant_id.to_string(),
            location_id,
            table_name: Some(format!("Mesa {}", n + 1)),
            opened_at,
            closed_at: None,
        };

        let count = rng.gen_range(2..=5);
        for (name, destination, course) in MENU.choose_multiple(rng, count) {
            let id = ids.next_id();
            data.lines
                .push(random_line(rng, id, &ticket, name, *destination, *course, now));
        }
        data.tickets.push(ticket);
    }

    for (name, supplier, unit, pack, price, usage) in PANTRY.iter() {
        data.skus.push(IngredientSku {
            id: ids.next_id(),
            tenant_id: tenant_id.to_string(),
            location_id,
            name: name.to_string(),
            supplier: supplier.to_string(),
            unit: unit.to_string(),
            pack_size_units: *pack,
            pack_price: *price,
            forecast_daily_usage: (0..14)
                .map(|_| round2(usage * rng.gen_range(0.7..1.3)))
                .collect(),
            on_hand: round2(usage * rng.gen_range(0.0..4.0)),
            on_order: if rng.gen_bool(0.3) { *pack } else { 0.0 },
            waste_factor: round2(rng.gen_range(0.0..0.15)),
            yield_factor: round2(rng.gen_range(0.8..1.0)),
            updated_at: now,
        });
    }

    let days = days.min(MAX_FINANCE_DAYS);
    for back in (0..days).rev() {
        let Some(business_date) = today.checked_sub_days(Days::new(u64::from(back))) else {
            continue;
        };
        let budget = round2(rng.gen_range(2_500.0..4_000.0));
        let sales = round2(budget * rng.gen_range(0.8..1.2));
        data.finance.push(DailyFinance {
            tenant_id: tenant_id.to_string(),
            location_id,
            business_date,
            sales,
            budget,
            labour_cost: round2(sales * rng.gen_range(0.25..0.38)),
            waste_total: round2(sales * rng.gen_range(0.01..0.06)),
        });
    }

    data
}

fn random_line<R: Rng + ?Sized>(
    rng: &mut R,
    id: i64,
    ticket: &Ticket,
    name: &str,
    destination: Destination,
    course: i32,
    now: i64,
) -> TicketLine {
    let status = *[
        PrepStatus::Pending,
        PrepStatus::Pending,
        PrepStatus::Preparing,
        PrepStatus::Preparing,
        PrepStatus::Ready,
    ]
    .choose(rng)
    .unwrap_or(&PrepStatus::Pending);

    let created_at = ticket.opened_at;
    let started = (status.rank() >= PrepStatus::Preparing.rank())
        .then(|| rng.gen_range(created_at..=now));
    let ready = match (status, started) {
        (PrepStatus::Ready, Some(start)) => Some(rng.gen_range(start..=now)),
        _ => None,
    };

    TicketLine {
        id,
        tenant_id: ticket.tenant_id.clone(),
        ticket_id: ticket.id,
        product_id: product_id(name),
        product_name: name.to_string(),
        quantity: rng.gen_range(1..=4),
        course,
        destination,
        prep_status: status,
        note: None,
        created_at,
        prep_started_at: started,
        ready_at: ready,
        served_at: None,
        updated_at: ready.or(started).unwrap_or(created_at),
    }
}

/// Stable demo product id per menu item
fn product_id(name: &str) -> i64 {
    MENU.iter()
        .position(|(n, _, _)| *n == name)
        .map_or(0, |i| 1000 + i as i64)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Insert demo data for a location of the tenant
pub async fn seed_location(
    pool: &PgPool,
    is_development: bool,
    tenant_id: &str,
    request: &SeedRequest,
) -> ServiceResult<SeedSummary> {
    if !is_development {
        return Err(AppError::new(ErrorCode::DevelopmentOnly).into());
    }
    if locations::find_location(pool, tenant_id, request.location_id)
        .await?
        .is_none()
    {
        return Err(AppError::location_not_found(request.location_id).into());
    }

    let now = shared::util::now_millis();
    let today = chrono::Utc::now().date_naive();
    let data = generate(
        &mut rand::thread_rng(),
        tenant_id,
        request.location_id,
        today,
        request.days,
        now,
    );

    // All or nothing; line inserts reach screens through the change feed on commit
    let mut tx = pool.begin().await?;
    for ticket in &data.tickets {
        tickets::insert_ticket(&mut *tx, ticket).await?;
    }
    for line in &data.lines {
        tickets::insert_line(&mut *tx, line).await?;
    }
    for sku in &data.skus {
        ingredients::insert(&mut *tx, sku).await?;
    }
    for day in &data.finance {
        finance::upsert(&mut *tx, day).await?;
    }
    tx.commit().await?;

    let summary = data.summary();
    tracing::info!(
        tenant_id = %tenant_id,
        location_id = request.location_id,
        tickets = summary.tickets,
        lines = summary.lines,
        skus = summary.skus,
        finance_days = summary.finance_days,
        "Demo data seeded"
    );
    Ok(summary)
}
