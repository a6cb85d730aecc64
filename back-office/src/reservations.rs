//! Public reservation intake and tenant listing

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode};
use shared::models::{Reservation, ReservationCreate, ReservationStatus};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use crate::db::{locations, reservations};
use crate::error::ServiceResult;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_phone, validate_required_text,
};

pub const MIN_PARTY_SIZE: i32 = 1;
pub const MAX_PARTY_SIZE: i32 = 30;
/// How far ahead a booking may be made
pub const MAX_DAYS_AHEAD: i64 = 180;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Validate a public intake payload against `now` (Unix millis)
pub fn validate(input: &ReservationCreate, now: i64) -> Result<(), AppError> {
    validate_required_text(&input.guest_name, "guest_name", MAX_NAME_LEN)?;
    validate_optional_text(&input.note, "note", MAX_NOTE_LEN)?;

    let email = input.email.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let phone = input.phone.as_deref().map(str::trim).filter(|s| !s.is_empty());
    if email.is_none() && phone.is_none() {
        return Err(AppError::new(ErrorCode::ContactRequired));
    }
    if let Some(email) = email {
        validate_email(email, "email")?;
    }
    if let Some(phone) = phone {
        validate_required_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_phone(phone, "phone")?;
    }

    if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&input.party_size) {
        return Err(AppError::with_message(
            ErrorCode::PartySizeOutOfRange,
            format!("Party size must be between {MIN_PARTY_SIZE} and {MAX_PARTY_SIZE}"),
        )
        .with_detail("party_size", input.party_size));
    }

    if input.reserved_for <= now {
        return Err(AppError::with_message(
            ErrorCode::ReservationTimeInvalid,
            "Reservation time must be in the future",
        ));
    }
    if input.reserved_for > now + MAX_DAYS_AHEAD * DAY_MS {
        return Err(AppError::with_message(
            ErrorCode::ReservationTimeInvalid,
            format!("Reservations can be made at most {MAX_DAYS_AHEAD} days ahead"),
        ));
    }
    Ok(())
}

/// Validate and store a `pending` reservation for an existing location
pub async fn create_public(pool: &PgPool, input: ReservationCreate) -> ServiceResult<Reservation> {
    let now = now_millis();
    validate(&input, now)?;

    let location = locations::find_public_location(pool, input.location_id)
        .await?
        .filter(|l| l.accepts_reservations)
        .ok_or_else(|| AppError::location_not_found(input.location_id))?;

    let reservation = Reservation {
        id: snowflake_id(),
        tenant_id: location.tenant_id,
        location_id: location.id,
        guest_name: input.guest_name.trim().to_string(),
        email: input.email.map(|e| e.trim().to_lowercase()).filter(|e| !e.is_empty()),
        phone: input.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
        party_size: input.party_size,
        reserved_for: input.reserved_for,
        note: input.note,
        status: ReservationStatus::Pending,
        created_at: now,
    };
    reservations::insert(pool, &reservation).await?;

    tracing::info!(
        tenant_id = %reservation.tenant_id,
        location_id = reservation.location_id,
        reservation_id = reservation.id,
        party_size = reservation.party_size,
        "Reservation received"
    );
    Ok(reservation)
}

/// Reservations of one day (UTC)
pub async fn list_for_day(
    pool: &PgPool,
    tenant_id: &str,
    location_id: i64,
    date: NaiveDate,
) -> ServiceResult<Vec<Reservation>> {
    let start = date
        .and_hms_opt(0, 0, 0)
        .map(|d| d.and_utc().timestamp_millis())
        .ok_or_else(|| AppError::validation("Invalid date"))?;
    Ok(reservations::list_range(pool, tenant_id, location_id, start, start + DAY_MS).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_790_000_000_000;

    fn input() -> ReservationCreate {
        ReservationCreate {
            location_id: 1,
            guest_name: "Marta Ruiz".into(),
            email: Some("marta@example.com".into()),
            phone: None,
            party_size: 4,
            reserved_for: NOW + DAY_MS,
            note: None,
        }
    }

    fn code(input: &ReservationCreate) -> ErrorCode {
        validate(input, NOW).unwrap_err().code
    }

    #[test]
    fn valid_input() {
        assert!(validate(&input(), NOW).is_ok());
        let mut phone_only = input();
        phone_only.email = None;
        phone_only.phone = Some("+34 600 123 456".into());
        assert!(validate(&phone_only, NOW).is_ok());
    }

    #[test]
    fn contact_required() {
        let mut i = input();
        i.email = Some("  ".into());
        assert_eq!(code(&i), ErrorCode::ContactRequired);
    }

    #[test]
    fn party_size_bounds() {
        let mut i = input();
        i.party_size = 0;
        assert_eq!(code(&i), ErrorCode::PartySizeOutOfRange);
        i.party_size = 31;
        assert_eq!(code(&i), ErrorCode::PartySizeOutOfRange);
        i.party_size = 30;
        assert!(validate(&i, NOW).is_ok());
    }

    #[test]
    fn time_window() {
        let mut i = input();
        i.reserved_for = NOW;
        assert_eq!(code(&i), ErrorCode::ReservationTimeInvalid);
        i.reserved_for = NOW + 181 * DAY_MS;
        assert_eq!(code(&i), ErrorCode::ReservationTimeInvalid);
        i.reserved_for = NOW + 180 * DAY_MS;
        assert!(validate(&i, NOW).is_ok());
    }

    #[test]
    fn name_and_note() {
        let mut i = input();
        i.guest_name = "".into();
        assert_eq!(code(&i), ErrorCode::RequiredField);
        let mut i = input();
        i.note = Some("x".repeat(501));
        assert_eq!(code(&i), ErrorCode::ValidationFailed);
    }
}
