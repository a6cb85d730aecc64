//! Team invitations

pub mod mailer;

use rand::Rng;
use rand::distributions::Alphanumeric;
use shared::error::{AppError, ErrorCode};
use shared::models::{InvitationStatus, TeamInvitation, TeamInvitationCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use self::mailer::{InvitationEmail, Mailer};
use crate::db::team;
use crate::error::ServiceResult;
use crate::validation::{MAX_SHORT_TEXT_LEN, validate_email, validate_required_text};

const TOKEN_LEN: usize = 40;
const INVITATION_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Roles an invitation may grant
pub const ROLES: [&str; 4] = ["owner", "manager", "chef", "staff"];

pub fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub fn validate(input: &TeamInvitationCreate) -> Result<(), AppError> {
    validate_email(input.email.trim(), "email")?;
    validate_required_text(&input.role, "role", MAX_SHORT_TEXT_LEN)?;
    if !ROLES.contains(&input.role.as_str()) {
        return Err(AppError::validation(format!("Unknown role: {}", input.role))
            .with_detail("allowed", ROLES.to_vec()));
    }
    Ok(())
}

/// Store a pending invitation and email the acceptance link
///
/// The row is removed again if the email cannot be sent, so the address can
/// be invited again.
pub async fn invite(
    pool: &PgPool,
    mailer: &dyn Mailer,
    invite_base_url: &str,
    tenant_id: &str,
    input: TeamInvitationCreate,
) -> ServiceResult<TeamInvitation> {
    validate(&input)?;

    let now = now_millis();
    team::expire_pending(pool, tenant_id, now).await?;

    let invitation = TeamInvitation {
        id: snowflake_id(),
        tenant_id: tenant_id.to_string(),
        location_id: input.location_id,
        email: input.email.trim().to_lowercase(),
        role: input.role,
        token: generate_token(),
        status: InvitationStatus::Pending,
        created_at: now,
        expires_at: now + INVITATION_TTL_MS,
    };

    if !team::insert_pending(pool, &invitation).await? {
        return Err(AppError::with_message(
            ErrorCode::InvitationExists,
            format!("{} already has a pending invitation", invitation.email),
        )
        .into());
    }

    let accept_url = format!(
        "{}?token={}",
        invite_base_url.trim_end_matches('/'),
        invitation.token
    );
    let email = InvitationEmail {
        to: &invitation.email,
        role: &invitation.role,
        accept_url: &accept_url,
    };
    if let Err(e) = mailer.send_invitation(&email).await {
        tracing::error!(tenant_id = %tenant_id, error = %e, "Failed to send team invitation");
        team::delete(pool, tenant_id, invitation.id).await?;
        return Err(AppError::new(ErrorCode::InvitationSendFailed).into());
    }

    tracing::info!(tenant_id = %tenant_id, invitation_id = invitation.id, role = %invitation.role, "Team invitation created");
    Ok(invitation)
}

pub async fn list_pending(pool: &PgPool, tenant_id: &str) -> ServiceResult<Vec<TeamInvitation>> {
    team::expire_pending(pool, tenant_id, now_millis()).await?;
    Ok(team::list_pending(pool, tenant_id).await?)
}
