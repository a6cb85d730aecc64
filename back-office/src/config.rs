//! Back-office service configuration

use shared::models::Destination;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Default overdue thresholds per KDS station (minutes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdsThresholds {
    pub kitchen_minutes: i64,
    pub bar_minutes: i64,
    pub prep_minutes: i64,
}

impl Default for KdsThresholds {
    fn default() -> Self {
        Self {
            kitchen_minutes: 8,
            bar_minutes: 3,
            prep_minutes: 5,
        }
    }
}

impl KdsThresholds {
    pub fn minutes_for(&self, destination: Destination) -> i64 {
        match destination {
            Destination::Kitchen => self.kitchen_minutes,
            Destination::Bar => self.bar_minutes,
            Destination::Prep => self.prep_minutes,
        }
    }
}

/// Debtor account used for SEPA payroll files
#[derive(Debug, Clone)]
pub struct SepaDebtor {
    pub name: String,
    pub iban: String,
    pub bic: Option<String>,
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for tenant authentication
    pub jwt_secret: String,
    /// SES sender address; invitations are only logged when unset
    pub ses_from_email: Option<String>,
    /// Base URL of the invitation acceptance page (token is appended)
    pub invite_base_url: String,
    /// Directory for daily rolling log files
    pub log_dir: Option<String>,
    pub kds_thresholds: KdsThresholds,
    pub sepa_debtor: Option<SepaDebtor>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn minutes(name: &str, default: i64) -> i64 {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|m: &i64| *m > 0)
            .unwrap_or(default)
    }

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let defaults = KdsThresholds::default();

        let sepa_debtor = match (
            Self::optional("SEPA_DEBTOR_NAME"),
            Self::optional("SEPA_DEBTOR_IBAN"),
        ) {
            (Some(name), Some(iban)) => Some(SepaDebtor {
                name,
                iban,
                bic: Self::optional("SEPA_DEBTOR_BIC"),
            }),
            _ => None,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            ses_from_email: Self::optional("SES_FROM_EMAIL"),
            invite_base_url: std::env::var("INVITE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5173/invite".into()),
            log_dir: Self::optional("LOG_DIR"),
            kds_thresholds: KdsThresholds {
                kitchen_minutes: Self::minutes("KDS_KITCHEN_MINUTES", defaults.kitchen_minutes),
                bar_minutes: Self::minutes("KDS_BAR_MINUTES", defaults.bar_minutes),
                prep_minutes: Self::minutes("KDS_PREP_MINUTES", defaults.prep_minutes),
            },
            sepa_debtor,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let t = KdsThresholds::default();
        assert_eq!(t.minutes_for(Destination::Kitchen), 8);
        assert_eq!(t.minutes_for(Destination::Bar), 3);
        assert_eq!(t.minutes_for(Destination::Prep), 5);
    }
}
