//! Application state for the back-office service

use std::sync::Arc;

use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::RateLimiter;
use crate::config::{Config, SepaDebtor};
use crate::error::BoxError;
use crate::kds::{KdsRepository, KdsService, PgKdsRepository};
use crate::live::LiveKdsHub;
use crate::team::mailer::{LogMailer, Mailer, SesMailer};
use crate::time_off::{PgTimeOffRepository, TimeOffService};

const MAX_DB_CONNECTIONS: u32 = 20;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// ENVIRONMENT value (development / staging / production)
    pub environment: String,
    /// JWT secret for tenant authentication
    pub jwt_secret: String,
    /// Base URL of the invitation acceptance page
    pub invite_base_url: String,
    /// Payroll paying account, if configured
    pub sepa_debtor: Option<Arc<SepaDebtor>>,
    /// KDS transitions, board and flags
    pub kds: KdsService,
    /// Realtime KDS fan-out
    pub hub: LiveKdsHub,
    pub time_off: TimeOffService,
    /// Invitation email sender
    pub mailer: Arc<dyn Mailer>,
    /// Rate limiter for public routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Connect, migrate and wire services
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_DB_CONNECTIONS)
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let mailer: Arc<dyn Mailer> = match &config.ses_from_email {
            Some(from) => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
                    let ses_config = aws_config
                        .to_builder()
                        .region(aws_config::Region::new(ses_region))
                        .build();
                    SesClient::new(&ses_config)
                } else {
                    SesClient::new(&aws_config)
                };
                Arc::new(SesMailer::new(ses, from.clone()))
            }
            None => {
                tracing::warn!("SES_FROM_EMAIL not set, invitation emails are only logged");
                Arc::new(LogMailer)
            }
        };

        let kds_repo: Arc<dyn KdsRepository> = Arc::new(PgKdsRepository::new(pool.clone()));
        Ok(Self::assemble(pool, config, kds_repo, mailer))
    }

    /// Wire state around an existing pool and injected seams
    pub fn assemble(
        pool: PgPool,
        config: &Config,
        kds_repo: Arc<dyn KdsRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let hub = LiveKdsHub::new();
        let kds = KdsService::new(kds_repo, hub.clone(), config.kds_thresholds);
        let time_off = TimeOffService::new(Arc::new(PgTimeOffRepository::new(pool.clone())));

        Self {
            pool,
            environment: config.environment.clone(),
            jwt_secret: config.jwt_secret.clone(),
            invite_base_url: config.invite_base_url.clone(),
            sepa_debtor: config.sepa_debtor.clone().map(Arc::new),
            kds,
            hub,
            time_off,
            mailer,
            rate_limiter: RateLimiter::new(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
