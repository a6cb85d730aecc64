//! HTTP routes for the back-office service

pub mod health;
pub mod kds_ws;
pub mod public;
pub mod tenant;

use axum::routing::{delete, get, post};
use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::auth::rate_limit::reservation_rate_limit;
use crate::auth::tenant_auth::tenant_auth_middleware;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public reservation intake (rate limited, no auth)
    let public = Router::new()
        .route("/api/public/reservations", post(public::create_reservation))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            reservation_rate_limit,
        ));

    // Tenant API (JWT authenticated)
    let tenant = Router::new()
        .route("/api/tenant/locations", get(tenant::list_locations))
        // KDS
        .route("/api/tenant/kds/board", get(tenant::kds_board))
        .route(
            "/api/tenant/kds/lines/{line_id}/{action}",
            post(tenant::transition_line),
        )
        .route(
            "/api/tenant/kds/tickets/{ticket_id}/{action}",
            post(tenant::transition_ticket),
        )
        .route(
            "/api/tenant/kds/tickets/{ticket_id}/courses/{course}/{action}",
            post(tenant::transition_course),
        )
        .route("/api/tenant/kds/tickets/{ticket_id}/flags", post(tenant::set_flag))
        .route(
            "/api/tenant/kds/tickets/{ticket_id}/flags/{flag}",
            delete(tenant::clear_flag),
        )
        // Procurement
        .route(
            "/api/tenant/procurement/recommendations",
            get(tenant::recommendations),
        )
        .route(
            "/api/tenant/procurement/orders",
            get(tenant::list_purchase_orders).post(tenant::create_draft_orders),
        )
        .route(
            "/api/tenant/procurement/orders/{order_id}",
            get(tenant::purchase_order_detail),
        )
        // Insights
        .route("/api/tenant/insights/narrative", get(tenant::narrative))
        // Reservations
        .route("/api/tenant/reservations", get(tenant::list_reservations))
        // Payroll
        .route("/api/tenant/payroll/payslips", get(tenant::list_payslips))
        .route(
            "/api/tenant/payroll/payslips/{payslip_id}/{action}",
            post(tenant::payslip_action),
        )
        .route("/api/tenant/payroll/sepa", get(tenant::sepa_export))
        // Team
        .route(
            "/api/tenant/team/invitations",
            get(tenant::list_invitations).post(tenant::invite),
        )
        // Time off
        .route(
            "/api/tenant/time-off",
            get(tenant::list_time_off).post(tenant::create_time_off),
        )
        .route(
            "/api/tenant/time-off/{request_id}/{decision}",
            post(tenant::decide_time_off),
        )
        // Development
        .route("/api/tenant/dev/seed", post(tenant::seed_demo_data))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    tenant_auth_middleware,
                ))
                .layer(CompressionLayer::new()),
        );

    // KDS socket authenticates through the query string
    let realtime = Router::new().route("/api/tenant/kds/ws", get(kds_ws::handle_kds_ws));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(realtime)
        .merge(tenant)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
