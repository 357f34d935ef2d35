use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{accounts, activities, auth, history, quotations, system, tickets, users};
use crate::middleware;
use crate::state::AppState;

/// Every endpoint, mounted under `/api`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .fallback(middleware::not_found)
        .layer(axum::middleware::map_response(
            middleware::method_not_allowed_envelope,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id))
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .route(
            "/accounts",
            get(accounts::list_accounts).post(accounts::create_account),
        )
        .route("/accounts/check-duplicate", get(accounts::check_duplicate))
        .route("/accounts/bulk-remove", post(accounts::bulk_remove))
        .route("/accounts/transfer", post(accounts::request_transfer))
        .route("/accounts/transfer/approve", post(accounts::approve_transfer))
        .route(
            "/accounts/:id",
            get(accounts::get_account).put(accounts::update_account),
        )
        .route(
            "/activities",
            get(activities::list_activities).post(activities::create_activity),
        )
        .route(
            "/activities/:activity_reference_number",
            delete(activities::delete_activity),
        )
        .route(
            "/activities/:activity_reference_number/status",
            put(activities::update_activity_status),
        )
        .route(
            "/history",
            get(history::list_history).post(history::create_history),
        )
        .route(
            "/history/activity/:activity_reference_number",
            get(history::list_for_activity),
        )
        .route("/quotations/revisions", get(quotations::list_revisions))
        .route("/quotations/numbers", post(quotations::generate_number))
        .route("/quotations/numbers/reserve", post(quotations::reserve_number))
        .route("/quotations/:history_id", put(quotations::update_quotation))
        .route(
            "/tickets",
            get(tickets::list_tickets).post(tickets::endorse_ticket),
        )
        .route(
            "/tickets/:ticket_reference_number/status",
            put(tickets::update_ticket_status),
        )
        .route("/users", post(users::create_user))
        .route("/users/me", get(users::get_me))
        .route("/users/team", get(users::list_team))
        .route("/users/:referenceid", put(users::update_profile))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/password-reset", post(auth::request_password_reset))
        .route(
            "/auth/password-reset/confirm",
            post(auth::confirm_password_reset),
        )
        .route("/task-logs", get(system::task_logs))
        .route("/security-alerts", get(system::security_alerts))
        .route("/dashboard/summary", get(system::dashboard_summary))
}
