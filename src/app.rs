use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/shifts", get(handlers::list_shifts).post(handlers::create_shift))
        .route("/api/shifts/upcoming", get(handlers::upcoming_shifts))
        .route(
            "/api/shifts/:id",
            get(handlers::get_shift)
                .put(handlers::update_shift)
                .delete(handlers::delete_shift),
        )
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/stats/weekdays", get(handlers::get_weekday_stats))
        .route("/api/stats/daily", get(handlers::get_daily_stats))
        .route("/api/prediction", get(handlers::get_prediction))
        .route("/api/goals", get(handlers::list_goals).post(handlers::create_goal))
        .route("/api/goals/:id", delete(handlers::delete_goal))
        .route("/api/export/csv", get(handlers::export_csv))
        .route("/api/import/csv", post(handlers::import_csv))
        .route("/api/backup", get(handlers::download_backup))
        .route("/api/restore", post(handlers::restore_backup))
        .with_state(state)
}
