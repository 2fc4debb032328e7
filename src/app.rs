use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/today", get(handlers::get_today))
        .route(
            "/api/days/:date",
            get(handlers::get_day)
                .post(handlers::open_day)
                .patch(handlers::update_field),
        )
        .route("/api/days/:date/log", get(handlers::day_log))
        .route("/api/days/:date/summary", post(handlers::summarize_day))
        .route("/api/stats/week/:date", get(handlers::week_stats))
        .route("/api/stats/month/:date", get(handlers::month_stats))
        .route("/api/heatmap/:date", get(handlers::heatmap))
        .route("/api/overview/:date", get(handlers::overview))
        .route("/api/exercise", get(handlers::exercise))
        .route("/api/schedule", get(handlers::schedule))
        .route("/api/reports/weekly/:date", post(handlers::weekly_report))
        .route("/api/reports/monthly/:date", post(handlers::monthly_report))
        .with_state(state)
}
