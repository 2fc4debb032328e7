use crate::errors::AppError;
use crate::fields::FieldUpdate;
use crate::models::{DailySummaryResponse, DayRecord, FieldPatch};
use crate::reports::{self, RangeReport};
use crate::schedule::{SCHEDULE, ScheduleTask};
use crate::state::AppState;
use crate::stats::{
    self, ExerciseLog, HeatmapCell, OverviewPoint, RangeStatsResponse, month_range, week_range,
};
use crate::summary::format_daily;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Datelike, NaiveDate};

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .filter(|date| (1..=9999).contains(&date.year()))
        .ok_or_else(|| AppError::bad_request(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

pub async fn get_today(State(state): State<AppState>) -> Json<DayRecord> {
    Json(state.store.get(stats::today()).await)
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayRecord>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(state.store.get(date).await))
}

pub async fn open_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayRecord>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(state.store.ensure(date).await?))
}

pub async fn update_field(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<FieldPatch>,
) -> Result<Json<DayRecord>, AppError> {
    let date = parse_date(&date)?;
    let update = FieldUpdate::from_json(payload.field.trim(), payload.value)?;
    Ok(Json(state.store.upsert(date, update).await?))
}

pub async fn day_log(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<String, AppError> {
    let date = parse_date(&date)?;
    Ok(format_daily(&state.store.get(date).await))
}

pub async fn summarize_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailySummaryResponse>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(reports::summarize_day(&state, date).await?))
}

pub async fn week_stats(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<RangeStatsResponse>, AppError> {
    let range = week_range(parse_date(&date)?);
    let days = state.store.range(&range).await;
    Ok(Json(RangeStatsResponse {
        stats: stats::range_stats(&days),
        range,
    }))
}

pub async fn month_stats(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<RangeStatsResponse>, AppError> {
    let range = month_range(parse_date(&date)?);
    let days = state.store.range(&range).await;
    Ok(Json(RangeStatsResponse {
        stats: stats::range_stats(&days),
        range,
    }))
}

pub async fn heatmap(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<HeatmapCell>>, AppError> {
    let date = parse_date(&date)?;
    let data = state.store.snapshot().await;
    Ok(Json(stats::heatmap(&data, date)))
}

pub async fn overview(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<OverviewPoint>>, AppError> {
    let date = parse_date(&date)?;
    let data = state.store.snapshot().await;
    Ok(Json(stats::monthly_overview(&data, date)))
}

pub async fn exercise(State(state): State<AppState>) -> Json<ExerciseLog> {
    Json(stats::exercise_log(&state.store.snapshot().await))
}

pub async fn schedule() -> Json<&'static [ScheduleTask]> {
    Json(SCHEDULE)
}

pub async fn weekly_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<RangeReport>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(reports::summarize_week(&state, date).await?))
}

pub async fn monthly_report(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<RangeReport>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(reports::summarize_month(&state, date).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn dates_outside_four_digit_years_are_rejected() {
        assert!(parse_date("2024-06-15").is_ok());
        assert!(parse_date("9999-12-31").is_ok());
        for raw in ["+262142-12-31", "0000-01-01", "-0001-06-01", "2024-13-01", "today"] {
            let err = parse_date(raw).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "{raw}");
        }
    }
}
