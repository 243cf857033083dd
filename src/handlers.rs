use crate::aggregator::{
    self, daily_breakdown, shifts_between, weekday_breakdown, Dashboard, DailyTips, WeekdayBucket,
};
use crate::backup;
use crate::errors::AppError;
use crate::goals::{self, GoalProgress};
use crate::models::{
    GoalInput, ImportQuery, ImportResponse, Platform, RangeQuery, ShiftInput, ShiftListQuery,
    ShiftRecord, TodayQuery,
};
use crate::predictor::{predict_next_week, PredictionResult};
use crate::state::AppState;
use crate::transfer::{self, shift_hours};
use crate::ui::render_index;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use chrono::{Local, NaiveDate, Utc};
use tracing::info;

/// Longest `[start, end]` span, in days, served by the daily stats endpoint.
const MAX_DAILY_SPAN_DAYS: i64 = 366;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = local_today();
    let data = state.data.lock().await;
    let view = aggregator::dashboard(&data.shifts, today);
    let prediction = predict_next_week(&data.shifts, today);
    Html(render_index(&view, &prediction))
}

pub async fn list_shifts(
    State(state): State<AppState>,
    Query(query): Query<ShiftListQuery>,
) -> Json<Vec<ShiftRecord>> {
    let platform = query.platform.map(Platform::from);
    let data = state.data.lock().await;
    Json(shifts_between(&data.shifts, query.start, query.end, platform.as_ref()))
}

pub async fn get_shift(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ShiftRecord>, AppError> {
    let data = state.data.lock().await;
    data.shift(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| shift_not_found(id))
}

pub async fn create_shift(
    State(state): State<AppState>,
    Json(input): Json<ShiftInput>,
) -> Result<(StatusCode, Json<ShiftRecord>), AppError> {
    let record = record_from_input(input)?;
    let stored = state.update(|data| Ok(data.insert_shift(record))).await?;

    info!(id = stored.id, date = %stored.date, tips = stored.total_tips, "shift logged");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn update_shift(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<ShiftInput>,
) -> Result<Json<ShiftRecord>, AppError> {
    let record = record_from_input(input)?;
    let updated = state
        .update(|data| data.update_shift(id, record).ok_or_else(|| shift_not_found(id)))
        .await?;

    info!(id, "shift updated");
    Ok(Json(updated))
}

pub async fn delete_shift(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state
        .update(|data| data.delete_shift(id).ok_or_else(|| shift_not_found(id)))
        .await?;

    info!(id, "shift deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upcoming_shifts(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Json<Vec<ShiftRecord>> {
    let today = resolve_today(&query);
    let data = state.data.lock().await;
    Json(aggregator::upcoming_shifts(&data.shifts, today))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Json<Dashboard> {
    let today = resolve_today(&query);
    let data = state.data.lock().await;
    Json(aggregator::dashboard(&data.shifts, today))
}

pub async fn get_weekday_stats(State(state): State<AppState>) -> Json<Vec<WeekdayBucket>> {
    let data = state.data.lock().await;
    Json(weekday_breakdown(&data.shifts))
}

pub async fn get_daily_stats(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<DailyTips>>, AppError> {
    let span = (range.end - range.start).num_days();
    if span > MAX_DAILY_SPAN_DAYS {
        return Err(AppError::bad_request(format!(
            "daily range spans {span} days, at most {MAX_DAILY_SPAN_DAYS} allowed"
        )));
    }

    let data = state.data.lock().await;
    Ok(Json(daily_breakdown(&data.shifts, range.start, range.end)))
}

pub async fn get_prediction(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Json<PredictionResult> {
    let today = resolve_today(&query);
    let data = state.data.lock().await;
    Json(predict_next_week(&data.shifts, today))
}

pub async fn list_goals(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Json<Vec<GoalProgress>> {
    let today = resolve_today(&query);
    let data = state.data.lock().await;
    Json(
        data.goals
            .iter()
            .map(|goal| goals::progress(goal, &data.shifts, today))
            .collect(),
    )
}

pub async fn create_goal(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
    Json(input): Json<GoalInput>,
) -> Result<(StatusCode, Json<GoalProgress>), AppError> {
    let today = resolve_today(&query);
    let goal = goals::new_goal(&input, today)
        .ok_or_else(|| AppError::bad_request("targetAmount must be a positive number"))?;

    let progress = state
        .update(|data| {
            let stored = data.insert_goal(goal);
            Ok(goals::progress(&stored, &data.shifts, today))
        })
        .await?;

    let goal = &progress.goal;
    info!(id = goal.id, period = ?goal.period, target = goal.target_amount, "goal created");
    Ok((StatusCode::CREATED, Json(progress)))
}

pub async fn delete_goal(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    state
        .update(|data| {
            data.delete_goal(id)
                .ok_or_else(|| AppError::not_found(format!("goal {id} not found")))
        })
        .await?;

    info!(id, "goal deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let records = shifts_between(&data.shifts, None, None, None);
    let body = transfer::export_csv(&records)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"shifts.csv\""),
        ],
        body,
    ))
}

pub async fn import_csv(
    State(state): State<AppState>,
    Query(query): Query<ImportQuery>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let default_platform = query.platform.map(Platform::from).unwrap_or_default();
    let report = transfer::import_csv(&body, &default_platform)?;

    let imported = report.shifts.len();
    state
        .update(|data| {
            for shift in report.shifts {
                data.insert_shift(shift);
            }
            Ok(())
        })
        .await?;

    info!(imported, skipped = report.skipped.len(), "csv import stored");
    Ok(Json(ImportResponse {
        imported,
        skipped: report.skipped.len(),
    }))
}

pub async fn download_backup(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let data = state.data.lock().await;
    let file = backup::create_backup(&data.shifts, Utc::now().timestamp_millis());
    let body = backup::to_json(&file)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"rider-tips-backup.json\""),
        ],
        body,
    ))
}

pub async fn restore_backup(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ImportResponse>, AppError> {
    let file = backup::parse_backup(&body)?;

    let imported = state.update(|data| Ok(backup::restore(data, file))).await?;

    info!(imported, "backup restored");
    Ok(Json(ImportResponse {
        imported,
        skipped: 0,
    }))
}

fn record_from_input(input: ShiftInput) -> Result<ShiftRecord, AppError> {
    let record = ShiftRecord {
        id: 0,
        date: input.date,
        platform: input.platform,
        start_time: input.start_time,
        end_time: input.end_time,
        total_hours: input
            .total_hours
            .unwrap_or_else(|| shift_hours(input.start_time, input.end_time)),
        online_tips: input.online_tips,
        cash_tips: input.cash_tips,
        total_tips: input.online_tips + input.cash_tips,
        orders: input.orders,
        shift_type: input.shift_type,
        notes: input.notes.filter(|notes| !notes.trim().is_empty()),
    };
    record.validate_amounts().map_err(AppError::bad_request)?;
    Ok(record)
}

fn shift_not_found(id: u64) -> AppError {
    AppError::not_found(format!("shift {id} not found"))
}

fn resolve_today(query: &TodayQuery) -> NaiveDate {
    query.today.unwrap_or_else(local_today)
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
