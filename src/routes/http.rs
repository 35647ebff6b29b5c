//! HTTP endpoint handlers. These are thin wrappers that forward to the catalog and hint logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::IntoResponse,
    Json,
};
use rand::seq::SliceRandom;
use tracing::{info, instrument, warn};

use crate::domain::{Lesson, LessonKind, Tip};
use crate::error::{ApiError, ApiResult};
use crate::logic::get_hint_text;
use crate::protocol::*;
use crate::state::AppState;
use crate::util::{is_iso_date, split_csv, today_iso};

/// Largest accepted code payload for a hint request.
pub const MAX_HINT_CODE_BYTES: usize = 20_000;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
    Json(HealthOut { ok: true })
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_groups(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = &state.catalog;
    let out: Vec<GroupOut> = catalog
        .groups()
        .iter()
        .map(|g| to_group_out(g, catalog.group_stats(&g.id)))
        .collect();
    Json(out)
}

#[instrument(level = "info", skip(state), fields(groups = ?q.groups, shown = ?q.shown, date = ?q.date))]
pub async fn http_daily_tip(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DailyTipQuery>,
) -> ApiResult<Json<DailyTipOut>> {
    let date = resolve_date(q.date)?;
    let groups = split_csv(q.groups.as_deref());
    let shown = split_csv(q.shown.as_deref());
    let tip = state.catalog.select_tip(groups.as_slice(), shown.as_slice(), Some(&date)).cloned();
    info!(target: "tips", %date, tip = ?tip.as_ref().map(|t| t.id.as_str()), "HTTP daily tip served");
    Ok(Json(DailyTipOut { date, tip }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_tip(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Tip>> {
    let tip = state
        .catalog
        .tip(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown tip: {id}")))?;
    Ok(Json(tip.clone()))
}

#[instrument(level = "info", skip(state))]
pub async fn http_list_lessons(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LessonQuery>,
) -> ApiResult<Json<Vec<LessonSummary>>> {
    let catalog = &state.catalog;
    let kind = match q.kind.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(k) => Some(LessonKind::parse(k).ok_or_else(|| ApiError::BadRequest(format!("Unknown lesson kind: {k}")))?),
        None => None,
    };
    let group = q.group.as_deref().map(str::trim).filter(|g| !g.is_empty());
    if let Some(g) = group {
        if catalog.group(g).is_none() {
            return Err(ApiError::NotFound(format!("Unknown group: {g}")));
        }
    }

    let base: Vec<&Lesson> = match (q.q.as_deref().map(str::trim).filter(|s| !s.is_empty()), group, kind) {
        (Some(text), _, _) => catalog.search_lessons(text),
        (None, Some(g), _) => catalog.lessons_in_group(g),
        (None, None, Some(k)) => catalog.lessons_by_kind(k),
        (None, None, None) => catalog.lessons_in_course_order(),
    };

    let out: Vec<LessonSummary> = base
        .into_iter()
        .filter(|l| group.map_or(true, |g| l.group_id == g))
        .filter(|l| kind.map_or(true, |k| l.kind == k))
        .map(LessonSummary::from)
        .collect();
    info!(target: "content", count = out.len(), "HTTP lessons listed");
    Ok(Json(out))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_lesson(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<LessonOut>> {
    let catalog = &state.catalog;
    let lesson = catalog
        .lesson(&id)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown lesson: {id}")))?;
    let (prev, next) = catalog.neighbors(&id).unwrap_or((None, None));
    Ok(Json(to_lesson_out(lesson, prev, next)))
}

#[instrument(level = "info", skip(state), fields(groups = ?q.groups, completed = ?q.completed, date = ?q.date))]
pub async fn http_daily_challenge(
    State(state): State<Arc<AppState>>,
    Query(q): Query<DailyChallengeQuery>,
) -> ApiResult<Json<DailyChallengeOut>> {
    let date = resolve_date(q.date)?;
    let groups = split_csv(q.groups.as_deref());
    let completed = split_csv(q.completed.as_deref());
    let catalog = &state.catalog;
    let challenge = catalog.daily_challenge(groups.as_slice(), completed.as_slice(), Some(&date)).map(|l| {
        let (prev, next) = catalog.neighbors(&l.id).unwrap_or((None, None));
        to_lesson_out(l, prev, next)
    });
    info!(target: "tips", %date, challenge = ?challenge.as_ref().map(|c| c.id.as_str()), "HTTP daily challenge served");
    Ok(Json(DailyChallengeOut { date, challenge }))
}

/// Practice mode: any challenge, optionally within one group. Not date-seeded.
#[instrument(level = "info", skip(state), fields(group = ?q.group))]
pub async fn http_random_challenge(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LessonQuery>,
) -> ApiResult<Json<LessonOut>> {
    let catalog = &state.catalog;
    let group = q.group.as_deref().map(str::trim).filter(|g| !g.is_empty());
    let pool: Vec<&Lesson> = catalog
        .challenges()
        .into_iter()
        .filter(|l| group.map_or(true, |g| l.group_id == g))
        .collect();
    let lesson = pool
        .choose(&mut rand::thread_rng())
        .copied()
        .ok_or_else(|| ApiError::NotFound("No challenges available".into()))?;
    let (prev, next) = catalog.neighbors(&lesson.id).unwrap_or((None, None));
    Ok(Json(to_lesson_out(lesson, prev, next)))
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_hint(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HintRequest>, JsonRejection>,
) -> ApiResult<Json<HintOut>> {
    let Json(body) = payload.map_err(|e| {
        warn!(target: "hints", status = %e.status(), "Rejected hint request body");
        ApiError::from(e)
    })?;
    info!(target: "hints", language = %body.language, code_len = body.code.len(), "HTTP hint requested");
    if body.code.trim().is_empty() {
        return Err(ApiError::Unprocessable("code must not be empty".into()));
    }
    if body.code.len() > MAX_HINT_CODE_BYTES {
        return Err(ApiError::PayloadTooLarge(format!("code exceeds {MAX_HINT_CODE_BYTES} bytes")));
    }
    let hint = get_hint_text(&state, &body).await;
    info!(target: "hints", hint_len = hint.len(), "HTTP hint served");
    Ok(Json(HintOut { hint }))
}

/// Missing or blank date means today (UTC); anything else must be `YYYY-MM-DD`.
fn resolve_date(raw: Option<String>) -> ApiResult<String> {
    match raw.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()) {
        None => Ok(today_iso()),
        Some(d) if is_iso_date(&d) => Ok(d),
        Some(d) => Err(ApiError::BadRequest(format!("Invalid date (expected YYYY-MM-DD): {d}"))),
    }
}
