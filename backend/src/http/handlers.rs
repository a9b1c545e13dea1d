//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the store
//! services or the ranking engine.

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{
    DataVersion, DeletedResponse, HealthResponse, Leaderboard, LeaderboardQuery, ListResponse,
    OperationResponse, PercentileQuery, PercentileResult, RefreshRequest, RepairQuery,
    SourceQuery, StoreStatus, SummarySource,
};
use super::error::AppError;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{MatchRecord, NewPlayer, NewRecord, PlayerId, PlayerSummary, RecordId, Role};
use crate::services::{aggregation, audit, ranking, statistics};
use crate::services::{AuditReport, GuildOverview, PlayerProfile};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<OperationResponse<T>>, AppError>;

/// Result type for handlers that create something.
pub type CreatedResult<T> = Result<(StatusCode, Json<OperationResponse<T>>), AppError>;

fn ok<T>(data: T) -> HandlerResult<T> {
    Ok(Json(OperationResponse::ok(data)))
}

fn created<T>(data: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(OperationResponse::ok(data))))
}

/// Summaries for a read, either derived from records or as stored.
async fn load_summaries(
    state: &AppState,
    source: SummarySource,
) -> Result<Vec<PlayerSummary>, AppError> {
    let repo = state.repository.as_ref();
    let summaries = match source {
        SummarySource::Derived => {
            aggregation::derived_summaries(repo, &state.defaults.guild_tag).await?
        }
        SummarySource::Stored => db_services::list_players(repo).await?,
    };
    Ok(summaries)
}

fn required_param(value: Option<String>, name: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Query parameter '{}' is required", name)))
}

// =============================================================================
// Health & Status
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    ok(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    })
}

/// GET /v1/version
///
/// Current data version, for clients polling for changes.
pub async fn get_version(State(state): State<AppState>) -> HandlerResult<DataVersion> {
    let data_version = db_services::data_version(state.repository.as_ref()).await?;
    ok(DataVersion { data_version })
}

/// GET /v1/status
pub async fn get_status(State(state): State<AppState>) -> HandlerResult<StoreStatus> {
    ok(db_services::store_status(state.repository.as_ref()).await?)
}

// =============================================================================
// Player Summaries
// =============================================================================

/// GET /v1/players
///
/// Stored summaries as they are.
pub async fn list_players(
    State(state): State<AppState>,
) -> HandlerResult<ListResponse<PlayerSummary>> {
    let repo = state.repository.as_ref();
    let players = db_services::list_players(repo).await?;
    let version = db_services::data_version(repo).await?;
    ok(ListResponse::new(players, version))
}

/// POST /v1/players
pub async fn create_player(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewPlayer>,
) -> CreatedResult<PlayerSummary> {
    let stored =
        db_services::register_player(state.repository.as_ref(), payload, &state.defaults).await?;
    created(stored)
}

/// GET /v1/players/{id}
pub async fn get_player(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> HandlerResult<PlayerSummary> {
    ok(db_services::get_player(state.repository.as_ref(), PlayerId::new(id)).await?)
}

/// DELETE /v1/players/{id}
pub async fn delete_player(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> HandlerResult<DeletedResponse> {
    db_services::delete_player(state.repository.as_ref(), PlayerId::new(id)).await?;
    ok(DeletedResponse { id })
}

// =============================================================================
// Match Records
// =============================================================================

/// GET /v1/records
pub async fn list_records(
    State(state): State<AppState>,
) -> HandlerResult<ListResponse<MatchRecord>> {
    let repo = state.repository.as_ref();
    let records = db_services::list_records(repo).await?;
    let version = db_services::data_version(repo).await?;
    ok(ListResponse::new(records, version))
}

/// POST /v1/records
pub async fn create_record(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewRecord>,
) -> CreatedResult<MatchRecord> {
    let stored =
        db_services::submit_record(state.repository.as_ref(), payload, &state.defaults).await?;
    created(stored)
}

/// GET /v1/records/{id}
pub async fn get_record(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> HandlerResult<MatchRecord> {
    ok(db_services::get_record(state.repository.as_ref(), RecordId::new(id)).await?)
}

/// DELETE /v1/records/{id}
///
/// Summaries are not recomputed.
pub async fn delete_record(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> HandlerResult<DeletedResponse> {
    db_services::delete_record(state.repository.as_ref(), RecordId::new(id)).await?;
    ok(DeletedResponse { id })
}

// =============================================================================
// Summaries & Ranking
// =============================================================================

/// GET /v1/summaries
///
/// Summaries derived from the current records.
pub async fn list_summaries(
    State(state): State<AppState>,
) -> HandlerResult<ListResponse<PlayerSummary>> {
    let summaries = load_summaries(&state, SummarySource::Derived).await?;
    let version = db_services::data_version(state.repository.as_ref()).await?;
    ok(ListResponse::new(summaries, version))
}

/// POST /v1/summaries/refresh
///
/// Recompute and store the summary for one `(playerName, className)` pair.
pub async fn refresh_summary(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> HandlerResult<PlayerSummary> {
    if request.player_name.trim().is_empty() || request.class_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "playerName and className are required".to_string(),
        ));
    }
    let refreshed = aggregation::refresh_summary(
        state.repository.as_ref(),
        &request.player_name,
        &request.class_name,
        &state.defaults,
    )
    .await?;
    ok(refreshed)
}

/// GET /v1/leaderboard?role=&source=&q=
pub async fn get_leaderboard(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LeaderboardQuery>,
) -> HandlerResult<Leaderboard> {
    let role = match query.role.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw
            .parse::<Role>()
            .map_err(AppError::BadRequest)?,
        _ => Role::Damage,
    };
    let source = query.source.unwrap_or_default();
    let summaries = load_summaries(&state, source).await?;
    let mut entries = ranking::rank(&summaries, role);
    if let Some(q) = query.q.as_deref() {
        entries = ranking::filter_entries(entries, q);
    }
    let data_version = db_services::data_version(state.repository.as_ref()).await?;

    ok(Leaderboard {
        role,
        metric_label: role.metric_label().to_string(),
        source,
        entries,
        data_version,
    })
}

/// GET /v1/percentile?class_name=&player_name=&source=
pub async fn get_percentile(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PercentileQuery>,
) -> HandlerResult<PercentileResult> {
    let class_name = required_param(query.class_name, "class_name")?;
    let player_name = required_param(query.player_name, "player_name")?;
    let summaries = load_summaries(&state, query.source.unwrap_or_default()).await?;
    let standing = ranking::percentile(&summaries, &class_name, &player_name);
    let data_version = db_services::data_version(state.repository.as_ref()).await?;

    ok(PercentileResult {
        class_name,
        player_name,
        standing,
        data_version,
    })
}

// =============================================================================
// Statistics
// =============================================================================

/// GET /v1/statistics/classes
///
/// Player count, average metric, role counts and class distribution.
pub async fn get_class_statistics(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SourceQuery>,
) -> HandlerResult<GuildOverview> {
    let summaries = load_summaries(&state, query.source.unwrap_or_default()).await?;
    ok(statistics::guild_overview(&summaries))
}

/// GET /v1/statistics/players/{name}
pub async fn get_player_profile(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
    ApiQuery(query): ApiQuery<SourceQuery>,
) -> HandlerResult<PlayerProfile> {
    let records = db_services::list_records(state.repository.as_ref()).await?;
    let summaries = load_summaries(&state, query.source.unwrap_or_default()).await?;
    ok(statistics::player_profile(&records, &summaries, &name))
}

// =============================================================================
// Administration
// =============================================================================

/// GET /v1/admin/repair
///
/// Read-only diagnosis.
pub async fn diagnose(State(state): State<AppState>) -> HandlerResult<AuditReport> {
    let report = audit::diagnose(state.repository.as_ref(), state.sample_limit).await?;
    ok(AuditReport::Diagnose(report))
}

/// POST /v1/admin/repair?mode=
pub async fn run_repair(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RepairQuery>,
) -> HandlerResult<AuditReport> {
    let mode = required_param(query.mode, "mode")?;
    let report = audit::run_audit(state.repository.as_ref(), &mode, state.sample_limit).await?;
    ok(report)
}

/// POST /v1/admin/clear
pub async fn clear_data(State(state): State<AppState>) -> HandlerResult<DataVersion> {
    let repo = state.repository.as_ref();
    db_services::clear_all(repo).await?;
    ok(DataVersion {
        data_version: db_services::data_version(repo).await?,
    })
}
