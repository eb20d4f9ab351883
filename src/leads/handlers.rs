use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use time::{macros::format_description, OffsetDateTime};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    dto::MessageResponse,
    error::{ApiError, StoreError},
    leads::{
        dto::{CreateLeadRequest, CreatedLeadResponse, ListQuery, UpdateLeadRequest, MAX_PAGE_SIZE},
        export::render_csv,
        repo_types::{Lead, LeadFilter},
    },
    state::AppState,
};

pub fn lead_routes() -> Router<AppState> {
    Router::new()
        .route("/leads", get(list_leads).post(create_lead))
        .route(
            "/leads/:id",
            get(get_lead).patch(update_lead).delete(delete_lead),
        )
        .route("/export/leads.csv", get(export_leads))
}

/// A malformed id cannot match any record, so it is reported like a missing one.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| lead_not_found())
}

fn lead_not_found() -> ApiError {
    ApiError::NotFound("Lead not found".into())
}

fn filter_from(q: ListQuery) -> Result<LeadFilter, ApiError> {
    if let Some(limit) = q.limit {
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
    }
    let offset = q.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::BadRequest("offset must not be negative".into()));
    }
    Ok(LeadFilter {
        search: q.q.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
        limit: q.limit,
        offset,
    })
}

#[instrument(skip(state, query))]
pub async fn list_leads(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Lead>>, ApiError> {
    let Query(query) = query?;
    let filter = filter_from(query)?;
    let leads = state
        .leads
        .list_all(&filter)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch leads", &e))?;
    Ok(Json(leads))
}

#[instrument(skip(state, payload))]
pub async fn create_lead(
    State(state): State<AppState>,
    payload: Result<Json<CreateLeadRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let new_lead = body.validate().map_err(|fields| {
        let names: Vec<&str> = fields.keys().copied().collect();
        warn!(fields = ?names, "lead rejected");
        ApiError::Validation(fields)
    })?;

    let lead = state
        .leads
        .create(new_lead)
        .await
        .map_err(|e| ApiError::internal("Failed to create lead", &e))?;

    info!(lead_id = %lead.id, source = ?lead.utm_source, "lead created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/leads/{}", lead.id))],
        Json(CreatedLeadResponse {
            id: lead.id,
            created_at: lead.created_at,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Lead>, ApiError> {
    let id = parse_id(&id)?;
    match state.leads.get_by_id(id).await {
        Ok(lead) => Ok(Json(lead)),
        Err(StoreError::NotFound(_)) => Err(lead_not_found()),
        Err(e) => Err(ApiError::internal("Failed to fetch lead", &e)),
    }
}

#[instrument(skip(state, payload))]
pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLeadRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Json(body) = payload?;
    let patch = body.validate().map_err(ApiError::Validation)?;
    if patch.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".into()));
    }

    match state.leads.update(id, patch).await {
        Ok(lead) => {
            info!(lead_id = %lead.id, "lead updated");
            Ok(Json(MessageResponse::new("Lead updated")))
        }
        Err(StoreError::NotFound(_)) => Err(lead_not_found()),
        Err(e) => Err(ApiError::internal("Failed to update lead", &e)),
    }
}

#[instrument(skip(state))]
pub async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    match state.leads.delete(id).await {
        Ok(()) => {
            info!(lead_id = %id, "lead deleted");
            Ok(Json(MessageResponse::new("Lead deleted")))
        }
        Err(StoreError::NotFound(_)) => Err(lead_not_found()),
        Err(e) => Err(ApiError::internal("Failed to delete lead", &e)),
    }
}

/// GET /export/leads.csv?q=... — same search as the list, without paging.
#[instrument(skip(state, query))]
pub async fn export_leads(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let filter = filter_from(ListQuery {
        limit: None,
        offset: None,
        ..query
    })?;
    let leads = state
        .leads
        .list_all(&filter)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch leads", &e))?;
    let body = render_csv(&leads).map_err(|e| ApiError::internal("Failed to export leads", &e))?;

    let stamp = OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]T[hour][minute][second]Z"))
        .map_err(|e| ApiError::internal("Failed to export leads", &e))?;
    info!(count = leads.len(), "leads exported");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"leads_{stamp}.csv\""),
            ),
        ],
        body,
    ))
}
