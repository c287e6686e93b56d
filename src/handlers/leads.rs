use crate::auth::CurrentUser;
use crate::schemas::{AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::lead;
use model::phone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;

/// Request body for creating a new lead.
/// There is no owner field: the owner is always the authenticated caller,
/// and any such key in the payload is ignored.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateLeadRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// International phone number, e.g. `+972541096752`
    pub phone: String,
    /// Submitting address, if known
    #[serde(default)]
    pub ip: Option<String>,
}

/// Lead representation. The owner and the stored ip are not exposed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LeadResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl From<lead::Model> for LeadResponse {
    fn from(model: lead::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
        }
    }
}

/// List the caller's leads, newest first
#[utoipa::path(
    get,
    path = "/api/lead/",
    tag = "lead",
    responses(
        (status = 200, description = "Leads owned by the caller, descending id", body = Vec<LeadResponse>),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, owner), fields(owner_id = owner.0.id))]
pub async fn list_leads(
    owner: CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<LeadResponse>>, StatusCode> {
    match lead::Entity::find()
        .filter(lead::Column::OwnerId.eq(owner.0.id))
        .order_by_desc(lead::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(leads) => {
            debug!("Retrieved {} leads for user {}", leads.len(), owner.0.id);
            Ok(Json(leads.into_iter().map(LeadResponse::from).collect()))
        }
        Err(db_error) => {
            error!("Failed to list leads for user {}: {}", owner.0.id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Create a lead owned by the caller
#[utoipa::path(
    post,
    path = "/api/lead/",
    tag = "lead",
    request_body = CreateLeadRequest,
    responses(
        (status = 201, description = "Lead created successfully", body = LeadResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("token" = []))
)]
#[instrument(skip(state, owner, request), fields(owner_id = owner.0.id))]
pub async fn create_lead(
    owner: CurrentUser,
    State(state): State<AppState>,
    Json(request): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<LeadResponse>), (StatusCode, Json<ErrorResponse>)> {
    if !phone::is_valid_phone(&request.phone) {
        warn!("Rejected lead with invalid phone number");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::field("phone", "Enter a valid phone number.")),
        ));
    }
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::field("email", "Enter a valid email address.")),
        ));
    }
    if let Some(ip) = &request.ip {
        if ip.parse::<std::net::IpAddr>().is_err() {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::field("ip", "Enter a valid IP address.")),
            ));
        }
    }

    let new_lead = lead::ActiveModel {
        owner_id: Set(owner.0.id),
        first_name: Set(request.first_name.clone()),
        last_name: Set(request.last_name.clone()),
        email: Set(request.email.clone()),
        phone: Set(request.phone.clone()),
        ip: Set(request.ip.clone()),
        ..Default::default()
    };

    match new_lead.insert(&state.db).await {
        Ok(created) => {
            info!("Lead {} created for user {}", created.id, owner.0.id);
            Ok((StatusCode::CREATED, Json(LeadResponse::from(created))))
        }
        Err(db_error) => {
            error!("Failed to create lead for user {}: {}", owner.0.id, db_error);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Internal server error while creating lead",
                    "DATABASE_ERROR",
                )),
            ))
        }
    }
}

/// Retrieve one of the caller's leads by id
#[utoipa::path(
    get,
    path = "/api/lead/{lead_id}/",
    tag = "lead",
    params(
        ("lead_id" = i32, Path, description = "Lead ID"),
    ),
    responses(
        (status = 200, description = "Lead retrieved successfully", body = LeadResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such lead owned by the caller")
    ),
    security(("token" = []))
)]
#[instrument(skip(state, owner), fields(owner_id = owner.0.id))]
pub async fn get_lead(
    owner: CurrentUser,
    Path(lead_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<LeadResponse>, StatusCode> {
    // Owner filter is part of the query, so another user's lead is
    // indistinguishable from a missing one.
    match lead::Entity::find()
        .filter(lead::Column::Id.eq(lead_id))
        .filter(lead::Column::OwnerId.eq(owner.0.id))
        .one(&state.db)
        .await
    {
        Ok(Some(found)) => Ok(Json(LeadResponse::from(found))),
        Ok(None) => {
            warn!("Lead {} not found for user {}", lead_id, owner.0.id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve lead {}: {}", lead_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete one of the caller's leads by id
#[utoipa::path(
    delete,
    path = "/api/lead/{lead_id}/",
    tag = "lead",
    params(
        ("lead_id" = i32, Path, description = "Lead ID"),
    ),
    responses(
        (status = 204, description = "Lead deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No such lead owned by the caller")
    ),
    security(("token" = []))
)]
#[instrument(skip(state, owner), fields(owner_id = owner.0.id))]
pub async fn delete_lead(
    owner: CurrentUser,
    Path(lead_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<StatusCode, StatusCode> {
    match lead::Entity::delete_many()
        .filter(lead::Column::Id.eq(lead_id))
        .filter(lead::Column::OwnerId.eq(owner.0.id))
        .exec(&state.db)
        .await
    {
        Ok(delete_result) => {
            if delete_result.rows_affected > 0 {
                info!("Lead {} deleted by user {}", lead_id, owner.0.id);
                Ok(StatusCode::NO_CONTENT)
            } else {
                warn!("Lead {} not found for user {}", lead_id, owner.0.id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete lead {}: {}", lead_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
