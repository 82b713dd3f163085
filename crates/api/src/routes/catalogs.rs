//! Entity type and address type catalog handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{AddressType, CreateAddressTypeRequest, CreateEntityTypeRequest, EntityType};
use persistence::repositories::{AddressTypeDeletion, CatalogRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentUser, Supervisor};

/// GET /api/v1/entity-types
pub async fn list_entity_types(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<EntityType>>, ApiError> {
    let types = CatalogRepository::new(state.pool.clone())
        .list_entity_types()
        .await?
        .into_iter()
        .map(EntityType::from)
        .collect();

    Ok(Json(types))
}

/// POST /api/v1/entity-types
pub async fn create_entity_type(
    State(state): State<AppState>,
    Supervisor(_supervisor): Supervisor,
    Json(request): Json<CreateEntityTypeRequest>,
) -> Result<(StatusCode, Json<EntityType>), ApiError> {
    request.validate()?;

    let entity_type: EntityType = CatalogRepository::new(state.pool.clone())
        .create_entity_type(request.name.trim())
        .await
        .map_err(|e| name_taken(e, "An entity type with this name already exists"))?
        .into();

    info!(entity_type_id = %entity_type.id, name = %entity_type.name, "Entity type created");
    Ok((StatusCode::CREATED, Json(entity_type)))
}

/// GET /api/v1/address-types
pub async fn list_address_types(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<Vec<AddressType>>, ApiError> {
    let types = CatalogRepository::new(state.pool.clone())
        .list_address_types()
        .await?
        .into_iter()
        .map(AddressType::from)
        .collect();

    Ok(Json(types))
}

/// POST /api/v1/address-types
pub async fn create_address_type(
    State(state): State<AppState>,
    Supervisor(_supervisor): Supervisor,
    Json(request): Json<CreateAddressTypeRequest>,
) -> Result<(StatusCode, Json<AddressType>), ApiError> {
    request.validate()?;

    let address_type: AddressType = CatalogRepository::new(state.pool.clone())
        .create_address_type(request.name.trim(), request.description.trim())
        .await
        .map_err(|e| name_taken(e, "An address type with this name already exists"))?
        .into();

    info!(address_type_id = %address_type.id, name = %address_type.name, "Address type created");
    Ok((StatusCode::CREATED, Json(address_type)))
}

/// DELETE /api/v1/address-types/:id
pub async fn delete_address_type(
    State(state): State<AppState>,
    Supervisor(_supervisor): Supervisor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    match CatalogRepository::new(state.pool.clone())
        .delete_address_type(id)
        .await?
    {
        AddressTypeDeletion::Deleted => {
            info!(address_type_id = %id, "Address type deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        AddressTypeDeletion::NotFound => Err(ApiError::NotFound("Address type not found".into())),
        AddressTypeDeletion::InUse(count) => Err(ApiError::Conflict(format!(
            "Address type is used by {} address(es) and cannot be deleted",
            count
        ))),
    }
}

/// Catalog names are unique; report a clash on the `name` field.
fn name_taken(err: sqlx::Error, message: &str) -> ApiError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            ApiError::field("name", message)
        }
        _ => err.into(),
    }
}
