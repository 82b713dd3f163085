//! Client and address handlers.
//!
//! Every handler resolves the client first and applies the access policy
//! before touching it; addresses are checked through their client.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    Address, AddressInput, Client, ClientDetail, CreateClientRequest, ListClientsResponse,
    UpdateClientRequest,
};
use domain::services::{ensure_client_access, Actor};
use persistence::repositories::{
    AddressRepository, AddressValues, CatalogRepository, ClientRepository, SalesAgentRepository,
};
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// Clients visible to `actor`, each with its addresses, ordered by name.
pub(crate) async fn visible_client_details(
    state: &AppState,
    actor: &Actor,
) -> Result<Vec<ClientDetail>, ApiError> {
    let clients: Vec<Client> = ClientRepository::new(state.pool.clone())
        .list(actor.scope().owner_filter())
        .await?
        .into_iter()
        .map(Client::from)
        .collect();

    let ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();
    let mut addresses: HashMap<Uuid, Vec<Address>> = HashMap::new();
    for entity in AddressRepository::new(state.pool.clone())
        .list_for_clients(&ids)
        .await?
    {
        let address = Address::from(entity);
        addresses.entry(address.client_id).or_default().push(address);
    }

    Ok(clients
        .into_iter()
        .map(|client| ClientDetail {
            addresses: addresses.remove(&client.id).unwrap_or_default(),
            client,
        })
        .collect())
}

/// Loads a client and checks the actor may act on it.
async fn accessible_client(
    state: &AppState,
    actor: &Actor,
    client_id: Uuid,
) -> Result<Client, ApiError> {
    let client: Client = ClientRepository::new(state.pool.clone())
        .find_by_id(client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".into()))?
        .into();

    ensure_client_access(actor, &client)?;
    Ok(client)
}

async fn client_detail(state: &AppState, client: Client) -> Result<ClientDetail, ApiError> {
    let addresses = AddressRepository::new(state.pool.clone())
        .list_for_client(client.id)
        .await?
        .into_iter()
        .map(Address::from)
        .collect();

    Ok(ClientDetail { client, addresses })
}

/// Reports unknown catalog or agent ids as field errors instead of letting
/// the foreign keys reject them.
async fn check_references(
    state: &AppState,
    entity_type_id: Option<Uuid>,
    agent_id: Option<Uuid>,
    address_type_ids: impl IntoIterator<Item = (String, Uuid)>,
) -> Result<(), ApiError> {
    let catalogs = CatalogRepository::new(state.pool.clone());

    if let Some(id) = entity_type_id {
        if catalogs.find_entity_type(id).await?.is_none() {
            return Err(ApiError::field("entity_type_id", "Entity type not found"));
        }
    }
    if let Some(id) = agent_id {
        if SalesAgentRepository::new(state.pool.clone())
            .find_by_id(id)
            .await?
            .is_none()
        {
            return Err(ApiError::field("agent_id", "Sales agent not found"));
        }
    }
    for (field, id) in address_type_ids {
        if catalogs.find_address_type(id).await?.is_none() {
            return Err(ApiError::field(&field, "Address type not found"));
        }
    }
    Ok(())
}

/// The agent profile an agent's new clients belong to.
async fn own_agent_id(state: &AppState, actor: &Actor) -> Result<Uuid, ApiError> {
    SalesAgentRepository::new(state.pool.clone())
        .find_by_user_id(actor.user_id)
        .await?
        .map(|agent| agent.id)
        .ok_or_else(|| ApiError::Forbidden("No sales agent profile is linked to this user".into()))
}

/// GET /api/v1/clients
pub async fn list_clients(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<ListClientsResponse>, ApiError> {
    let data: Vec<Client> = ClientRepository::new(state.pool.clone())
        .list(current.actor.scope().owner_filter())
        .await?
        .into_iter()
        .map(Client::from)
        .collect();

    let count = data.len();
    Ok(Json(ListClientsResponse { data, count }))
}

/// POST /api/v1/clients
///
/// Creates the client with every usable address in one transaction.
pub async fn create_client(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<ClientDetail>), ApiError> {
    request.validate_all()?;

    let agent_id = if current.actor.is_supervisor() {
        request.agent_id
    } else {
        Some(own_agent_id(&state, &current.actor).await?)
    };

    let address_types: Vec<(String, Uuid)> = request
        .addresses
        .iter()
        .enumerate()
        .map(|(i, a)| (format!("addresses[{}].address_type_id", i), a.address_type_id))
        .collect();
    check_references(&state, request.entity_type_id, agent_id, address_types).await?;

    let client: Client = ClientRepository::new(state.pool.clone())
        .create_with_addresses(&request, agent_id)
        .await?
        .into();

    info!(
        client_id = %client.id,
        user_id = %current.user.id,
        agent_id = ?agent_id,
        "Client created"
    );

    let detail = client_detail(&state, client).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/clients/:client_id
pub async fn get_client(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> Result<Json<ClientDetail>, ApiError> {
    let client = accessible_client(&state, &current.actor, client_id).await?;
    Ok(Json(client_detail(&state, client).await?))
}

/// PUT /api/v1/clients/:client_id
///
/// Basic fields only. Agents cannot reassign the owner.
pub async fn update_client(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(client_id): Path<Uuid>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<ClientDetail>, ApiError> {
    let existing = accessible_client(&state, &current.actor, client_id).await?;
    request.validate()?;

    let agent_id = if current.actor.is_supervisor() {
        request.agent_id
    } else {
        existing.agent.as_ref().map(|agent| agent.id)
    };
    check_references(&state, request.entity_type_id, agent_id, std::iter::empty()).await?;

    let client: Client = ClientRepository::new(state.pool.clone())
        .update(client_id, &request, agent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Client not found".into()))?
        .into();

    info!(client_id = %client.id, user_id = %current.user.id, "Client updated");
    Ok(Json(client_detail(&state, client).await?))
}

/// DELETE /api/v1/clients/:client_id
pub async fn delete_client(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(client_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    accessible_client(&state, &current.actor, client_id).await?;

    if !ClientRepository::new(state.pool.clone())
        .delete(client_id)
        .await?
    {
        return Err(ApiError::NotFound("Client not found".into()));
    }

    info!(client_id = %client_id, user_id = %current.user.id, "Client deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/clients/:client_id/addresses
pub async fn add_address(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(client_id): Path<Uuid>,
    Json(input): Json<AddressInput>,
) -> Result<(StatusCode, Json<Address>), ApiError> {
    accessible_client(&state, &current.actor, client_id).await?;
    input.validate()?;
    check_references(
        &state,
        None,
        None,
        [("address_type_id".to_string(), input.address_type_id)],
    )
    .await?;

    let address: Address = AddressRepository::new(state.pool.clone())
        .create(client_id, &AddressValues::from(&input))
        .await?
        .into();

    info!(address_id = %address.id, client_id = %client_id, "Address added");
    Ok((StatusCode::CREATED, Json(address)))
}

/// Loads an address and checks access through its client.
async fn accessible_address(
    state: &AppState,
    actor: &Actor,
    address_id: Uuid,
) -> Result<Address, ApiError> {
    let address: Address = AddressRepository::new(state.pool.clone())
        .find_by_id(address_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Address not found".into()))?
        .into();

    accessible_client(state, actor, address.client_id).await?;
    Ok(address)
}

/// PUT /api/v1/addresses/:address_id
pub async fn update_address(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(address_id): Path<Uuid>,
    Json(input): Json<AddressInput>,
) -> Result<Json<Address>, ApiError> {
    accessible_address(&state, &current.actor, address_id).await?;
    input.validate()?;
    check_references(
        &state,
        None,
        None,
        [("address_type_id".to_string(), input.address_type_id)],
    )
    .await?;

    let address: Address = AddressRepository::new(state.pool.clone())
        .update(address_id, &AddressValues::from(&input))
        .await?
        .ok_or_else(|| ApiError::NotFound("Address not found".into()))?
        .into();

    info!(address_id = %address.id, client_id = %address.client_id, "Address updated");
    Ok(Json(address))
}

/// DELETE /api/v1/addresses/:address_id
pub async fn delete_address(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(address_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let address = accessible_address(&state, &current.actor, address_id).await?;

    if !AddressRepository::new(state.pool.clone())
        .delete(address_id)
        .await?
    {
        return Err(ApiError::NotFound("Address not found".into()));
    }

    info!(address_id = %address_id, client_id = %address.client_id, "Address deleted");
    Ok(StatusCode::NO_CONTENT)
}
