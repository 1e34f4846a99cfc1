//! Address book handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use campus_eats_core::{Address, AddressBook, AddressDraft, AddressId};
use tracing::instrument;

use crate::error::Result;
use crate::services::AddressService;
use crate::state::AppState;

/// List saved addresses.
///
/// GET /addresses
pub async fn index(State(state): State<AppState>) -> Json<AddressBook> {
    Json(state.address_book().await.clone())
}

/// Save a new address.
///
/// POST /addresses
///
/// # Errors
///
/// Returns 400 if required fields are blank.
#[instrument(skip(state, draft))]
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<AddressDraft>,
) -> Result<(StatusCode, Json<Address>)> {
    let token = state.token().await;
    let service = AddressService::new(state.api(), state.fallback_policy(), token.as_ref());

    let mut book = state.address_book().await;
    let address = service.add(&mut book, draft).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// Replace an address.
///
/// PUT /addresses/{id}
///
/// # Errors
///
/// Returns 404 for unknown ids and 400 if required fields are blank.
#[instrument(skip(state, draft))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
    Json(draft): Json<AddressDraft>,
) -> Result<Json<Address>> {
    let token = state.token().await;
    let service = AddressService::new(state.api(), state.fallback_policy(), token.as_ref());

    let mut book = state.address_book().await;
    Ok(Json(service.update(&mut book, &id, draft).await?))
}

/// Make an address the default.
///
/// POST /addresses/{id}/default
///
/// # Errors
///
/// Returns 404 for unknown ids.
#[instrument(skip(state))]
pub async fn set_default(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<Json<AddressBook>> {
    let token = state.token().await;
    let service = AddressService::new(state.api(), state.fallback_policy(), token.as_ref());

    let mut book = state.address_book().await;
    service.set_default(&mut book, &id).await?;
    Ok(Json(book.clone()))
}

/// Delete a non-default address.
///
/// DELETE /addresses/{id}
///
/// # Errors
///
/// Returns 409 for the default address and 404 for unknown ids.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(id): Path<AddressId>) -> Result<StatusCode> {
    let token = state.token().await;
    let service = AddressService::new(state.api(), state.fallback_policy(), token.as_ref());

    let mut book = state.address_book().await;
    service.remove(&mut book, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
