//! Address book management synced with the backend.
//!
//! Local [`AddressBook`] rules are checked before any remote call, so a
//! refused edit (deleting the default, unknown id, blank fields) never reaches
//! the backend. Remote failures are absorbed: the local book is still updated.

use campus_eats_core::{Address, AddressBook, AddressDraft, AddressError, AddressId};
use secrecy::SecretString;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::api::{ApiClient, FallbackPolicy};
use crate::fixtures::{self, CAMPUS_CITY, CAMPUS_STATE, CAMPUS_ZIP};

/// Deliveries only go to campus: city, state and zip are fixed.
#[must_use]
pub fn pin_to_campus(draft: AddressDraft) -> AddressDraft {
    AddressDraft {
        city: CAMPUS_CITY.to_string(),
        state: CAMPUS_STATE.to_string(),
        zip_code: CAMPUS_ZIP.to_string(),
        ..draft
    }
}

fn local_address_id() -> AddressId {
    AddressId::new(format!("addr-{}", Uuid::new_v4().simple()))
}

/// Address operations for the signed-in user.
///
/// Without a token the mock address book is used and nothing is sent.
pub struct AddressService<'a> {
    api: &'a ApiClient,
    policy: FallbackPolicy,
    token: Option<&'a SecretString>,
}

impl<'a> AddressService<'a> {
    /// Create a new address service.
    #[must_use]
    pub const fn new(
        api: &'a ApiClient,
        policy: FallbackPolicy,
        token: Option<&'a SecretString>,
    ) -> Self {
        Self { api, policy, token }
    }

    /// Fetch the saved addresses.
    #[instrument(skip(self))]
    pub async fn load(&self) -> AddressBook {
        let addresses = match self.token {
            Some(token) => {
                self.policy
                    .call_with(
                        self.api.addresses(token),
                        fixtures::mock_addresses,
                        "addresses",
                    )
                    .await
            }
            None => fixtures::mock_addresses(),
        };
        AddressBook::from_addresses(addresses)
    }

    /// Save a new address.
    ///
    /// The backend assigns the id when it answers; otherwise a local id is
    /// generated.
    ///
    /// # Errors
    ///
    /// Returns `AddressError` if required fields are blank.
    #[instrument(skip(self, book, draft))]
    pub async fn add(
        &self,
        book: &mut AddressBook,
        draft: AddressDraft,
    ) -> Result<Address, AddressError> {
        let draft = pin_to_campus(draft);
        draft.validate()?;

        let remote = match self.token {
            Some(token) => {
                self.policy
                    .call(
                        async { self.api.add_address(token, &draft).await.map(Some) },
                        None,
                        "add address",
                    )
                    .await
            }
            None => None,
        };

        let id = remote
            .map(|address| address.id)
            .filter(|id| book.get(id).is_none())
            .unwrap_or_else(local_address_id);
        let address = book.add(id, draft)?.clone();
        info!(address_id = %address.id, "Address added");
        Ok(address)
    }

    /// Replace an existing address.
    ///
    /// # Errors
    ///
    /// Returns `AddressError` if `id` is unknown or fields are blank.
    #[instrument(skip(self, book, draft), fields(address_id = %id))]
    pub async fn update(
        &self,
        book: &mut AddressBook,
        id: &AddressId,
        draft: AddressDraft,
    ) -> Result<Address, AddressError> {
        let draft = pin_to_campus(draft);
        draft.validate()?;
        if book.get(id).is_none() {
            return Err(AddressError::NotFound(id.clone()));
        }

        self.push_update(id, &draft).await;
        Ok(book.update(id, draft)?.clone())
    }

    /// Make `id` the default address.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::NotFound` if `id` is unknown.
    #[instrument(skip(self, book), fields(address_id = %id))]
    pub async fn set_default(
        &self,
        book: &mut AddressBook,
        id: &AddressId,
    ) -> Result<(), AddressError> {
        let mut draft = book
            .get(id)
            .map(AddressDraft::from)
            .ok_or_else(|| AddressError::NotFound(id.clone()))?;
        draft.is_default = true;

        self.push_update(id, &draft).await;
        book.set_default(id)
    }

    /// Delete a non-default address.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::DefaultNotDeletable` for the default address and
    /// `AddressError::NotFound` for unknown ids.
    #[instrument(skip(self, book), fields(address_id = %id))]
    pub async fn remove(
        &self,
        book: &mut AddressBook,
        id: &AddressId,
    ) -> Result<Address, AddressError> {
        match book.get(id) {
            None => return Err(AddressError::NotFound(id.clone())),
            Some(address) if address.is_default => {
                return Err(AddressError::DefaultNotDeletable(id.clone()));
            }
            Some(_) => {}
        }

        if let Some(token) = self.token {
            self.policy
                .call(self.api.delete_address(token, id), (), "delete address")
                .await;
        }
        let removed = book.remove(id)?;
        info!("Address removed");
        Ok(removed)
    }

    async fn push_update(&self, id: &AddressId, draft: &AddressDraft) {
        if let Some(token) = self.token {
            self.policy
                .call(
                    async { self.api.update_address(token, id, draft).await.map(Some) },
                    None,
                    "update address",
                )
                .await;
        }
    }
}
