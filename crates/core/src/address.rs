//! Delivery addresses and the address book.
//!
//! A non-empty address book always has exactly one default address: the first
//! address added becomes the default, marking another address as default
//! clears the previous one, and the default cannot be deleted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::AddressId;

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

/// Address form input, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDraft {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

impl AddressDraft {
    /// Check that every required field is filled in.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::MissingFields` naming each blank field.
    pub fn validate(&self) -> Result<(), AddressError> {
        let missing: Vec<&'static str> = [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("zipCode", &self.zip_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AddressError::MissingFields(missing))
        }
    }

    /// Build an address with `id`, trimming whitespace and dropping blank
    /// instructions.
    #[must_use]
    pub fn into_address(self, id: AddressId) -> Address {
        Address {
            id,
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
            instructions: self
                .instructions
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            is_default: self.is_default,
        }
    }
}

impl From<&Address> for AddressDraft {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            instructions: address.instructions.clone(),
            is_default: address.is_default,
        }
    }
}

/// Address book errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Required form fields are blank.
    #[error("Please fill in all required fields")]
    MissingFields(Vec<&'static str>),

    /// No address with this id.
    #[error("Address not found: {0}")]
    NotFound(AddressId),

    /// The id is already taken.
    #[error("Address already exists: {0}")]
    Duplicate(AddressId),

    /// The default address cannot be removed.
    #[error("The default address cannot be deleted")]
    DefaultNotDeletable(AddressId),
}

/// A user's saved addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl AddressBook {
    /// Create an empty address book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from fetched addresses, repairing the default flag.
    ///
    /// Keeps the first address flagged default; if none is flagged, the first
    /// address becomes the default.
    #[must_use]
    pub fn from_addresses(addresses: Vec<Address>) -> Self {
        let mut book = Self { addresses };
        let keep = book
            .addresses
            .iter()
            .position(|a| a.is_default)
            .unwrap_or(0);
        for (i, address) in book.addresses.iter_mut().enumerate() {
            address.is_default = i == keep;
        }
        book
    }

    /// All addresses in insertion order.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Number of saved addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether no address is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Look up an address.
    #[must_use]
    pub fn get(&self, id: &AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| &a.id == id)
    }

    /// The default address, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Address to pre-select at checkout: the default, else the first.
    #[must_use]
    pub fn preferred(&self) -> Option<&Address> {
        self.default_address().or_else(|| self.addresses.first())
    }

    /// Validate `draft` and add it under `id`.
    ///
    /// # Errors
    ///
    /// Returns `AddressError` if fields are missing or `id` is taken.
    pub fn add(&mut self, id: AddressId, draft: AddressDraft) -> Result<&Address, AddressError> {
        draft.validate()?;
        if self.get(&id).is_some() {
            return Err(AddressError::Duplicate(id));
        }

        let mut address = draft.into_address(id.clone());
        address.is_default = address.is_default || self.addresses.is_empty();
        if address.is_default {
            self.clear_default();
        }
        self.addresses.push(address);

        self.addresses.last().ok_or(AddressError::NotFound(id))
    }

    /// Validate `draft` and replace the address `id`.
    ///
    /// Clearing the default flag on the current default is ignored; choose a
    /// different default with [`AddressBook::set_default`].
    ///
    /// # Errors
    ///
    /// Returns `AddressError` if fields are missing or `id` is unknown.
    pub fn update(&mut self, id: &AddressId, draft: AddressDraft) -> Result<&Address, AddressError> {
        draft.validate()?;
        let position = self.position(id)?;
        let was_default = self
            .addresses
            .get(position)
            .is_some_and(|a| a.is_default);

        let mut updated = draft.into_address(id.clone());
        updated.is_default = updated.is_default || was_default;
        if updated.is_default {
            self.clear_default();
        }

        let slot = self
            .addresses
            .get_mut(position)
            .ok_or_else(|| AddressError::NotFound(id.clone()))?;
        *slot = updated;
        Ok(slot)
    }

    /// Make `id` the only default address.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::NotFound` if `id` is unknown.
    pub fn set_default(&mut self, id: &AddressId) -> Result<(), AddressError> {
        self.position(id)?;
        for address in &mut self.addresses {
            address.is_default = &address.id == id;
        }
        Ok(())
    }

    /// Remove a non-default address.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::DefaultNotDeletable` for the default address and
    /// `AddressError::NotFound` for unknown ids.
    pub fn remove(&mut self, id: &AddressId) -> Result<Address, AddressError> {
        let position = self.position(id)?;
        if self.addresses.get(position).is_some_and(|a| a.is_default) {
            return Err(AddressError::DefaultNotDeletable(id.clone()));
        }
        Ok(self.addresses.remove(position))
    }

    fn position(&self, id: &AddressId) -> Result<usize, AddressError> {
        self.addresses
            .iter()
            .position(|a| &a.id == id)
            .ok_or_else(|| AddressError::NotFound(id.clone()))
    }

    fn clear_default(&mut self) {
        for address in &mut self.addresses {
            address.is_default = false;
        }
    }
}
