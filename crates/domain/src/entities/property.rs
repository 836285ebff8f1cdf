//! Property entity - a single real-estate listing.
//!
//! Three shapes of the same record live here:
//!
//! - `Property` is a persisted row: it has an id and both timestamps.
//! - `NewProperty` is what a client submits to create a listing.
//! - `PropertyUpdate` is an allow-listed partial update. Only the fields a
//!   client may change appear in it; `id`, `created_at` and `updated_at` are
//!   server-managed and silently ignored if sent.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::ids::PropertyId;
use crate::validation::{cleared_required_fields, missing_required_fields};

/// A persisted property listing.
///
/// Simple data struct: every field combination the store can hold is a valid
/// record, so fields are public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<f64>,
    pub square_feet: Option<f64>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    /// Free-form kind of dwelling (house, apartment, condo, ...)
    pub property_type: Option<String>,
    /// "sale" or "rent" by convention; not enforced
    pub listing_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Materialize a draft as a stored record.
    ///
    /// Both timestamps take the same value so a fresh record always has
    /// `created_at == updated_at`.
    pub fn from_draft(id: PropertyId, draft: NewProperty, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            price: draft.price,
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            square_feet: draft.square_feet,
            address: draft.address,
            city: draft.city,
            state: draft.state,
            zip_code: draft.zip_code,
            property_type: draft.property_type,
            listing_type: draft.listing_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the fields carried by `update` and refresh `updated_at`.
    ///
    /// `updated_at` strictly increases: if the clock has not moved past the
    /// previous value, it is advanced by one microsecond instead.
    pub fn apply(&mut self, update: PropertyUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(bedrooms) = update.bedrooms {
            self.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = update.bathrooms {
            self.bathrooms = bathrooms;
        }
        if let Some(square_feet) = update.square_feet {
            self.square_feet = square_feet;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(city) = update.city {
            self.city = city;
        }
        if let Some(state) = update.state {
            self.state = state;
        }
        if let Some(zip_code) = update.zip_code {
            self.zip_code = zip_code;
        }
        if let Some(property_type) = update.property_type {
            self.property_type = property_type;
        }
        if let Some(listing_type) = update.listing_type {
            self.listing_type = listing_type;
        }

        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }
}

/// Client-submitted data for a new listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub bedrooms: Option<i64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub square_feet: Option<f64>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub listing_type: Option<String>,
}

impl NewProperty {
    /// Validate and decode a creation payload.
    ///
    /// Presence of every required field is checked first so the caller gets
    /// the complete list of missing names in one response.
    pub fn from_payload(payload: Map<String, Value>) -> Result<Self, DomainError> {
        let missing = missing_required_fields(&payload);
        if !missing.is_empty() {
            return Err(DomainError::MissingFields(missing));
        }

        serde_json::from_value(Value::Object(payload))
            .map_err(|e| DomainError::validation(e.to_string()))
    }
}

/// Allow-listed partial update.
///
/// Required fields are `Option<T>`: `None` leaves them unchanged. Optional
/// fields are `Option<Option<T>>`: `None` leaves them unchanged while
/// `Some(None)` (an explicit JSON `null`) clears them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertyUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub bedrooms: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub bathrooms: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub square_feet: Option<Option<f64>>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub property_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub listing_type: Option<Option<String>>,
}

impl PropertyUpdate {
    /// Validate and decode an update payload.
    ///
    /// A required field may be omitted, but not blanked: `{"title": ""}` or
    /// `{"price": null}` is rejected so a stored record never loses a
    /// required value.
    pub fn from_payload(payload: Map<String, Value>) -> Result<Self, DomainError> {
        let cleared = cleared_required_fields(&payload);
        if !cleared.is_empty() {
            return Err(DomainError::MissingFields(cleared));
        }

        serde_json::from_value(Value::Object(payload))
            .map_err(|e| DomainError::validation(e.to_string()))
    }
}

/// Distinguish an explicit `null` from an absent key.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
