//! User record and its embedded sub-records.
//!
//! These are plain data carriers. Nothing here validates content: every field
//! except the identifier may be absent, and strings such as `birth_date` are
//! stored exactly as received.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::UserId;

/// A directory user.
///
/// The identifier is assigned by the import source and never changes once
/// stored. Everything else lives in [`UserDetails`], which is flattened into
/// the same JSON object on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Primary key, assigned upstream.
    pub id: UserId,
    /// All mutable attributes.
    #[serde(flatten)]
    pub details: UserDetails,
}

impl User {
    /// Create a user from an identifier and its details.
    #[must_use]
    pub const fn new(id: UserId, details: UserDetails) -> Self {
        Self { id, details }
    }
}

/// Every attribute of a [`User`] except its identifier.
///
/// An update replaces all of these at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub maiden_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    /// Alternate lookup key. Not unique.
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
    /// Stored as received (plain text).
    pub password: Option<String>,
    /// Free-form date string, e.g. `1996-5-30`.
    pub birth_date: Option<String>,
    pub image: Option<String>,
    pub blood_group: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub eye_color: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub hair: Hair,
    #[serde(deserialize_with = "null_as_default")]
    pub address: Address,
    #[serde(deserialize_with = "null_as_default")]
    pub bank: Bank,
    #[serde(deserialize_with = "null_as_default")]
    pub company: Company,
    pub ein: Option<String>,
    pub ssn: Option<String>,
    pub user_agent: Option<String>,
    pub role: Option<String>,
}

/// Hair description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hair {
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Postal address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    /// Street line. Carried under the `address` key in JSON.
    #[serde(rename = "address")]
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub coordinates: Coordinates,
    pub country: Option<String>,
}

/// Geographic coordinates of an [`Address`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Payment card and account details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bank {
    pub card_expire: Option<String>,
    pub card_number: Option<String>,
    pub card_type: Option<String>,
    pub currency: Option<String>,
    pub iban: Option<String>,
}

/// Employer details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub department: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
}

/// Treat an explicit `null` sub-record the same as an absent one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
