//! Country: the stored entity, its add request and its response projection.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored country. Countries are created once and never updated or
/// deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
  pub country_id:   Uuid,
  /// Unique across all countries (exact, case-sensitive match).
  pub country_name: String,
}

/// Input to [`crate::service::CountryService::add_country`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryAddRequest {
  pub country_name: Option<String>,
}

impl CountryAddRequest {
  pub fn new(country_name: impl Into<String>) -> Self {
    Self { country_name: Some(country_name.into()) }
  }
}

/// The country projection returned by the service layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryResponse {
  pub country_id:   Uuid,
  pub country_name: String,
}

impl From<Country> for CountryResponse {
  fn from(c: Country) -> Self {
    Self { country_id: c.country_id, country_name: c.country_name }
  }
}
