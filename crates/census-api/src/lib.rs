//! JSON REST API for Census.
//!
//! Exposes an axum [`Router`] backed by a [`CountryService`] and a
//! [`PersonService`]. Auth, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", census_api::api_router(state))
//! ```

pub mod countries;
pub mod error;
pub mod persons;

use axum::{Router, routing::get};
use census_core::{
  repository::{CountriesRepository, PersonsRepository},
  service::{CountryService, PersonService},
};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<P, C> {
  pub countries: CountryService<C>,
  pub persons:   PersonService<P, C>,
}

impl<P, C> Clone for AppState<P, C> {
  fn clone(&self) -> Self {
    Self { countries: self.countries.clone(), persons: self.persons.clone() }
  }
}

impl<P, C> AppState<P, C>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  /// Wire both services over their repositories.
  pub fn new(persons: std::sync::Arc<P>, countries: std::sync::Arc<C>) -> Self {
    let countries = CountryService::new(countries);
    let persons = PersonService::new(persons, countries.clone());
    Self { countries, persons }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<P, C>(state: AppState<P, C>) -> Router<()>
where
  P: PersonsRepository + 'static,
  C: CountriesRepository + 'static,
{
  Router::new()
    // Countries
    .route(
      "/countries",
      get(countries::list::<P, C>).post(countries::create::<P, C>),
    )
    .route("/countries/{id}", get(countries::get_one::<P, C>))
    // Persons
    .route("/persons", get(persons::list::<P, C>).post(persons::create::<P, C>))
    .route("/persons/search-fields", get(persons::search_fields))
    .route(
      "/persons/{id}",
      get(persons::get_one::<P, C>)
        .put(persons::update::<P, C>)
        .delete(persons::delete::<P, C>),
    )
    .with_state(state)
}

#[cfg(test)]
mod tests;
