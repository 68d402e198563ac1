//! Repository traits for countries and persons.
//!
//! The traits are implemented by storage backends ([`crate::memory`],
//! `census-store-sqlite`). The services depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{country::Country, person::Person};

// ─── Countries ───────────────────────────────────────────────────────────────

/// Data access for [`Country`] records.
///
/// All methods return `Send` futures so implementations can be shared across
/// a multi-threaded runtime (e.g. tokio with `axum`).
pub trait CountriesRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a fully-built country unless one with the same name is already
  /// stored. The name check and the insert are a single atomic step; a taken
  /// name yields `None`. The id is assigned by the caller.
  fn add_country(
    &self,
    country: Country,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + '_;

  /// Every stored country, in insertion order.
  fn get_all_countries(
    &self,
  ) -> impl Future<Output = Result<Vec<Country>, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_country_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + '_;

  /// Exact, case-sensitive name lookup. Returns `None` if not found.
  fn get_country_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Country>, Self::Error>> + Send + 'a;
}

// ─── Persons ─────────────────────────────────────────────────────────────────

/// Data access for [`Person`] records.
pub trait PersonsRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a fully-built person unless one with the same name is already
  /// stored, atomically. A taken name yields `None`.
  fn add_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Every stored person, in insertion order.
  fn get_all_persons(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Returns `None` if not found.
  fn get_person_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// The first stored person (in insertion order) whose name is exactly
  /// `name`. Names are not unique once updates have run.
  fn get_person_by_name<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Overwrite the stored record with the same id. Returns `None` if no such
  /// record exists.
  fn update_person(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Remove the record with `id`. Returns `false` if nothing was removed.
  fn delete_person_by_id(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
