use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  field::{self, PersonField, SortOrder},
  person::{Person, PersonAddRequest, PersonResponse, PersonUpdateRequest},
  repository::{CountriesRepository, PersonsRepository},
  service::CountryService,
  validation::Validate as _,
};

/// Add, list, look up, update and delete persons, and filter or sort their
/// projections.
///
/// Country names shown on projections are resolved through the
/// [`CountryService`].
pub struct PersonService<P, C> {
  repo:      Arc<P>,
  countries: CountryService<C>,
}

impl<P, C> Clone for PersonService<P, C> {
  fn clone(&self) -> Self {
    Self { repo: Arc::clone(&self.repo), countries: self.countries.clone() }
  }
}

impl<P, C> PersonService<P, C>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  pub fn new(repo: Arc<P>, countries: CountryService<C>) -> Self {
    Self { repo, countries }
  }

  // ── Projection ────────────────────────────────────────────────────────────

  async fn project(&self, person: Person) -> Result<PersonResponse> {
    let country = self
      .countries
      .get_country_by_id(person.country_id)
      .await?
      .map(|c| c.country_name);
    Ok(PersonResponse::project(person, country, Utc::now()))
  }

  async fn project_all(&self, persons: Vec<Person>) -> Result<Vec<PersonResponse>> {
    let names = self.countries.names_by_id().await?;
    let now = Utc::now();
    Ok(
      persons
        .into_iter()
        .map(|p| {
          let country = p.country_id.and_then(|id| names.get(&id).cloned());
          PersonResponse::project(p, country, now)
        })
        .collect(),
    )
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Validate and store a new person under a fresh id.
  ///
  /// Fails with [`Error::NullArgument`] when `request` is `None`,
  /// [`Error::InvalidArgument`] when the name is blank or the email is
  /// malformed, and [`Error::DuplicateEntity`] when another person already
  /// has the same name. The name check is made by the repository as part of
  /// the insert, so concurrent adds of one name cannot both succeed.
  pub async fn add_person(
    &self,
    request: Option<PersonAddRequest>,
  ) -> Result<PersonResponse> {
    let request = request.ok_or(Error::NullArgument("person add request"))?;
    request.validate().inspect_err(|e| warn!("rejected person: {e}"))?;

    let person_name = request.person_name.clone().unwrap_or_default();
    let added = self
      .repo
      .add_person(request.into_person(Uuid::new_v4()))
      .await
      .map_err(Error::repository)?;
    let Some(person) = added else {
      warn!(%person_name, "duplicate person name");
      return Err(Error::DuplicateEntity(format!(
        "person {person_name:?} already exists"
      )));
    };

    info!(person_id = %person.person_id, person_name = %person.person_name, "person added");
    self.project(person).await
  }

  /// Overwrite every mutable field of the person named by
  /// `request.person_id`.
  ///
  /// An unknown id is an error here ([`Error::NotFound`]), unlike the
  /// lookups and [`Self::delete_person`]. Names are not re-checked for
  /// uniqueness.
  pub async fn update_person(
    &self,
    request: Option<PersonUpdateRequest>,
  ) -> Result<PersonResponse> {
    let request = request.ok_or(Error::NullArgument("person update request"))?;
    request.validate().inspect_err(|e| warn!("rejected update: {e}"))?;

    let person_id = request.person_id;
    let mut person = self
      .repo
      .get_person_by_id(person_id)
      .await
      .map_err(Error::repository)?
      .ok_or(Error::NotFound(person_id))?;

    person.apply_update(request);

    let person = self
      .repo
      .update_person(person)
      .await
      .map_err(Error::repository)?
      .ok_or(Error::NotFound(person_id))?;

    info!(%person_id, "person updated");
    self.project(person).await
  }

  /// Remove the person with `id`. A missing, nil or unknown id yields
  /// `Ok(false)`.
  pub async fn delete_person(&self, id: Option<Uuid>) -> Result<bool> {
    let Some(id) = id.filter(|id| !id.is_nil()) else {
      return Ok(false);
    };

    let deleted =
      self.repo.delete_person_by_id(id).await.map_err(Error::repository)?;
    if deleted {
      info!(person_id = %id, "person deleted");
    } else {
      debug!(person_id = %id, "nothing to delete");
    }
    Ok(deleted)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn get_all_persons(&self) -> Result<Vec<PersonResponse>> {
    let persons =
      self.repo.get_all_persons().await.map_err(Error::repository)?;
    self.project_all(persons).await
  }

  /// A missing or unknown id yields `Ok(None)`.
  pub async fn get_person_by_id(
    &self,
    id: Option<Uuid>,
  ) -> Result<Option<PersonResponse>> {
    let Some(id) = id else {
      return Ok(None);
    };
    match self.repo.get_person_by_id(id).await.map_err(Error::repository)? {
      Some(person) => self.project(person).await.map(Some),
      None => Ok(None),
    }
  }

  /// All persons whose `search_by` field matches `search_string`.
  ///
  /// See [`field::filter`] for the matching rules; a missing field value
  /// never excludes a person.
  pub async fn get_filtered_persons(
    &self,
    search_by: Option<PersonField>,
    search_string: Option<&str>,
  ) -> Result<Vec<PersonResponse>> {
    let all = self.get_all_persons().await?;
    debug!(?search_by, ?search_string, total = all.len(), "filtering persons");
    Ok(field::filter(all, search_by, search_string))
  }

  /// Stable-sort `persons` by `sort_by` in `sort_order`. Without a field
  /// the list is returned as given.
  pub fn get_sorted_persons(
    &self,
    persons: Vec<PersonResponse>,
    sort_by: Option<PersonField>,
    sort_order: SortOrder,
  ) -> Vec<PersonResponse> {
    debug!(?sort_by, %sort_order, "sorting persons");
    field::sort(persons, sort_by, sort_order)
  }
}
