use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  country::{Country, CountryAddRequest, CountryResponse},
  repository::CountriesRepository,
  validation::Validate as _,
};

/// Add, list and look up countries. Country names are unique.
pub struct CountryService<R> {
  repo: Arc<R>,
}

impl<R> Clone for CountryService<R> {
  fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: CountriesRepository> CountryService<R> {
  pub fn new(repo: Arc<R>) -> Self { Self { repo } }

  /// Validate and store a new country under a fresh id.
  ///
  /// Fails with [`Error::NullArgument`] when `request` is `None`,
  /// [`Error::InvalidArgument`] when the name is blank and
  /// [`Error::DuplicateEntity`] when the name is already taken.
  pub async fn add_country(
    &self,
    request: Option<CountryAddRequest>,
  ) -> Result<CountryResponse> {
    let request = request.ok_or(Error::NullArgument("country add request"))?;
    request.validate().inspect_err(|e| warn!("rejected country: {e}"))?;

    let country_name = request.country_name.unwrap_or_default();
    let added = self
      .repo
      .add_country(Country {
        country_id:   Uuid::new_v4(),
        country_name: country_name.clone(),
      })
      .await
      .map_err(Error::repository)?;
    let Some(country) = added else {
      warn!(%country_name, "country already added");
      return Err(Error::DuplicateEntity(format!(
        "country {country_name:?} already added"
      )));
    };

    info!(country_id = %country.country_id, country_name = %country.country_name, "country added");
    Ok(country.into())
  }

  pub async fn get_all_countries(&self) -> Result<Vec<CountryResponse>> {
    let countries =
      self.repo.get_all_countries().await.map_err(Error::repository)?;
    Ok(countries.into_iter().map(CountryResponse::from).collect())
  }

  /// A missing or unknown id yields `Ok(None)`.
  pub async fn get_country_by_id(
    &self,
    id: Option<Uuid>,
  ) -> Result<Option<CountryResponse>> {
    let Some(id) = id else {
      return Ok(None);
    };
    let country =
      self.repo.get_country_by_id(id).await.map_err(Error::repository)?;
    if country.is_none() {
      debug!(%id, "country not found");
    }
    Ok(country.map(CountryResponse::from))
  }

  /// Country names keyed by id, for projecting many persons at once.
  pub(crate) async fn names_by_id(&self) -> Result<HashMap<Uuid, String>> {
    Ok(
      self
        .get_all_countries()
        .await?
        .into_iter()
        .map(|c| (c.country_id, c.country_name))
        .collect(),
    )
  }
}
