//! Handlers for `/persons` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons` | `?search_by=&search_string=&sort_by=&sort_order=` |
//! | `GET`    | `/persons/search-fields` | Field names with labels |
//! | `POST`   | `/persons` | Returns 201 |
//! | `GET`    | `/persons/:id` | 404 if not found |
//! | `PUT`    | `/persons/:id` | Full replacement; the path id wins |
//! | `DELETE` | `/persons/:id` | 204, or 404 if nothing was deleted |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use census_core::{
  field::{PersonField, SortOrder},
  person::{PersonAddRequest, PersonResponse, PersonUpdateRequest},
  repository::{CountriesRepository, PersonsRepository},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Query types ──────────────────────────────────────────────────────────────

/// Query string for `GET /persons`. Unknown field or order names are ignored
/// rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub search_by:     Option<String>,
  pub search_string: Option<String>,
  pub sort_by:       Option<String>,
  pub sort_order:    Option<String>,
}

impl ListParams {
  fn search_by(&self) -> Option<PersonField> {
    self.search_by.as_deref().and_then(PersonField::parse)
  }

  /// Defaults to [`PersonField::PersonName`] when absent.
  fn sort_by(&self) -> Option<PersonField> {
    match self.sort_by.as_deref() {
      None => Some(PersonField::PersonName),
      Some(name) => PersonField::parse(name),
    }
  }

  fn sort_order(&self) -> SortOrder {
    self
      .sort_order
      .as_deref()
      .and_then(|s| s.parse().ok())
      .unwrap_or_default()
  }
}

#[derive(Debug, Serialize)]
pub struct SearchField {
  pub field: PersonField,
  pub label: &'static str,
}

// ─── Handlers ─────────────────────────────────────────────────────────────────

/// `GET /persons`: filter, then sort.
pub async fn list<P, C>(
  State(state): State<AppState<P, C>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<PersonResponse>>, ApiError>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  let filtered = state
    .persons
    .get_filtered_persons(params.search_by(), params.search_string.as_deref())
    .await?;
  let sorted = state.persons.get_sorted_persons(
    filtered,
    params.sort_by(),
    params.sort_order(),
  );
  Ok(Json(sorted))
}

/// `GET /persons/search-fields`
pub async fn search_fields() -> Json<Vec<SearchField>> {
  Json(
    PersonField::search_fields()
      .into_iter()
      .map(|(field, label)| SearchField { field, label })
      .collect(),
  )
}

/// `POST /persons`
pub async fn create<P, C>(
  State(state): State<AppState<P, C>>,
  Json(body): Json<PersonAddRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  let person = state.persons.add_person(Some(body)).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /persons/:id`
pub async fn get_one<P, C>(
  State(state): State<AppState<P, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PersonResponse>, ApiError>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  let person = state
    .persons
    .get_person_by_id(Some(id))
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

/// `PUT /persons/:id`. The body carries the add-request fields.
pub async fn update<P, C>(
  State(state): State<AppState<P, C>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PersonAddRequest>,
) -> Result<Json<PersonResponse>, ApiError>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  let request = PersonUpdateRequest {
    person_id:            id,
    person_name:          body.person_name,
    email:                body.email,
    date_of_birth:        body.date_of_birth,
    gender:               body.gender,
    country_id:           body.country_id,
    address:              body.address,
    receive_news_letters: body.receive_news_letters,
  };
  Ok(Json(state.persons.update_person(Some(request)).await?))
}

/// `DELETE /persons/:id`
pub async fn delete<P, C>(
  State(state): State<AppState<P, C>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  if state.persons.delete_person(Some(id)).await? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("person {id} not found")))
  }
}
