//! Handlers for `/countries` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/countries` | Insertion order |
//! | `POST` | `/countries` | Body: `{"country_name":"..."}`; returns 201 |
//! | `GET`  | `/countries/:id` | 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use census_core::{
  country::{CountryAddRequest, CountryResponse},
  repository::{CountriesRepository, PersonsRepository},
};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// `GET /countries`
pub async fn list<P, C>(
  State(state): State<AppState<P, C>>,
) -> Result<Json<Vec<CountryResponse>>, ApiError>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  Ok(Json(state.countries.get_all_countries().await?))
}

/// `POST /countries`: returns 201 + the stored country.
pub async fn create<P, C>(
  State(state): State<AppState<P, C>>,
  Json(body): Json<CountryAddRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  let country = state.countries.add_country(Some(body)).await?;
  Ok((StatusCode::CREATED, Json(country)))
}

/// `GET /countries/:id`
pub async fn get_one<P, C>(
  State(state): State<AppState<P, C>>,
  Path(id): Path<Uuid>,
) -> Result<Json<CountryResponse>, ApiError>
where
  P: PersonsRepository,
  C: CountriesRepository,
{
  let country = state
    .countries
    .get_country_by_id(Some(id))
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("country {id} not found")))?;
  Ok(Json(country))
}
