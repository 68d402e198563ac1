//! [`SqliteStore`]: the SQLite implementation of the repository traits.

use std::path::Path;

use census_core::{
  country::Country,
  person::Person,
  repository::{CountriesRepository, PersonsRepository},
};
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{RawCountry, RawPerson, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Census store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row `persons` query keyed by one text parameter.
  async fn query_person(
    &self,
    filter: &'static str,
    param: String,
  ) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM persons WHERE {filter} ORDER BY seq LIMIT 1",
          RawPerson::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![param], RawPerson::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn query_country(
    &self,
    filter: &'static str,
    param: String,
  ) -> Result<Option<Country>> {
    let raw: Option<RawCountry> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM countries WHERE {filter}",
          RawCountry::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![param], RawCountry::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCountry::into_country).transpose()
  }
}

// ─── CountriesRepository impl ────────────────────────────────────────────────

impl CountriesRepository for SqliteStore {
  type Error = Error;

  async fn add_country(&self, country: Country) -> Result<Option<Country>> {
    let id_str = encode_uuid(country.country_id);
    let name = country.country_name.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO countries (country_id, country_name) VALUES (?1, ?2)
           ON CONFLICT (country_name) DO NOTHING",
          rusqlite::params![id_str, name],
        )?)
      })
      .await?;

    if inserted == 0 {
      debug!(country_name = %country.country_name, "country name taken");
      return Ok(None);
    }
    debug!(country_id = %country.country_id, "country row inserted");
    Ok(Some(country))
  }

  async fn get_all_countries(&self) -> Result<Vec<Country>> {
    let raws: Vec<RawCountry> = self
      .conn
      .call(|conn| {
        let sql =
          format!("SELECT {} FROM countries ORDER BY seq", RawCountry::COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawCountry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCountry::into_country).collect()
  }

  async fn get_country_by_id(&self, id: Uuid) -> Result<Option<Country>> {
    self.query_country("country_id = ?1", encode_uuid(id)).await
  }

  async fn get_country_by_name(&self, name: &str) -> Result<Option<Country>> {
    self.query_country("country_name = ?1", name.to_owned()).await
  }
}

// ─── PersonsRepository impl ──────────────────────────────────────────────────

impl PersonsRepository for SqliteStore {
  type Error = Error;

  async fn add_person(&self, person: Person) -> Result<Option<Person>> {
    let raw = RawPerson::from_person(&person);

    // Names are not UNIQUE in the schema since updates may duplicate them,
    // so the check rides along with the insert.
    let inserted = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "INSERT INTO persons ({})
           SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8
           WHERE NOT EXISTS (SELECT 1 FROM persons WHERE person_name = ?2)",
          RawPerson::COLUMNS
        );
        Ok(conn.execute(
          &sql,
          rusqlite::params![
            raw.person_id,
            raw.person_name,
            raw.email,
            raw.date_of_birth,
            raw.gender,
            raw.country_id,
            raw.address,
            raw.receive_news_letters,
          ],
        )?)
      })
      .await?;

    if inserted == 0 {
      debug!(person_name = %person.person_name, "person name taken");
      return Ok(None);
    }
    debug!(person_id = %person.person_id, "person row inserted");
    Ok(Some(person))
  }

  async fn get_all_persons(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let sql =
          format!("SELECT {} FROM persons ORDER BY seq", RawPerson::COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn get_person_by_id(&self, id: Uuid) -> Result<Option<Person>> {
    self.query_person("person_id = ?1", encode_uuid(id)).await
  }

  async fn get_person_by_name(&self, name: &str) -> Result<Option<Person>> {
    self.query_person("person_name = ?1", name.to_owned()).await
  }

  async fn update_person(&self, person: Person) -> Result<Option<Person>> {
    let raw = RawPerson::from_person(&person);

    let changed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "UPDATE persons SET
             person_name = ?2, email = ?3, date_of_birth = ?4, gender = ?5,
             country_id = ?6, address = ?7, receive_news_letters = ?8
           WHERE person_id = ?1",
          rusqlite::params![
            raw.person_id,
            raw.person_name,
            raw.email,
            raw.date_of_birth,
            raw.gender,
            raw.country_id,
            raw.address,
            raw.receive_news_letters,
          ],
        )?;
        Ok(n)
      })
      .await?;

    Ok((changed > 0).then_some(person))
  }

  async fn delete_person_by_id(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM persons WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(deleted > 0)
  }
}
