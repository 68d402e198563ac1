//! Person: the stored entity, its add/update requests and its response
//! projection.
//!
//! The projection carries fields that are never stored: the resolved country
//! name and the age derived from the date of birth.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

// ─── Gender ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
  Male,
  Female,
  Other,
}

// ─── Entity ──────────────────────────────────────────────────────────────────

/// A stored person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub person_id:            Uuid,
  pub person_name:          String,
  pub email:                Option<String>,
  pub date_of_birth:        Option<NaiveDate>,
  pub gender:               Option<Gender>,
  /// Weak reference used only to resolve a display name; never checked
  /// against the stored countries.
  pub country_id:           Option<Uuid>,
  pub address:              Option<String>,
  pub receive_news_letters: bool,
}

// ─── Requests ────────────────────────────────────────────────────────────────

/// Input to [`crate::service::PersonService::add_person`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonAddRequest {
  pub person_name:          Option<String>,
  pub email:                Option<String>,
  pub date_of_birth:        Option<NaiveDate>,
  pub gender:               Option<Gender>,
  pub country_id:           Option<Uuid>,
  pub address:              Option<String>,
  #[serde(default)]
  pub receive_news_letters: bool,
}

impl PersonAddRequest {
  /// Build the entity to store. `person_name` must already be validated.
  pub fn into_person(self, person_id: Uuid) -> Person {
    Person {
      person_id,
      person_name: self.person_name.unwrap_or_default(),
      email: self.email,
      date_of_birth: self.date_of_birth,
      gender: self.gender,
      country_id: self.country_id,
      address: self.address,
      receive_news_letters: self.receive_news_letters,
    }
  }
}

/// Input to [`crate::service::PersonService::update_person`]. Every mutable
/// field of the matched person is overwritten with these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonUpdateRequest {
  pub person_id:            Uuid,
  pub person_name:          Option<String>,
  pub email:                Option<String>,
  pub date_of_birth:        Option<NaiveDate>,
  pub gender:               Option<Gender>,
  pub country_id:           Option<Uuid>,
  pub address:              Option<String>,
  #[serde(default)]
  pub receive_news_letters: bool,
}

impl Person {
  /// Overwrite every mutable field from `req`. The id is left untouched.
  pub fn apply_update(&mut self, req: PersonUpdateRequest) {
    self.person_name = req.person_name.unwrap_or_default();
    self.email = req.email;
    self.date_of_birth = req.date_of_birth;
    self.gender = req.gender;
    self.country_id = req.country_id;
    self.address = req.address;
    self.receive_news_letters = req.receive_news_letters;
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

/// The display-oriented projection of a [`Person`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonResponse {
  pub person_id:            Uuid,
  pub person_name:          String,
  pub email:                Option<String>,
  pub date_of_birth:        Option<NaiveDate>,
  pub gender:               Option<Gender>,
  pub country_id:           Option<Uuid>,
  /// Resolved country name, `None` when the reference is absent or dangling.
  pub country:              Option<String>,
  pub address:              Option<String>,
  pub receive_news_letters: bool,
  /// Whole years since `date_of_birth`, computed at projection time.
  pub age:                  Option<f64>,
}

impl PersonResponse {
  /// Project `person` as of `now`, inlining the resolved `country` name.
  pub fn project(
    person: Person,
    country: Option<String>,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      age: person.date_of_birth.map(|dob| age_at(dob, now)),
      person_id: person.person_id,
      person_name: person.person_name,
      email: person.email,
      date_of_birth: person.date_of_birth,
      gender: person.gender,
      country_id: person.country_id,
      country,
      address: person.address,
      receive_news_letters: person.receive_news_letters,
    }
  }

  /// Turn the projection back into an update request, e.g. to prefill an
  /// edit form.
  pub fn to_update_request(&self) -> PersonUpdateRequest {
    PersonUpdateRequest {
      person_id:            self.person_id,
      person_name:          Some(self.person_name.clone()),
      email:                self.email.clone(),
      date_of_birth:        self.date_of_birth,
      gender:               self.gender,
      country_id:           self.country_id,
      address:              self.address.clone(),
      receive_news_letters: self.receive_news_letters,
    }
  }
}

// ─── Age ─────────────────────────────────────────────────────────────────────

const DAYS_PER_YEAR: f64 = 365.25;

/// `round(days_since(dob) / 365.25)` with ties rounded to even.
pub fn age_at(date_of_birth: NaiveDate, now: DateTime<Utc>) -> f64 {
  let born = date_of_birth.and_time(chrono::NaiveTime::MIN).and_utc();
  let days = (now - born).num_seconds() as f64 / 86_400.0;
  (days / DAYS_PER_YEAR).round_ties_even()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn age_rounds_to_nearest_year() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(age_at(date(2000, 1, 1), now), 24.0);
    // 23 years and ten months rounds up.
    assert_eq!(age_at(date(2000, 3, 1), now), 24.0);
    // 23 years and two months rounds down.
    assert_eq!(age_at(date(2000, 11, 1), now), 23.0);
  }

  #[test]
  fn projection_without_birth_date_has_no_age() {
    let person = PersonAddRequest {
      person_name: Some("Yor Forger".into()),
      ..Default::default()
    }
    .into_person(Uuid::new_v4());

    let resp = PersonResponse::project(person, None, Utc::now());
    assert!(resp.age.is_none());
    assert!(resp.country.is_none());
  }

  #[test]
  fn update_request_roundtrips_projection_fields() {
    let person = PersonAddRequest {
      person_name: Some("Loid Forger".into()),
      email: Some("loid@wise.example".into()),
      gender: Some(Gender::Male),
      receive_news_letters: true,
      ..Default::default()
    }
    .into_person(Uuid::new_v4());
    let id = person.person_id;

    let req = PersonResponse::project(person, Some("Westalis".into()), Utc::now())
      .to_update_request();
    assert_eq!(req.person_id, id);
    assert_eq!(req.person_name.as_deref(), Some("Loid Forger"));
    assert_eq!(req.gender, Some(Gender::Male));
    assert!(req.receive_news_letters);
  }

  #[test]
  fn gender_parses_case_insensitively() {
    assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
    assert_eq!(Gender::Other.to_string(), "Other");
    assert!("unknown".parse::<Gender>().is_err());
  }
}
