//! Field dispatch for filtering and sorting person projections.
//!
//! Callers name a [`PersonField`]; each field maps to a predicate for
//! [`filter`] and a comparator for [`sort`]. Fields without a predicate or
//! comparator leave the input untouched, as does a missing field.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator as _};

use crate::person::PersonResponse;

/// Rendering used when matching a search string against a date of birth,
/// e.g. `05 January 90`.
pub const DATE_OF_BIRTH_SEARCH_FORMAT: &str = "%d %B %y";

// ─── Field ───────────────────────────────────────────────────────────────────

/// A named field of [`PersonResponse`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
  EnumIter,
)]
pub enum PersonField {
  PersonName,
  Email,
  DateOfBirth,
  Age,
  Gender,
  #[strum(to_string = "Country", serialize = "CountryId")]
  Country,
  Address,
  ReceiveNewsLetters,
}

impl PersonField {
  /// Parse a field name, mapping unknown names to `None` so callers fall
  /// back to unfiltered, unsorted output.
  pub fn parse(name: &str) -> Option<Self> { name.parse().ok() }

  pub fn is_searchable(self) -> bool {
    !matches!(self, Self::Age | Self::ReceiveNewsLetters)
  }

  pub fn is_sortable(self) -> bool { !matches!(self, Self::Address) }

  /// Human-readable label for search pickers.
  pub fn label(self) -> &'static str {
    match self {
      Self::PersonName => "Person Name",
      Self::Email => "Email",
      Self::DateOfBirth => "Date of Birth",
      Self::Age => "Age",
      Self::Gender => "Gender",
      Self::Country => "Country",
      Self::Address => "Address",
      Self::ReceiveNewsLetters => "Receive News Letters",
    }
  }

  /// Every searchable field with its label, in display order.
  pub fn search_fields() -> Vec<(Self, &'static str)> {
    Self::iter()
      .filter(|f| f.is_searchable())
      .map(|f| (f, f.label()))
      .collect()
  }

  /// Whether `person` matches `needle`, which must already be lowercase.
  /// A missing field value always matches. Returns `None` for fields that
  /// cannot be searched.
  fn matches(self, person: &PersonResponse, needle: &str) -> Option<bool> {
    let hit = match self {
      Self::PersonName => contains(Some(person.person_name.as_str()), needle),
      Self::Email => contains(person.email.as_deref(), needle),
      Self::Country => contains(person.country.as_deref(), needle),
      Self::Address => contains(person.address.as_deref(), needle),
      Self::Gender => person
        .gender
        .is_none_or(|g| g.as_ref().to_lowercase() == needle),
      Self::DateOfBirth => person.date_of_birth.is_none_or(|dob| {
        dob
          .format(DATE_OF_BIRTH_SEARCH_FORMAT)
          .to_string()
          .to_lowercase()
          .contains(needle)
      }),
      Self::Age | Self::ReceiveNewsLetters => return None,
    };
    Some(hit)
  }

  /// Ordering of `a` relative to `b` on this field. Returns `None` for
  /// fields that cannot be sorted.
  fn compare(self, a: &PersonResponse, b: &PersonResponse) -> Option<Ordering> {
    let ord = match self {
      Self::PersonName => cmp_ignore_case(
        Some(a.person_name.as_str()),
        Some(b.person_name.as_str()),
      ),
      Self::Email => cmp_ignore_case(a.email.as_deref(), b.email.as_deref()),
      Self::Gender => cmp_ignore_case(
        a.gender.as_ref().map(AsRef::as_ref),
        b.gender.as_ref().map(AsRef::as_ref),
      ),
      Self::Country => {
        cmp_ignore_case(a.country.as_deref(), b.country.as_deref())
      }
      Self::DateOfBirth => a.date_of_birth.cmp(&b.date_of_birth),
      Self::Age => cmp_age(a.age, b.age),
      Self::ReceiveNewsLetters => {
        a.receive_news_letters.cmp(&b.receive_news_letters)
      }
      Self::Address => return None,
    };
    Some(ord)
  }
}

// ─── Sort order ──────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum SortOrder {
  #[default]
  #[serde(rename = "ASC")]
  #[strum(serialize = "ASC")]
  Asc,
  #[serde(rename = "DESC")]
  #[strum(serialize = "DESC")]
  Desc,
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

/// Keep the persons matching `search_string` on `search_by`.
///
/// The input is returned unchanged when no field is given, the field is not
/// searchable, or the search string is empty.
pub fn filter(
  persons: Vec<PersonResponse>,
  search_by: Option<PersonField>,
  search_string: Option<&str>,
) -> Vec<PersonResponse> {
  let (Some(field), Some(needle)) = (search_by, search_string) else {
    return persons;
  };
  if needle.is_empty() || !field.is_searchable() {
    return persons;
  }

  let needle = needle.to_lowercase();
  persons
    .into_iter()
    .filter(|p| field.matches(p, &needle).unwrap_or(true))
    .collect()
}

/// Stable-sort `persons` by `sort_by`. Without a field, or for a field with
/// no ordering, the input is returned unchanged.
pub fn sort(
  mut persons: Vec<PersonResponse>,
  sort_by: Option<PersonField>,
  order: SortOrder,
) -> Vec<PersonResponse> {
  let Some(field) = sort_by.filter(|f| f.is_sortable()) else {
    return persons;
  };
  let cmp = |a: &PersonResponse, b: &PersonResponse| {
    field.compare(a, b).unwrap_or(Ordering::Equal)
  };
  match order {
    SortOrder::Asc => persons.sort_by(|a, b| cmp(a, b)),
    SortOrder::Desc => persons.sort_by(|a, b| cmp(b, a)),
  }
  persons
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn contains(haystack: Option<&str>, needle: &str) -> bool {
  haystack.is_none_or(|h| h.to_lowercase().contains(needle))
}

/// Ordinal comparison of the upper-cased strings; `None` sorts first.
fn cmp_ignore_case(a: Option<&str>, b: Option<&str>) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => a.to_uppercase().cmp(&b.to_uppercase()),
    (a, b) => a.is_some().cmp(&b.is_some()),
  }
}

fn cmp_age(a: Option<f64>, b: Option<f64>) -> Ordering {
  match (a, b) {
    (Some(a), Some(b)) => a.total_cmp(&b),
    (a, b) => a.is_some().cmp(&b.is_some()),
  }
}
