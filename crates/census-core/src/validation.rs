//! Field-level validation of inbound requests.

use crate::{
  Error, Result,
  country::CountryAddRequest,
  person::{PersonAddRequest, PersonUpdateRequest},
};

/// A request shape that can check its own fields before it reaches storage.
pub trait Validate {
  fn validate(&self) -> Result<()>;
}

impl Validate for CountryAddRequest {
  fn validate(&self) -> Result<()> {
    require("country_name", self.country_name.as_deref())
  }
}

impl Validate for PersonAddRequest {
  fn validate(&self) -> Result<()> {
    require("person_name", self.person_name.as_deref())?;
    if let Some(email) = self.email.as_deref() {
      check_email(email)?;
    }
    Ok(())
  }
}

impl Validate for PersonUpdateRequest {
  fn validate(&self) -> Result<()> {
    require("person_name", self.person_name.as_deref())?;
    require("email", self.email.as_deref())?;
    self.email.as_deref().map_or(Ok(()), check_email)
  }
}

/// Loose address check: exactly one `@`, with something on either side.
pub fn is_valid_email(email: &str) -> bool {
  match email.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty() && !domain.is_empty() && !domain.contains('@')
    }
    None => false,
  }
}

fn require(field: &str, value: Option<&str>) -> Result<()> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(()),
    _ => Err(Error::InvalidArgument(format!("{field} can't be blank"))),
  }
}

fn check_email(email: &str) -> Result<()> {
  if is_valid_email(email) {
    Ok(())
  } else {
    Err(Error::InvalidArgument(format!(
      "email {email:?} should be a valid email"
    )))
  }
}
