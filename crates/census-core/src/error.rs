//! Error types for `census-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// The request object itself was not supplied.
  #[error("missing argument: {0}")]
  NullArgument(&'static str),

  /// A required field is missing or malformed.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("duplicate entity: {0}")]
  DuplicateEntity(String),

  /// An update targeted an id that is not stored. Reported to callers as an
  /// argument error; reads and deletes use `None`/`false` instead.
  #[error("person {0} does not exist")]
  NotFound(Uuid),

  #[error("repository error: {0}")]
  Repository(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn repository<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Repository(Box::new(e))
  }

  /// `true` for every variant caused by the caller's input rather than by
  /// the storage layer or a uniqueness clash.
  pub fn is_argument_error(&self) -> bool {
    matches!(
      self,
      Self::NullArgument(_) | Self::InvalidArgument(_) | Self::NotFound(_)
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
