//! Country and person services: validation, uniqueness and projection on
//! top of the repository traits.

mod country;
mod person;

pub use country::CountryService;
pub use person::PersonService;
