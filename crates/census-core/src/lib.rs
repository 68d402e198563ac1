//! Core types, repository traits and services for the Census registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`repository::CountriesRepository`] and
//! [`repository::PersonsRepository`]; the services in [`service`] are generic
//! over them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod country;
pub mod error;
pub mod field;
pub mod memory;
pub mod person;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{Error, Result};
