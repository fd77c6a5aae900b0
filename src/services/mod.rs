//! External service interactions
//!
//! This module contains services for reading analysis data:
//! - Country repository over organisation unit metadata
//! - Country lookup use-case
//! - Background fetch execution

pub mod countries;
pub mod fetcher;
pub mod repository;

pub use countries::GetCountriesByIdsUseCase;
pub use fetcher::Fetcher;
pub use repository::{
    CountryRepository, InMemoryCountryRepository, JsonCountryRepository, RepositoryError,
};
