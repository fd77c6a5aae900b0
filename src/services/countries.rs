//! Country lookups used by the analysis pages

use super::repository::{CountryRepository, RepositoryError};
use crate::model::Country;
use std::sync::Arc;

/// Fetch the countries behind a set of selected ids
#[derive(Clone)]
pub struct GetCountriesByIdsUseCase {
    repository: Arc<dyn CountryRepository>,
}

impl GetCountriesByIdsUseCase {
    pub fn new(repository: Arc<dyn CountryRepository>) -> Self {
        Self { repository }
    }

    /// An empty id list never reaches the repository
    pub fn execute(&self, ids: &[String]) -> Result<Vec<Country>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.repository.get_by_ids(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::repository::tests::sample_repository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRepository {
        calls: AtomicUsize,
    }

    impl CountryRepository for CountingRepository {
        fn get_by_ids(&self, _ids: &[String]) -> Result<Vec<Country>, RepositoryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        fn get_roots(&self, _root_ids: &[String]) -> Result<Vec<Country>, RepositoryError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_empty_ids_skip_repository() {
        let repository = Arc::new(CountingRepository {
            calls: AtomicUsize::new(0),
        });
        let use_case = GetCountriesByIdsUseCase::new(repository.clone());

        assert!(use_case.execute(&[]).unwrap().is_empty());
        assert_eq!(repository.calls.load(Ordering::SeqCst), 0);

        use_case.execute(&["x".to_string()]).unwrap();
        assert_eq!(repository.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delegates_to_repository() {
        let use_case = GetCountriesByIdsUseCase::new(Arc::new(sample_repository()));
        let countries = use_case.execute(&["ke".to_string()]).unwrap();

        assert_eq!(countries.len(), 1);
        assert_eq!(countries[0].name, "Kenya");
    }
}
