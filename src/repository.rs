use async_trait::async_trait;

use crate::api::structs::{Project, Release};
use crate::error::Result;

/// Predicate used to pick releases out of everything the server has.
pub type ReleasePredicate<'a> = &'a (dyn Fn(&Release) -> bool + Send + Sync);

#[async_trait]
pub trait ProjectRepository {
    /// Projects whose name matches one of `names`, ignoring case. Names with
    /// no match are skipped.
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Project>>;

    /// Projects with one of the given ids. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Project>>;
}

#[async_trait]
pub trait ReleaseRepository {
    /// Every release `predicate` accepts, in the order the server returns them.
    async fn find_many(&self, predicate: ReleasePredicate<'_>) -> Result<Vec<Release>>;
}

pub trait Repository: ProjectRepository + ReleaseRepository + Sync {}

impl<T: ProjectRepository + ReleaseRepository + Sync> Repository for T {}

#[cfg(test)]
pub mod memory {
    use super::*;
    use crate::api::projects_named;
    use crate::error::Error;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory stand-in for the Octopus API.
    #[derive(Default)]
    pub struct MemoryRepository {
        pub projects: Vec<Project>,
        pub releases: Vec<Release>,
        pub fail_releases: bool,
        pub name_lookups: AtomicUsize,
        pub release_fetches: AtomicUsize,
    }

    impl MemoryRepository {
        pub fn new(projects: Vec<Project>, releases: Vec<Release>) -> MemoryRepository {
            MemoryRepository {
                projects,
                releases,
                ..Default::default()
            }
        }

        pub fn name_lookups(&self) -> usize {
            self.name_lookups.load(Ordering::SeqCst)
        }

        pub fn release_fetches(&self) -> usize {
            self.release_fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProjectRepository for MemoryRepository {
        async fn find_by_names(&self, names: &[String]) -> Result<Vec<Project>> {
            self.name_lookups.fetch_add(1, Ordering::SeqCst);
            Ok(projects_named(self.projects.clone(), names))
        }

        async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Project>> {
            Ok(self
                .projects
                .iter()
                .filter(|p| ids.contains(&p.id))
                .cloned()
                .collect())
        }
    }

    #[async_trait]
    impl ReleaseRepository for MemoryRepository {
        async fn find_many(&self, predicate: ReleasePredicate<'_>) -> Result<Vec<Release>> {
            self.release_fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_releases {
                return Err(Error::Api {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    body: "maintenance".to_owned(),
                });
            }

            Ok(self
                .releases
                .iter()
                .filter(|r| predicate(*r))
                .cloned()
                .collect())
        }
    }
}
