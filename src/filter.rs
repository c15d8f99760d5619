use clap::ValueEnum;
use std::collections::{BTreeMap, HashSet};

use crate::api::structs::{Project, Release};

/// Set of project names to restrict a query to, compared case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct ProjectFilter {
    // Lowercased name -> first spelling we were given.
    names: BTreeMap<String, String>,
}

impl ProjectFilter {
    pub fn new() -> ProjectFilter {
        ProjectFilter::default()
    }

    /// Add a project name. Names already present, ignoring case, are skipped.
    pub fn add(&mut self, name: &str) {
        self.names
            .entry(name.to_lowercase())
            .or_insert_with(|| name.to_owned());
    }

    pub fn names(&self) -> Vec<String> {
        self.names.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ProjectFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut filter = ProjectFilter::new();
        for name in iter {
            filter.add(name.as_ref());
        }
        filter
    }
}

/// What an empty `ProjectFilter` should select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum EmptyFilterPolicy {
    /// List releases for every project.
    #[default]
    All,
    /// List nothing.
    None,
}

/// Predicate handed to the release repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseFilter {
    All,
    ByIds(HashSet<String>),
}

impl ReleaseFilter {
    pub fn for_projects(projects: &[Project]) -> ReleaseFilter {
        ReleaseFilter::ByIds(projects.iter().map(|p| p.id.clone()).collect())
    }

    pub fn matches(&self, release: &Release) -> bool {
        match self {
            ReleaseFilter::All => true,
            ReleaseFilter::ByIds(ids) => ids.contains(&release.project_id),
        }
    }
}
