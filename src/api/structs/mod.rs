use serde::Deserialize;
use serde_aux::prelude::deserialize_default_from_null;
use std::collections::HashMap;

pub mod release;
pub use crate::api::structs::release::{Release, SelectedPackage};

/// A project as returned by `/api/projects`. Only the fields we render are
/// deserialised.
#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Project {
    pub id: String,
    pub name: String,
}

impl Project {
    /// Placeholder for a project id the server didn't give us a record for.
    pub fn unnamed(id: &str) -> Project {
        Project {
            id: id.to_owned(),
            name: id.to_owned(),
        }
    }
}

/// Paged envelope Octopus wraps every list endpoint in.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceCollection<T> {
    pub items: Vec<T>,
    /// Page size the server used. Zero if it didn't say.
    #[serde(default)]
    pub items_per_page: usize,
    pub total_results: usize,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub links: HashMap<String, String>,
}

impl<T> ResourceCollection<T> {
    pub fn next_page(&self) -> Option<&str> {
        self.links.get("Page.Next").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialises_project_ignoring_extra_fields() {
        let project: Project = serde_json::from_str(
            r#"{"Id":"Projects-1","Name":"Alpha","Slug":"alpha","IsDisabled":false}"#,
        )
        .unwrap();

        assert_eq!(project.id, "Projects-1");
        assert_eq!(project.name, "Alpha");
    }

    #[test]
    fn collection_exposes_next_page_link() {
        let page: ResourceCollection<Project> = serde_json::from_str(
            r#"{
                "ItemType": "Project",
                "TotalResults": 31,
                "ItemsPerPage": 30,
                "Items": [{"Id": "Projects-1", "Name": "Alpha"}],
                "Links": {"Self": "/api/projects", "Page.Next": "/api/projects?skip=30&take=30"}
            }"#,
        )
        .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items_per_page, 30);
        assert_eq!(page.total_results, 31);
        assert_eq!(page.next_page(), Some("/api/projects?skip=30&take=30"));
    }

    #[test]
    fn collection_without_links_has_no_next_page() {
        let page: ResourceCollection<Project> = serde_json::from_str(
            r#"{"TotalResults": 0, "ItemsPerPage": 30, "Items": [], "Links": null}"#,
        )
        .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.next_page(), None);
    }
}
