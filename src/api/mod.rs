use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod structs;
use crate::api::structs::*;
use crate::error::{Error, Result};
use crate::repository::{ProjectRepository, ReleasePredicate, ReleaseRepository};

/// How many releases to ask for per page.
const RELEASES_PAGE_SIZE: usize = 100;

/// Connection settings for an Octopus server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server: String,
    pub api_key: Option<String>,
    pub space: Option<String>,
    pub timeout: Duration,
}

pub struct Api {
    client: Client,
    base: String,
    space: Option<String>,
}

impl Api {
    pub fn new(config: &ServerConfig) -> Result<Api> {
        let base = config.server.trim_end_matches('/');
        match Url::parse(base) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => (),
            _ => return Err(Error::InvalidServerUrl(config.server.clone())),
        }

        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| Error::InvalidApiKey)?;
            headers.insert("X-Octopus-ApiKey", value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Api {
            client,
            base: base.to_owned(),
            space: config.space.clone().filter(|s| !s.is_empty()),
        })
    }

    /// Absolute URL for a path under `/api`, scoped to the space if one is set.
    fn api_path(&self, path: &str) -> String {
        match &self.space {
            Some(space) => format!("{}/api/{space}/{path}", self.base),
            None => format!("{}/api/{path}", self.base),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.api_path(path))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        Ok(res.json::<T>().await?)
    }

    pub async fn get_all_projects(&self) -> Result<Vec<Project>> {
        debug!("Loading all projects");
        self.send(self.get("projects/all")).await
    }

    async fn get_releases_page(&self, skip: usize) -> Result<ResourceCollection<Release>> {
        trace!("Loading releases from {skip}");
        self.send(
            self.get("releases")
                .query(&[("skip", skip), ("take", RELEASES_PAGE_SIZE)]),
        )
        .await
    }
}

/// Whether `page`, fetched starting at `skip`, is the final one.
fn is_last_page<T>(page: &ResourceCollection<T>, skip: usize) -> bool {
    let fetched = page.items.len();
    fetched == 0
        || (page.items_per_page > 0 && fetched < page.items_per_page)
        || page.next_page().is_none()
        || skip + fetched >= page.total_results
}

/// Projects whose name matches one of `names`, compared the same way
/// `ProjectFilter` dedups them. Keeps the order of `projects`.
pub fn projects_named(projects: Vec<Project>, names: &[String]) -> Vec<Project> {
    let wanted = names.iter().map(|n| n.to_lowercase()).collect::<Vec<_>>();
    projects
        .into_iter()
        .filter(|p| wanted.contains(&p.name.to_lowercase()))
        .collect()
}

#[async_trait]
impl ProjectRepository for Api {
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Project>> {
        let projects = projects_named(self.get_all_projects().await?, names);

        debug!("Matched {} of {} project names", projects.len(), names.len());
        Ok(projects)
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Project>> {
        Ok(self
            .get_all_projects()
            .await?
            .into_iter()
            .filter(|p| ids.contains(&p.id))
            .collect())
    }
}

#[async_trait]
impl ReleaseRepository for Api {
    async fn find_many(&self, predicate: ReleasePredicate<'_>) -> Result<Vec<Release>> {
        let mut skip = 0;
        let mut releases = Vec::new();

        loop {
            let page = self.get_releases_page(skip).await?;
            let last = is_last_page(&page, skip);

            skip += page.items.len();
            releases.extend(page.items.into_iter().filter(|r| predicate(r)));

            if last {
                break;
            }
        }

        debug!("Kept {} of {skip} releases", releases.len());
        Ok(releases)
    }
}
