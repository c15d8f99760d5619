use clap::Args as ClapArgs;
use serde::Serialize;
use std::collections::HashSet;
use std::future::Future;

use crate::api::structs::{Project, Release};
use crate::api::Api;
use crate::cmds::ServerArgs;
use crate::error::{Error, Result};
use crate::filter::{EmptyFilterPolicy, ProjectFilter, ReleaseFilter};
use crate::output::{FormattedOutput, OutputFormat};
use crate::repository::Repository;

/// List releases, grouped by project.
#[derive(Debug, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    /// Name of a project to filter by. Can be specified many times.
    #[arg(long = "project", value_name = "NAME")]
    pub projects: Vec<String>,

    /// Format to print the releases in.
    #[arg(short, long, value_enum, default_value_t, env = "OCTOPUS_OUTPUT_FORMAT")]
    pub output_format: OutputFormat,

    /// What to list when no `--project` is given.
    #[arg(long, value_enum, default_value_t)]
    pub unfiltered: EmptyFilterPolicy,
}

/// A release query that hasn't run yet.
#[derive(Debug)]
pub struct ListReleases {
    filter: ProjectFilter,
    policy: EmptyFilterPolicy,
}

/// Everything a query fetched, ready to render.
#[derive(Debug, Default)]
pub struct ResultSet {
    pub projects: Vec<Project>,
    pub releases: Vec<Release>,
}

impl ListReleases {
    pub fn new(filter: ProjectFilter, policy: EmptyFilterPolicy) -> ListReleases {
        ListReleases { filter, policy }
    }

    fn release_filter(&self, projects: &[Project]) -> ReleaseFilter {
        match (self.filter.is_empty(), self.policy) {
            (true, EmptyFilterPolicy::All) => ReleaseFilter::All,
            (true, EmptyFilterPolicy::None) => ReleaseFilter::ByIds(HashSet::new()),
            (false, _) => ReleaseFilter::for_projects(projects),
        }
    }

    /// Resolve the project filter and fetch matching releases. Nothing is
    /// cached between calls.
    pub async fn query<R: Repository + ?Sized>(&self, repo: &R) -> Result<ResultSet> {
        let mut projects = Vec::new();
        if !self.filter.is_empty() {
            debug!("Loading {} projects...", self.filter.len());
            projects = repo.find_by_names(&self.filter.names()).await?;
        }

        let filter = self.release_filter(&projects);
        if matches!(&filter, ReleaseFilter::ByIds(ids) if ids.is_empty()) {
            debug!("No projects to list releases for");
            return Ok(ResultSet {
                projects,
                releases: vec![],
            });
        }

        debug!("Loading releases...");
        let releases = repo
            .find_many(&|r: &Release| filter.matches(r))
            .await?;

        if filter == ReleaseFilter::All {
            projects = referenced_projects(repo, &releases).await?;
        }

        Ok(ResultSet { projects, releases })
    }
}

/// Projects owning at least one of `releases`, in order of first appearance.
async fn referenced_projects<R: Repository + ?Sized>(
    repo: &R,
    releases: &[Release],
) -> Result<Vec<Project>> {
    let mut seen = HashSet::new();
    let ids = releases
        .iter()
        .filter(|r| seen.insert(r.project_id.as_str()))
        .map(|r| r.project_id.clone())
        .collect::<Vec<_>>();
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let found = repo.find_by_ids(&ids).await?;
    Ok(ids
        .iter()
        .map(|id| {
            found
                .iter()
                .find(|p| &p.id == id)
                .cloned()
                .unwrap_or_else(|| {
                    warn!("No project found for id {id}");
                    Project::unnamed(id)
                })
        })
        .collect())
}

impl ResultSet {
    pub fn releases_for<'a>(&'a self, project: &'a Project) -> impl Iterator<Item = &'a Release> {
        self.releases
            .iter()
            .filter(move |r| r.project_id == project.id)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ProjectReleasesJson<'a> {
    name: &'a str,
    releases: Vec<ReleaseJson<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ReleaseJson<'a> {
    version: &'a str,
    assembled: String,
    package_versions: String,
    release_notes: String,
}

impl<'a> From<&'a Release> for ReleaseJson<'a> {
    fn from(r: &'a Release) -> Self {
        ReleaseJson {
            version: &r.version,
            assembled: r.assembled_string(),
            package_versions: r.package_versions(),
            release_notes: r.escaped_release_notes(),
        }
    }
}

impl FormattedOutput for ResultSet {
    fn default_output(&self) -> Result<String> {
        let mut lines = vec![format!("Releases: {}", self.releases.len())];
        for project in &self.projects {
            lines.push(format!(" - Project: {}", project.name));

            for release in self.releases_for(project) {
                lines.extend(release.property_lines().iter().map(|p| format!("    {p}")));
                lines.push(String::new());
            }
        }

        Ok(lines.join("\n"))
    }

    fn json_output(&self) -> Result<String> {
        let projects = self
            .projects
            .iter()
            .map(|project| ProjectReleasesJson {
                name: &project.name,
                releases: self.releases_for(project).map(ReleaseJson::from).collect(),
            })
            .collect::<Vec<_>>();

        Ok(serde_json::to_string_pretty(&projects)?)
    }
}

/// Run `list` against `repo`, failing with `Error::Cancelled` if `cancel`
/// completes first. Cancellation is checked before each poll of the query.
pub async fn run_query<R, F>(list: &ListReleases, repo: &R, cancel: F) -> Result<ResultSet>
where
    R: Repository + ?Sized,
    F: Future<Output = ()>,
{
    tokio::select! {
        biased;

        _ = cancel => Err(Error::Cancelled),
        res = list.query(repo) => res,
    }
}

pub async fn command(
    Args {
        server,
        projects,
        output_format,
        unfiltered,
    }: Args,
) -> Result<(), Box<dyn std::error::Error>> {
    if server.timeout == 0 {
        bail!("`--timeout` must be at least one second");
    }

    let api = Api::new(&server.config())?;
    let list = ListReleases::new(projects.into_iter().collect(), unfiltered);

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Can't listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };
    let results = run_query(&list, &api, ctrl_c).await?;

    println!("{}", output_format.render(&results)?);

    Ok(())
}
