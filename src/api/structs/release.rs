use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Release {
    /// Id of the owning project. Not resolved to a `Project` here.
    pub project_id: String,
    pub version: String,
    pub assembled: DateTime<FixedOffset>,
    #[serde(default)]
    pub release_notes: Option<String>,
    #[serde(default)]
    pub selected_packages: Vec<SelectedPackage>,
}

#[derive(Clone, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SelectedPackage {
    // Older servers only send `StepName`, newer ones send both.
    #[serde(default)]
    pub action_name: Option<String>,
    #[serde(default)]
    pub step_name: Option<String>,
    pub version: String,
}

impl SelectedPackage {
    #[cfg(test)]
    pub fn new(name: &str, version: &str) -> SelectedPackage {
        SelectedPackage {
            action_name: Some(name.to_owned()),
            step_name: None,
            version: version.to_owned(),
        }
    }

    pub fn name(&self) -> &str {
        self.action_name
            .as_deref()
            .or(self.step_name.as_deref())
            .unwrap_or_default()
    }
}

impl Release {
    /// `"<step> <version>"` for each selected package, joined with `"; "`.
    pub fn package_versions(&self) -> String {
        self.selected_packages
            .iter()
            .map(|p| format!("{} {}", p.name(), p.version))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Release notes flattened onto one line, with line breaks written out as
    /// a literal `\n`. Missing notes become an empty string.
    pub fn escaped_release_notes(&self) -> String {
        match self.release_notes.as_deref() {
            Some(notes) => notes
                .replace("\r\n", "\\n")
                .replace(['\n', '\r'], "\\n"),
            None => String::new(),
        }
    }

    pub fn assembled_string(&self) -> String {
        self.assembled.to_rfc3339()
    }

    /// Key/value lines used by the text output.
    pub fn property_lines(&self) -> Vec<String> {
        vec![
            format!("Version: {}", self.version),
            format!("Assembled: {}", self.assembled_string()),
            format!("Package Versions: {}", self.package_versions()),
            format!("Release Notes: {}", self.escaped_release_notes()),
        ]
    }
}
