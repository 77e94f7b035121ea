use crate::config::DEFAULT_CONFIG_PATH;
use crate::gitlab::{Labels, DEFAULT_SINCE_DAYS};
use crate::sonar::{DEFAULT_ALM_SETTING, DEFAULT_VISIBILITY};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

// Boolean options take an explicit `true`/`false` (`--flag=false`), a bare
// `--flag` means `true`, and anything else is rejected by clap.

#[derive(Parser, Debug)]
#[command(name = "gitlab-groups", version, about = "Report projects of a GitLab group and all its subgroups")]
pub struct ExplorerCli {
    /// YAML file with gitlab_url, private_token and group_path
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Report shape; repeat to print several
    #[arg(long, value_enum)]
    pub output: Vec<OutputFormat>,

    /// Print projects active within the last --since days
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub activity: bool,

    /// Activity window in days
    #[arg(long, default_value_t = DEFAULT_SINCE_DAYS)]
    pub since: u32,

    /// Label language of the text report
    #[arg(long, value_enum, default_value_t = Lang::En)]
    pub lang: Lang,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Nested JSON tree
    Json,
    /// Indented text tree
    #[value(name = "string")]
    Text,
    /// Flat `id: path` listing
    Simple,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Lang {
    En,
    Ru,
}

impl Lang {
    pub fn labels(self) -> Labels {
        match self {
            Lang::En => Labels::ENGLISH,
            Lang::Ru => Labels::RUSSIAN,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "sonar-link", version, about = "Create SonarQube projects and bind them to GitLab repositories")]
pub struct LinkerCli {
    /// YAML file with sonar_url and sonar_token
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// GitLab project path like wnf/infrastructure/<your_project>
    #[arg(long = "gitlab_project_key")]
    pub gitlab_project_key: Option<String>,

    /// Create the project in SonarQube
    #[arg(long = "is_create_project", action = ArgAction::Set, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub is_create_project: bool,

    /// Bind the project to its GitLab repository
    #[arg(long = "is_create_binding", action = ArgAction::Set, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub is_create_binding: bool,

    /// ALM setting key to bind against
    #[arg(long, default_value = DEFAULT_ALM_SETTING)]
    pub almsetting: String,

    /// Whether the repository is a monorepo
    #[arg(long, action = ArgAction::Set, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub monorepo: bool,

    /// Existing SonarQube project key to bind (without --is_create_project)
    #[arg(long = "project_key")]
    pub project_key: Option<String>,

    /// Repository to bind; defaults to --gitlab_project_key
    #[arg(long = "repo_url")]
    pub repo_url: Option<String>,

    /// List all project components
    #[arg(long = "is_list_all", action = ArgAction::Set, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub is_list_all: bool,

    /// Count projects bound to --almsetting (needs Administer System)
    #[arg(long = "is_count_binding", action = ArgAction::Set, num_args = 0..=1, default_value_t = false, default_missing_value = "true")]
    pub is_count_binding: bool,

    /// Visibility of created projects
    #[arg(long, default_value = DEFAULT_VISIBILITY)]
    pub visibility: String,
}

impl LinkerCli {
    /// Repository handed to the binding call
    pub fn repository(&self) -> Option<&str> {
        self.repo_url
            .as_deref()
            .or(self.gitlab_project_key.as_deref())
    }
}
