use crate::cli::LinkerCli;
use crate::config::LinkerConfig;
use crate::error::Result;
use crate::http::Transport;
use crate::sonar::{created_project_key, SonarClient, PROJECT_QUALIFIER};
use crate::types::ProjectKeys;
use std::io::{self, Write};

pub fn run(cli: &LinkerCli) -> Result<()> {
    let config = LinkerConfig::load(&cli.config)?;
    let sonar = SonarClient::from_config(&config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    link(&sonar, cli, &mut out)
}

/// Run every step the flags ask for.
///
/// A failed step is reported and the remaining independent steps still run;
/// only steps that need its result are skipped. The returned error is for
/// console write failures.
pub fn link<T: Transport, W: Write>(sonar: &SonarClient<T>, cli: &LinkerCli, out: &mut W) -> Result<()> {
    match sonar.alm_settings() {
        Ok(settings) => {
            writeln!(out, "ALM:")?;
            writeln!(out, "{}", settings)?;
        }
        Err(e) => writeln!(out, "Error with fetching ALM settings: {}", e)?,
    }

    if cli.is_count_binding {
        match sonar.count_binding(&cli.almsetting) {
            Ok(count) => {
                writeln!(out, "Bindings:")?;
                writeln!(out, "{}", count)?;
            }
            Err(e) => writeln!(out, "Error with counting bindings: {}", e)?,
        }
    }

    if cli.is_list_all {
        let components = sonar.all_components(PROJECT_QUALIFIER);
        writeln!(out, "Components:")?;
        for component in &components {
            writeln!(out, "{}", component)?;
        }
    }

    if cli.is_create_project {
        let Some(path) = cli.gitlab_project_key.as_deref() else {
            writeln!(out, "--gitlab_project_key is required to create a project")?;
            return Ok(());
        };
        let keys = ProjectKeys::from_path(path);

        let created = match sonar.create_project(&keys.key, &keys.name, &cli.visibility) {
            Ok(created) => created,
            Err(e) => {
                writeln!(out, "Failed to create project: {}", e)?;
                return Ok(());
            }
        };
        writeln!(out, "Project successfully created")?;

        match created_project_key(&created) {
            Some(project_key) => {
                writeln!(out, "Project key: {}", project_key)?;
                if cli.is_create_binding {
                    bind(sonar, cli, project_key, out)?;
                }
            }
            None => writeln!(out, "Project key not found in the response")?,
        }
    } else if cli.is_create_binding {
        match cli.project_key.as_deref() {
            Some(project_key) => bind(sonar, cli, project_key, out)?,
            None => writeln!(out, "--project_key is required to bind an existing project")?,
        }
    }

    Ok(())
}

fn bind<T: Transport, W: Write>(sonar: &SonarClient<T>, cli: &LinkerCli, project_key: &str, out: &mut W) -> Result<()> {
    let Some(repository) = cli.repository() else {
        writeln!(out, "--repo_url is required to create a binding")?;
        return Ok(());
    };

    if let Err(e) = sonar.set_gitlab_binding(&cli.almsetting, cli.monorepo, project_key, repository) {
        writeln!(out, "Error with binding creation: {}", e)?;
        return Ok(());
    }
    writeln!(out, "Binding set successfully")?;

    match sonar.get_binding(project_key) {
        Ok(binding) => writeln!(out, "{}", binding)?,
        Err(e) => writeln!(out, "Error with reading binding: {}", e)?,
    }
    Ok(())
}
