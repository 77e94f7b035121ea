use crate::cli::{ExplorerCli, OutputFormat};
use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::gitlab::{self, GitlabClient};
use crate::http::Transport;
use crate::types::Group;
use serde::Serialize;
use std::io::{self, Write};
use tracing::info;

pub fn run(cli: &ExplorerCli) -> Result<()> {
    let config = ExplorerConfig::load(&cli.config)?;
    let client = GitlabClient::from_config(&config)?;
    let group = client.group(&config.group_path)?;
    info!(group = %group.full_path, id = group.id, "resolved root group");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report(&client, &group, cli, &mut out)
}

/// Print every report `cli` asks for, in a fixed order.
pub fn report<T: Transport, W: Write>(
    client: &GitlabClient<T>,
    group: &Group,
    cli: &ExplorerCli,
    out: &mut W,
) -> Result<()> {
    if cli.output.contains(&OutputFormat::Json) {
        let tree = gitlab::collect_tree(client, group)?;
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut *out, formatter);
        tree.serialize(&mut ser)?;
        writeln!(out)?;
    }

    if cli.output.contains(&OutputFormat::Text) {
        let text = gitlab::render_text(client, group, &cli.lang.labels())?;
        writeln!(out, "{}", text)?;
    }

    if cli.output.contains(&OutputFormat::Simple) {
        let paths = gitlab::collect_project_paths(client, group)?;
        for (id, path) in &paths {
            writeln!(out, "{}: {}", id, path)?;
        }
        writeln!(out, "{}", paths.len())?;
    }

    if cli.activity {
        let activity = gitlab::collect_last_activity(client, group)?;
        let recent = gitlab::filter_recent_projects(&activity, cli.since)?;
        for (path, last_activity) in &recent {
            writeln!(out, "{}: {}", path, last_activity)?;
        }
        writeln!(out, "Filtered projects: {}", recent.len())?;
        writeln!(out, "All projects in the group: {}", activity.len())?;
    }

    Ok(())
}
