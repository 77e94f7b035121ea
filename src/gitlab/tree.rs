//! Recursive walks over a group and all of its subgroups.
//!
//! Every walk re-fetches each subgroup's detail by id before descending and
//! aborts on the first failed call; there are no partial results.

use super::client::GitlabClient;
use crate::error::{Error, Result};
use crate::http::Transport;
use crate::types::{Group, GroupNode, ProjectRef};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

/// Page size of the nested report walk
pub const TREE_PER_PAGE: u32 = 100;

/// Label set for the indented text report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Labels {
    pub group: &'static str,
    pub projects: &'static str,
    pub subgroups: &'static str,
    pub name: &'static str,
    pub path: &'static str,
}

impl Labels {
    pub const ENGLISH: Labels = Labels {
        group: "Group",
        projects: "Projects",
        subgroups: "Subgroups",
        name: "Name",
        path: "Path",
    };

    pub const RUSSIAN: Labels = Labels {
        group: "Группа",
        projects: "Проекты",
        subgroups: "Подгруппы",
        name: "Название",
        path: "Путь",
    };
}

impl Default for Labels {
    fn default() -> Self {
        Labels::ENGLISH
    }
}

struct Walker<'a, T> {
    client: &'a GitlabClient<T>,
    visited: HashSet<u64>,
}

impl<'a, T: Transport> Walker<'a, T> {
    fn new(client: &'a GitlabClient<T>) -> Self {
        Walker {
            client,
            visited: HashSet::new(),
        }
    }

    fn enter(&mut self, group: &Group) -> Result<()> {
        debug!(group = %group.full_path, id = group.id, "walking group");
        if self.visited.insert(group.id) {
            Ok(())
        } else {
            Err(Error::GroupCycle(group.id))
        }
    }

    fn subgroup_details(&self, group: &Group) -> Result<Vec<Group>> {
        self.client
            .subgroups(group.id)?
            .iter()
            .map(|sub| self.client.group(&sub.id.to_string()))
            .collect()
    }

    fn tree(&mut self, group: &Group) -> Result<GroupNode> {
        self.enter(group)?;

        let mut projects = Vec::new();
        let mut page = 1;
        loop {
            let batch = self
                .client
                .group_projects_page(group.id, page, TREE_PER_PAGE)?;
            if batch.is_empty() {
                break;
            }
            projects.extend(batch);
            page += 1;
        }

        let mut subgroups = Vec::new();
        for detail in self.subgroup_details(group)? {
            subgroups.push(self.tree(&detail)?);
        }

        Ok(GroupNode {
            name: group.full_path.clone(),
            projects,
            subgroups,
        })
    }

    fn text(&mut self, group: &Group, labels: &Labels, level: usize, out: &mut String) -> Result<()> {
        self.enter(group)?;
        let indent = "  ".repeat(level);
        out.push_str(&format!("{indent}{}: {}\n", labels.group, group.full_path));

        let projects = self.client.group_projects(group.id)?;
        if !projects.is_empty() {
            out.push_str(&format!("{indent}{}:\n", labels.projects));
            for project in &projects {
                out.push_str(&format!(
                    "{indent}    - ID: {}, {}: {}, {}: {}\n",
                    project.id, labels.name, project.name, labels.path, project.full_path
                ));
            }
        }

        let subgroups = self.subgroup_details(group)?;
        if !subgroups.is_empty() {
            out.push_str(&format!("{indent}{}:\n", labels.subgroups));
            for detail in &subgroups {
                self.text(detail, labels, level + 1, out)?;
            }
        }
        Ok(())
    }

    fn each_project(&mut self, group: &Group, visit: &mut dyn FnMut(ProjectRef)) -> Result<()> {
        self.enter(group)?;
        for project in self.client.group_projects(group.id)? {
            visit(project);
        }
        for detail in self.subgroup_details(group)? {
            self.each_project(&detail, visit)?;
        }
        Ok(())
    }
}

/// Nested report of the group, paging projects explicitly
pub fn collect_tree<T: Transport>(client: &GitlabClient<T>, group: &Group) -> Result<GroupNode> {
    Walker::new(client).tree(group)
}

/// Indented text report, two spaces per nesting level
pub fn render_text<T: Transport>(client: &GitlabClient<T>, group: &Group, labels: &Labels) -> Result<String> {
    let mut out = String::new();
    Walker::new(client).text(group, labels, 0, &mut out)?;
    Ok(out)
}

/// Project id -> full path across the whole hierarchy
pub fn collect_project_paths<T: Transport>(client: &GitlabClient<T>, group: &Group) -> Result<IndexMap<u64, String>> {
    let mut paths = IndexMap::new();
    Walker::new(client).each_project(group, &mut |project: ProjectRef| {
        paths.insert(project.id, project.full_path);
    })?;
    Ok(paths)
}

/// Project full path -> last activity timestamp across the whole hierarchy
pub fn collect_last_activity<T: Transport>(
    client: &GitlabClient<T>,
    group: &Group,
) -> Result<IndexMap<String, Option<String>>> {
    let mut activity = IndexMap::new();
    Walker::new(client).each_project(group, &mut |project: ProjectRef| {
        activity.insert(project.full_path, project.last_activity_at);
    })?;
    Ok(activity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{path_of, FakeTransport};
    use crate::http::{HttpResponse, Request};
    use serde_json::json;

    // Hierarchy used by most tests:
    //   10 team (2 projects)
    //   ├── 11 team/backend (1 project)
    //   │   └── 13 team/backend/libs (1 project)
    //   └── 12 team/frontend (no projects)
    fn group_json(id: u64) -> serde_json::Value {
        let path = match id {
            10 => "team",
            11 => "team/backend",
            12 => "team/frontend",
            13 => "team/backend/libs",
            _ => panic!("unknown group {id}"),
        };
        json!({"id": id, "name": path.rsplit('/').next().unwrap(), "full_path": path})
    }

    fn projects_json(group: u64) -> serde_json::Value {
        let project = |id: u64, path: &str| {
            json!({
                "id": id,
                "name": path.rsplit('/').next().unwrap(),
                "path_with_namespace": path,
                "last_activity_at": "2024-05-01T10:00:00.000Z"
            })
        };
        match group {
            10 => json!([project(1, "team/api"), project(2, "team/docs")]),
            11 => json!([project(3, "team/backend/worker")]),
            13 => json!([project(4, "team/backend/libs/core")]),
            _ => json!([]),
        }
    }

    fn subgroups_json(group: u64) -> serde_json::Value {
        match group {
            10 => json!([{"id": 11, "full_path": "team/backend"}, {"id": 12, "full_path": "team/frontend"}]),
            11 => json!([{"id": 13, "full_path": "team/backend/libs"}]),
            _ => json!([]),
        }
    }

    fn hierarchy(req: &Request) -> HttpResponse {
        let path = path_of(req).trim_start_matches("/api/v4/groups/");
        let page = req.query_value("page").unwrap_or("1");
        let (id, rest) = path.split_once('/').unwrap_or((path, ""));
        let id: u64 = id.parse().unwrap();
        let body = match (rest, page) {
            ("", _) => group_json(id),
            (_, p) if p != "1" => json!([]),
            ("projects", _) => projects_json(id),
            ("subgroups", _) => subgroups_json(id),
            _ => panic!("unexpected request {}", req.url),
        };
        HttpResponse::new(200, body.to_string())
    }

    fn root() -> Group {
        serde_json::from_value(group_json(10)).unwrap()
    }

    #[test]
    fn leaf_group_has_no_subgroups() {
        let client = GitlabClient::new("http://fake", "t", FakeTransport::new(hierarchy));
        let leaf: Group = serde_json::from_value(group_json(12)).unwrap();

        let node = collect_tree(&client, &leaf).unwrap();
        assert_eq!(node.name, "team/frontend");
        assert!(node.projects.is_empty());
        assert!(node.subgroups.is_empty());
        // one empty project page, one subgroup listing
        assert_eq!(client.transport().request_count(), 2);
    }

    #[test]
    fn nested_tree_mirrors_hierarchy() {
        let client = GitlabClient::new("http://fake", "t", FakeTransport::new(hierarchy));

        let node = collect_tree(&client, &root()).unwrap();
        assert_eq!(node.project_count(), 4);
        assert_eq!(node.subgroups.len(), 2);
        assert_eq!(node.subgroups[0].name, "team/backend");
        assert_eq!(node.subgroups[0].subgroups[0].projects[0].full_path, "team/backend/libs/core");

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["group_name"], "team");
        assert_eq!(value["projects"][0], json!({"id": 1, "name": "api", "path_with_namespace": "team/api"}));
        assert_eq!(value["subgroups"][1], json!({"group_name": "team/frontend", "projects": [], "subgroups": []}));
    }

    #[test]
    fn nested_tree_pages_through_250_projects() {
        let fake = FakeTransport::new(|req| {
            let path = path_of(req);
            if path.ends_with("/projects") {
                assert_eq!(req.query_value("per_page"), Some("100"));
                let page: u64 = req.query_value("page").unwrap().parse().unwrap();
                let start = (page - 1) * 100;
                let end = (start + 100).min(250);
                let batch: Vec<_> = (start..end)
                    .map(|i| json!({"id": i, "name": format!("p{i}"), "path_with_namespace": format!("big/p{i}")}))
                    .collect();
                HttpResponse::new(200, serde_json::to_string(&batch).unwrap())
            } else {
                HttpResponse::new(200, "[]")
            }
        });
        let client = GitlabClient::new("http://fake", "t", fake);
        let group = Group {
            id: 1,
            name: "big".into(),
            full_path: "big".into(),
        };

        let node = collect_tree(&client, &group).unwrap();
        assert_eq!(node.projects.len(), 250);
        let unique: HashSet<u64> = node.projects.iter().map(|p| p.id).collect();
        assert_eq!(unique.len(), 250);
        assert_eq!(node.projects.last().unwrap().full_path, "big/p249");
    }

    #[test]
    fn flat_paths_cover_every_level() {
        let client = GitlabClient::new("http://fake", "t", FakeTransport::new(hierarchy));

        let paths = collect_project_paths(&client, &root()).unwrap();
        assert_eq!(paths.len(), 4);
        let order: Vec<u64> = paths.keys().copied().collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
        assert_eq!(paths[&3], "team/backend/worker");
    }

    #[test]
    fn last_activity_is_keyed_by_path() {
        let client = GitlabClient::new("http://fake", "t", FakeTransport::new(hierarchy));

        let activity = collect_last_activity(&client, &root()).unwrap();
        assert_eq!(activity.len(), 4);
        assert_eq!(
            activity["team/backend/libs/core"].as_deref(),
            Some("2024-05-01T10:00:00.000Z")
        );
    }

    #[test]
    fn text_report_indents_by_depth() {
        let client = GitlabClient::new("http://fake", "t", FakeTransport::new(hierarchy));

        let text = render_text(&client, &root(), &Labels::ENGLISH).unwrap();
        let expected = "\
Group: team
Projects:
    - ID: 1, Name: api, Path: team/api
    - ID: 2, Name: docs, Path: team/docs
Subgroups:
  Group: team/backend
  Projects:
      - ID: 3, Name: worker, Path: team/backend/worker
  Subgroups:
    Group: team/backend/libs
    Projects:
        - ID: 4, Name: core, Path: team/backend/libs/core
  Group: team/frontend
";
        assert_eq!(text, expected);
    }

    #[test]
    fn text_report_in_russian() {
        let client = GitlabClient::new("http://fake", "t", FakeTransport::new(hierarchy));
        let leaf: Group = serde_json::from_value(group_json(13)).unwrap();

        let text = render_text(&client, &leaf, &Labels::RUSSIAN).unwrap();
        assert_eq!(
            text,
            "Группа: team/backend/libs\nПроекты:\n    - ID: 4, Название: core, Путь: team/backend/libs/core\n"
        );
    }

    #[test]
    fn failed_subgroup_fetch_aborts_walk() {
        let fake = FakeTransport::new(|req| {
            if path_of(req) == "/api/v4/groups/12" {
                HttpResponse::new(500, "boom")
            } else {
                hierarchy(req)
            }
        });
        let client = GitlabClient::new("http://fake", "t", fake);

        let err = collect_project_paths(&client, &root()).unwrap_err();
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn cyclic_hierarchy_is_rejected() {
        let fake = FakeTransport::new(|req| {
            let path = path_of(req);
            if path.ends_with("/subgroups") {
                HttpResponse::new(200, if req.query_value("page") == Some("1") { r#"[{"id":1}]"# } else { "[]" })
            } else if path.ends_with("/projects") {
                HttpResponse::new(200, "[]")
            } else {
                HttpResponse::new(200, r#"{"id":1,"name":"loop","full_path":"loop"}"#)
            }
        });
        let client = GitlabClient::new("http://fake", "t", fake);
        let group = Group {
            id: 1,
            name: "loop".into(),
            full_path: "loop".into(),
        };

        assert!(matches!(collect_tree(&client, &group), Err(Error::GroupCycle(1))));
    }
}
