use serde::{Deserialize, Serialize};

/// Group detail as returned by `GET /groups/:id`
#[derive(Deserialize, Debug, Clone)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub full_path: String,
}

/// Entry of a subgroup listing; only the id is used to re-fetch the detail
#[derive(Deserialize, Debug, Clone)]
pub struct SubgroupRef {
    pub id: u64,
    #[serde(default)]
    pub full_path: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProjectRef {
    pub id: u64,
    pub name: String,
    #[serde(rename = "path_with_namespace")]
    pub full_path: String,
    #[serde(default, skip_serializing)]
    pub last_activity_at: Option<String>,
}

/// One level of the nested project report
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    #[serde(rename = "group_name")]
    pub name: String,
    pub projects: Vec<ProjectRef>,
    pub subgroups: Vec<GroupNode>,
}

impl GroupNode {
    /// Number of projects in this group and every subgroup below it
    pub fn project_count(&self) -> usize {
        self.projects.len()
            + self
                .subgroups
                .iter()
                .map(GroupNode::project_count)
                .sum::<usize>()
    }
}

/// Key and display name for a quality-gate project derived from a hosting path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectKeys {
    pub key: String,
    pub name: String,
}

impl ProjectKeys {
    pub fn from_path(path: &str) -> Self {
        ProjectKeys {
            key: path.replace('/', "-"),
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_keys_from_nested_path() {
        let keys = ProjectKeys::from_path("team/service-x");
        assert_eq!(keys.key, "team-service-x");
        assert_eq!(keys.name, "service-x");
    }

    #[test]
    fn single_segment_path_keeps_its_name() {
        let keys = ProjectKeys::from_path("service-x");
        assert_eq!(keys.key, "service-x");
        assert_eq!(keys.name, "service-x");
    }

    #[test]
    fn project_serializes_without_activity() {
        let project: ProjectRef = serde_json::from_str(
            r#"{"id":7,"name":"api","path_with_namespace":"team/api","last_activity_at":"2024-01-01T00:00:00.000Z","visibility":"private"}"#,
        )
        .unwrap();
        assert_eq!(project.last_activity_at.as_deref(), Some("2024-01-01T00:00:00.000Z"));

        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"id": 7, "name": "api", "path_with_namespace": "team/api"})
        );
    }
}
