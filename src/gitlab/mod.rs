pub mod activity;
pub mod client;
pub mod tree;

pub use activity::{filter_recent_at, filter_recent_projects, DEFAULT_SINCE_DAYS};
pub use client::GitlabClient;
pub use tree::{collect_last_activity, collect_project_paths, collect_tree, render_text, Labels};
