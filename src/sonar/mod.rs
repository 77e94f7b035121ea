pub mod client;

pub use client::{
    created_project_key, SonarClient, COMPONENTS_PAGE_SIZE, DEFAULT_ALM_SETTING, DEFAULT_VISIBILITY,
    PROJECT_QUALIFIER,
};
