use crate::config::LinkerConfig;
use crate::error::{Error, Result};
use crate::http::{Auth, HttpResponse, Request, ReqwestTransport, Transport};
use serde_json::Value;
use tracing::{error, warn};

pub const COMPONENTS_PAGE_SIZE: usize = 50;
pub const PROJECT_QUALIFIER: &str = "TRK";
pub const DEFAULT_VISIBILITY: &str = "public";
pub const DEFAULT_ALM_SETTING: &str = "Gitlab";

/// SonarQube web API client.
///
/// Every call checks the status itself: a non-success response is logged
/// with its body and returned as `Error::Status`, so callers can report and
/// move on.
pub struct SonarClient<T = ReqwestTransport> {
    base_url: String,
    token: String,
    transport: T,
}

impl SonarClient<ReqwestTransport> {
    pub fn from_config(config: &LinkerConfig) -> Result<Self> {
        Ok(Self::new(&config.sonar_url, &config.sonar_token, ReqwestTransport::new()?))
    }
}

impl<T: Transport> SonarClient<T> {
    pub fn new(base_url: &str, token: &str, transport: T) -> Self {
        SonarClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Configured DevOps platform integrations, e.g.
    /// `{"almSettings":[{"key":"Gitlab","alm":"gitlab","url":"https://gitlab.com/api/v4"}]}`
    pub fn alm_settings(&self) -> Result<Value> {
        let request = Request::get(self.url("alm_settings/list")).auth(Auth::Basic {
            username: self.token.clone(),
            password: String::new(),
        });
        self.call(&request, &[200])?.json()
    }

    /// Number of projects bound to an ALM setting. Needs Administer System.
    pub fn count_binding(&self, alm_setting: &str) -> Result<Value> {
        let request = self
            .bearer(Request::get(self.url("alm_settings/count_binding")))
            .query("almSetting", alm_setting);
        self.call(&request, &[200])?.json()
    }

    /// One page of `components/search`, 1-based
    pub fn components_search(&self, qualifiers: &str, page: u32, page_size: usize) -> Result<Value> {
        let request = self
            .bearer(Request::get(self.url("components/search")))
            .query("qualifiers", qualifiers)
            .query("p", page)
            .query("ps", page_size);
        self.call(&request, &[200])?.json()
    }

    /// Every component with the given qualifier.
    ///
    /// Stops at the first short page. A failed page ends the listing early
    /// and whatever was collected so far is returned.
    pub fn all_components(&self, qualifiers: &str) -> Vec<Value> {
        let mut components = Vec::new();
        let mut page = 1;

        loop {
            let response = match self.components_search(qualifiers, page, COMPONENTS_PAGE_SIZE) {
                Ok(response) => response,
                Err(e) => {
                    warn!(page, collected = components.len(), "component listing stopped early: {e}");
                    break;
                }
            };

            let batch = match response.get("components").and_then(Value::as_array) {
                Some(batch) => batch.clone(),
                None => break,
            };
            let full = batch.len() >= COMPONENTS_PAGE_SIZE;
            components.extend(batch);
            if !full {
                break;
            }
            page += 1;
        }

        components
    }

    pub fn create_project(&self, project_key: &str, name: &str, visibility: &str) -> Result<Value> {
        let request = self
            .bearer(Request::post(self.url("projects/create")))
            .form("project", project_key)
            .form("name", name)
            .form("visibility", visibility);
        self.call(&request, &[200])?.json()
    }

    /// Success is 200 or 204; the body, if any, is not used.
    pub fn set_gitlab_binding(&self, alm_setting: &str, monorepo: bool, project_key: &str, repository: &str) -> Result<()> {
        let request = self
            .bearer(Request::post(self.url("alm_settings/set_gitlab_binding")))
            .form("almSetting", alm_setting)
            .form("monorepo", monorepo)
            .form("project", project_key)
            .form("repository", repository);
        self.call(&request, &[200, 204])?;
        Ok(())
    }

    pub fn get_binding(&self, project_key: &str) -> Result<Value> {
        let request = self
            .bearer(Request::get(self.url("alm_settings/get_binding")))
            .query("project", project_key);
        self.call(&request, &[200])?.json()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint)
    }

    fn bearer(&self, request: Request) -> Request {
        request.auth(Auth::Bearer(self.token.clone()))
    }

    fn call(&self, request: &Request, accepted: &[u16]) -> Result<HttpResponse> {
        let response = self.transport.send(request).map_err(|e| {
            error!(url = %request.url, "ERROR: {}", e);
            e
        })?;
        if accepted.contains(&response.status) {
            Ok(response)
        } else {
            error!(url = %request.url, status = response.status, "ERROR: {} - {}", response.status, response.body);
            Err(Error::status(response.status, response.body))
        }
    }
}

/// Key of the project just created, from `{"project": {"key": ...}}`
pub fn created_project_key(response: &Value) -> Option<&str> {
    response.pointer("/project/key").and_then(Value::as_str)
}
