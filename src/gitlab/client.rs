use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::http::{Auth, Request, ReqwestTransport, Transport};
use crate::types::{Group, ProjectRef, SubgroupRef};
use serde::de::DeserializeOwned;

/// Page size used when the caller asks for "everything"
pub const LIST_ALL_PER_PAGE: u32 = 100;

/// Thin client for the GitLab v4 groups API.
pub struct GitlabClient<T = ReqwestTransport> {
    base_url: String,
    token: String,
    transport: T,
}

impl GitlabClient<ReqwestTransport> {
    pub fn from_config(config: &ExplorerConfig) -> Result<Self> {
        Ok(Self::new(
            config.gitlab_url.as_str(),
            &config.private_token,
            ReqwestTransport::new()?,
        ))
    }
}

impl<T: Transport> GitlabClient<T> {
    pub fn new(base_url: &str, token: &str, transport: T) -> Self {
        GitlabClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a group by numeric id or full path
    pub fn group(&self, id_or_path: &str) -> Result<Group> {
        let url = self.group_url(id_or_path, "");
        self.fetch(self.request(url))
    }

    /// One page of the group's direct projects
    pub fn group_projects_page(&self, group_id: u64, page: u32, per_page: u32) -> Result<Vec<ProjectRef>> {
        let url = self.group_url(&group_id.to_string(), "/projects");
        self.fetch(
            self.request(url)
                .query("page", page)
                .query("per_page", per_page),
        )
    }

    /// Every direct project of the group
    pub fn group_projects(&self, group_id: u64) -> Result<Vec<ProjectRef>> {
        self.list_all(self.group_url(&group_id.to_string(), "/projects"))
    }

    /// Every direct subgroup of the group
    pub fn subgroups(&self, group_id: u64) -> Result<Vec<SubgroupRef>> {
        self.list_all(self.group_url(&group_id.to_string(), "/subgroups"))
    }

    fn group_url(&self, id_or_path: &str, suffix: &str) -> String {
        format!(
            "{}/api/v4/groups/{}{}",
            self.base_url,
            urlencoding::encode(id_or_path),
            suffix
        )
    }

    fn request(&self, url: String) -> Request {
        Request::get(url).auth(Auth::Header {
            name: "PRIVATE-TOKEN",
            value: self.token.clone(),
        })
    }

    fn fetch<R: DeserializeOwned>(&self, request: Request) -> Result<R> {
        self.transport.send(&request)?.error_for_status()?.json()
    }

    // Follows X-Next-Page while the server sends it; without the header,
    // keeps paging until an empty page comes back.
    fn list_all<R: DeserializeOwned>(&self, url: String) -> Result<Vec<R>> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let request = self
                .request(url.clone())
                .query("page", page)
                .query("per_page", LIST_ALL_PER_PAGE);
            let resp = self.transport.send(&request)?.error_for_status()?;
            let batch: Vec<R> = resp.json()?;
            if batch.is_empty() {
                break;
            }
            items.extend(batch);

            match resp.header("x-next-page") {
                Some(next) => match next.trim().parse::<u32>() {
                    Ok(next) if next > page => page = next,
                    _ => break,
                },
                None => page += 1,
            }
        }

        Ok(items)
    }
}
