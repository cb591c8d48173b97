pub mod http;

use std::fmt;

use async_trait::async_trait;

use crate::app_error::AppError;
use crate::models::faculty::{FacultyDetail, FacultyId, FacultyListItem};
use crate::models::update::{AdminCredentials, UpdateReceipt};

pub use http::HttpDirectoryClient;

pub const LIST_ALL_PATH: &str = "/api/v1/search/all";
pub const SEARCH_NAME_PATH: &str = "/api/v1/search/name";
pub const SEARCH_RESEARCH_PATH: &str = "/api/v1/search/research";
pub const FACULTY_PATH: &str = "/api/v1/faculty";
pub const UPDATE_PATH: &str = "/api/v1/update";
pub const RELIST_PATH: &str = "/api/v1/faculty/all";

/// Which remote search a query is dispatched to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchTarget {
    Name(String),
    Interest(String),
}

impl SearchTarget {
    pub fn text(&self) -> &str {
        match self {
            SearchTarget::Name(text) | SearchTarget::Interest(text) => text,
        }
    }

    /// Path plus percent-encoded `q` parameter, relative to the backend origin.
    pub fn path_and_query(&self) -> String {
        let path = match self {
            SearchTarget::Name(_) => SEARCH_NAME_PATH,
            SearchTarget::Interest(_) => SEARCH_RESEARCH_PATH,
        };
        format!("{}?q={}", path, urlencoding::encode(self.text()))
    }
}

impl fmt::Display for SearchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchTarget::Name(text) => write!(f, "name={:?}", text),
            SearchTarget::Interest(text) => write!(f, "interest={:?}", text),
        }
    }
}

pub fn faculty_path(id: FacultyId) -> String {
    format!("{}/{}", FACULTY_PATH, id)
}

/// The backend collaborator. Everything the search core needs from the network goes through here.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_all(&self) -> Result<Vec<FacultyListItem>, AppError>;

    async fn search(&self, target: &SearchTarget) -> Result<Vec<FacultyListItem>, AppError>;

    async fn faculty_detail(&self, id: FacultyId) -> Result<FacultyDetail, AppError>;

    async fn run_update(&self, credentials: &AdminCredentials) -> Result<UpdateReceipt, AppError>;

    /// Re-list used after a successful refresh.
    async fn list_after_update(&self) -> Result<Vec<FacultyListItem>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text_is_percent_encoded() {
        let target = SearchTarget::Interest("machine learning & C++/AI".to_string());
        assert_eq!(
            target.path_and_query(),
            "/api/v1/search/research?q=machine%20learning%20%26%20C%2B%2B%2FAI"
        );
    }

    #[test]
    fn name_target_uses_name_endpoint() {
        let target = SearchTarget::Name("Smith".to_string());
        assert_eq!(target.path_and_query(), "/api/v1/search/name?q=Smith");
        assert_eq!(faculty_path(7), "/api/v1/faculty/7");
    }
}
