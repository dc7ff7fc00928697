//! Paging and batch ports used by inventory scans and remediation.

use async_trait::async_trait;
use cloudops_domain::{ErrorInfo, ListPage, RemoteError};

/// A cursor-based listing endpoint.
///
/// `list_page(None)` returns the first page; each following call passes the
/// previous page's `next_cursor`. A page without a cursor is the last one.
#[async_trait]
pub trait ListOperation: Send + Sync {
    /// Short label for logs and progress output
    fn label(&self) -> &str;

    async fn list_page(&self, cursor: Option<&str>) -> Result<ListPage, RemoteError>;
}

/// A mutation applied to one chunk of resource ids.
#[async_trait]
pub trait BatchOperation: Send + Sync {
    fn label(&self) -> &str;

    /// Apply the mutation to every id in `ids` in one remote call.
    async fn apply(&self, ids: &[String]) -> Result<(), ErrorInfo>;
}
