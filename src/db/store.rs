use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Comment, Content, NewComment, NewContent},
};

/// Persisted catalog records behind a create/read/update/delete interface
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// All content records, newest first
    async fn list_contents(&self) -> AppResult<Vec<Content>>;

    async fn get_content(&self, id: Uuid) -> AppResult<Option<Content>>;

    async fn create_content(&self, input: NewContent) -> AppResult<Content>;

    /// Replaces the editable fields; `None` when the record does not exist
    async fn update_content(&self, id: Uuid, input: NewContent) -> AppResult<Option<Content>>;

    /// Deletes the record and its comments; `false` when it did not exist
    async fn delete_content(&self, id: Uuid) -> AppResult<bool>;

    /// Comments for one record, oldest first
    async fn list_comments(&self, content_id: Uuid) -> AppResult<Vec<Comment>>;

    async fn create_comment(&self, content_id: Uuid, input: NewComment) -> AppResult<Comment>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
