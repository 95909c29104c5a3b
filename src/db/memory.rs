use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::CatalogStore,
    error::AppResult,
    models::{Comment, Content, NewComment, NewContent},
};

/// Process-local store used when no database is configured, and in tests
#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    inner: Arc<RwLock<MemoryCatalogInner>>,
}

#[derive(Default)]
struct MemoryCatalogInner {
    contents: HashMap<Uuid, Content>,
    comments: Vec<Comment>,
}

impl MemoryCatalogStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn list_contents(&self) -> AppResult<Vec<Content>> {
        let inner = self.inner.read().await;
        let mut contents: Vec<Content> = inner.contents.values().cloned().collect();
        contents.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contents)
    }

    async fn get_content(&self, id: Uuid) -> AppResult<Option<Content>> {
        let inner = self.inner.read().await;
        Ok(inner.contents.get(&id).cloned())
    }

    async fn create_content(&self, input: NewContent) -> AppResult<Content> {
        let content = Content::new(input);
        let mut inner = self.inner.write().await;
        inner.contents.insert(content.id, content.clone());
        Ok(content)
    }

    async fn update_content(&self, id: Uuid, input: NewContent) -> AppResult<Option<Content>> {
        let mut inner = self.inner.write().await;
        Ok(inner.contents.get_mut(&id).map(|content| {
            content.apply(input);
            content.clone()
        }))
    }

    async fn delete_content(&self, id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let removed = inner.contents.remove(&id).is_some();
        if removed {
            inner.comments.retain(|c| c.content_id != id);
        }
        Ok(removed)
    }

    async fn list_comments(&self, content_id: Uuid) -> AppResult<Vec<Comment>> {
        let inner = self.inner.read().await;
        let mut comments: Vec<Comment> = inner
            .comments
            .iter()
            .filter(|c| c.content_id == content_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn create_comment(&self, content_id: Uuid, input: NewComment) -> AppResult<Comment> {
        let comment = Comment::new(content_id, input);
        let mut inner = self.inner.write().await;
        inner.comments.push(comment.clone());
        Ok(comment)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
