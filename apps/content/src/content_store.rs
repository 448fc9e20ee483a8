use std::sync::Arc;

use rolegate_core::{AppError, AppResult};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One piece of content owned by the content service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub author_id: String,
}

/// In-memory content list shared by the handlers.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    items: Arc<RwLock<Vec<ContentItem>>>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn list(&self) -> Vec<ContentItem> {
        self.items.read().await.clone()
    }

    pub async fn insert(&self, title: String, body: String, author_id: &str) -> ContentItem {
        let item = ContentItem {
            id: Uuid::new_v4(),
            title,
            body,
            author_id: author_id.to_owned(),
        };
        self.items.write().await.push(item.clone());
        item
    }

    pub async fn remove(&self, id: Uuid) -> AppResult<()> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(AppError::NotFound(format!("content '{id}' does not exist")));
        }

        Ok(())
    }
}
