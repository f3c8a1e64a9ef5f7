//! Todo CRUD, sync and PDF export over the stamped client

use std::sync::Arc;
use tracing::info;

use super::models::{Page, SignatureBody, Todo, UserSummary};
use crate::error::Result;
use crate::http::ApiClient;
use crate::signature::SignedImage;

/// Largest page the backend will serve
pub const MAX_PAGE_SIZE: u32 = 100;

pub struct TodoService {
    client: Arc<ApiClient>,
}

impl TodoService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, page: u32, size: u32) -> Result<Page<Todo>> {
        let size = size.clamp(1, MAX_PAGE_SIZE);
        self.client
            .get_json(&format!("todos?page={}&size={}", page, size))
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Todo> {
        self.client.get_json(&format!("todos/{}", id)).await
    }

    pub async fn create(&self, todo: &Todo) -> Result<Todo> {
        todo.validate()?;
        let created: Todo = self.client.post_json("todos", todo).await?;
        info!("Created todo {:?}", created.id);
        Ok(created)
    }

    pub async fn update(&self, id: i64, todo: &Todo) -> Result<Todo> {
        todo.validate()?;
        self.client.put_json(&format!("todos/{}", id), todo).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("todos/{}", id)).await?;
        info!("Deleted todo {}", id);
        Ok(())
    }

    /// Ask the backend to pull todos from its upstream source
    pub async fn sync(&self) -> Result<String> {
        self.client.post_text("todos/sync").await
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>> {
        self.client.get_json("todos/users").await
    }

    pub async fn users_pdf(&self) -> Result<Vec<u8>> {
        self.client.get_bytes("todos/users/pdf").await
    }

    pub async fn todo_pdf(&self, id: i64) -> Result<Vec<u8>> {
        self.client.get_bytes(&format!("todos/{}/pdf", id)).await
    }

    /// Export a todo with the signature stamped onto the document
    pub async fn signed_todo_pdf(&self, signed: &SignedImage) -> Result<Vec<u8>> {
        let data_url = signed.image.to_data_url();
        let body = SignatureBody {
            signature: &data_url,
        };
        self.client
            .post_bytes(&format!("todos/{}/pdf/sign", signed.item_id), &body)
            .await
    }
}

/// Suggested file names for downloads
pub fn users_pdf_filename() -> &'static str {
    "liste-utilisateurs.pdf"
}

pub fn todo_pdf_filename(id: i64) -> String {
    format!("tache-{}.pdf", id)
}

pub fn signed_todo_pdf_filename(id: i64) -> String {
    format!("tache-signee-{}.pdf", id)
}
