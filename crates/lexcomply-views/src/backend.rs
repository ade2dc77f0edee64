//! The seam between controllers and the network.
//!
//! Controllers only talk to a [`Backend`]. [`LexClient`] is the production
//! implementation; tests substitute an in-memory fake that counts calls.

use async_trait::async_trait;
use lexcomply_client::{ApiError, LexClient, ListPage, ListQuery, SelectOption};
use lexcomply_core::{EntitySchema, FileUpload, Record, TransferRequest};
use serde_json::Value;

/// Remote operations the controllers need.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch a list page for `schema`.
    async fn fetch_list(
        &self,
        schema: &'static EntitySchema,
        query: &ListQuery,
    ) -> Result<ListPage, ApiError>;

    /// Create a record from a mapped payload.
    async fn create(&self, schema: &'static EntitySchema, payload: &Record)
        -> Result<Value, ApiError>;

    /// Update a record; the payload carries the identifier.
    async fn update(&self, schema: &'static EntitySchema, payload: &Record)
        -> Result<Value, ApiError>;

    /// Delete a record by identifier.
    async fn delete(&self, schema: &'static EntitySchema, id: &str) -> Result<(), ApiError>;

    /// Selector options for `schema`.
    async fn options(&self, schema: &'static EntitySchema) -> Result<Vec<SelectOption>, ApiError>;

    /// Upload a file and return its stored name.
    async fn upload(&self, from: &str, file: &FileUpload) -> Result<String, ApiError>;

    /// Remove a stored file.
    async fn remove_upload(&self, from: &str, stored: &str) -> Result<(), ApiError>;

    /// Stored periodicity of a compliance.
    async fn periodicity(&self, compliance_id: &str) -> Result<String, ApiError>;

    /// Submit a compliance transfer.
    async fn transfer(&self, req: &TransferRequest) -> Result<Value, ApiError>;
}

#[async_trait]
impl Backend for LexClient {
    async fn fetch_list(
        &self,
        schema: &'static EntitySchema,
        query: &ListQuery,
    ) -> Result<ListPage, ApiError> {
        self.entity(schema).list(query).await
    }

    async fn create(
        &self,
        schema: &'static EntitySchema,
        payload: &Record,
    ) -> Result<Value, ApiError> {
        self.entity(schema).create(payload).await
    }

    async fn update(
        &self,
        schema: &'static EntitySchema,
        payload: &Record,
    ) -> Result<Value, ApiError> {
        self.entity(schema).update(payload).await
    }

    async fn delete(&self, schema: &'static EntitySchema, id: &str) -> Result<(), ApiError> {
        self.entity(schema).delete(id).await
    }

    async fn options(&self, schema: &'static EntitySchema) -> Result<Vec<SelectOption>, ApiError> {
        self.entity(schema).options().await
    }

    async fn upload(&self, from: &str, file: &FileUpload) -> Result<String, ApiError> {
        self.uploads().upload(from, file).await
    }

    async fn remove_upload(&self, from: &str, stored: &str) -> Result<(), ApiError> {
        self.uploads().remove(from, stored).await
    }

    async fn periodicity(&self, compliance_id: &str) -> Result<String, ApiError> {
        self.compliance().periodicity(compliance_id).await
    }

    async fn transfer(&self, req: &TransferRequest) -> Result<Value, ApiError> {
        self.compliance().transfer(req).await
    }
}
