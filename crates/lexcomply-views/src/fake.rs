//! In-memory [`Backend`] that records every call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use lexcomply_client::{ApiError, ListPage, ListQuery, SelectOption};
use lexcomply_core::{EntitySchema, FileUpload, Record, TransferRequest};
use serde_json::{json, Value};

use crate::backend::Backend;

pub(crate) const REJECTION: &str = "Duplicate record";

#[derive(Default)]
pub(crate) struct FakeBackend {
    pub rows: Mutex<Vec<Record>>,
    pub total: Mutex<Option<u64>>,
    pub options: Mutex<Vec<SelectOption>>,
    pub periodicity: Mutex<String>,

    pub list_queries: Mutex<Vec<ListQuery>>,
    pub created: Mutex<Vec<Record>>,
    pub updated: Mutex<Vec<Record>>,
    pub deleted: Mutex<Vec<String>>,
    pub uploaded: Mutex<Vec<String>>,
    pub removed: Mutex<Vec<(String, String)>>,
    pub transfers: Mutex<Vec<TransferRequest>>,
    pub option_calls: Mutex<u32>,

    pub fail_list: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_upload: AtomicBool,
    pub fail_remove: AtomicBool,
    pub fail_lookup: AtomicBool,
}

pub(crate) fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

fn rejected(endpoint: &str) -> ApiError {
    ApiError::Rejected {
        endpoint: endpoint.to_string(),
        message: REJECTION.to_string(),
    }
}

fn unavailable(endpoint: &str) -> ApiError {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
        body: String::new(),
    }
}

impl FakeBackend {
    pub fn with_rows(rows: Vec<Value>) -> Self {
        let fake = Self::default();
        *fake.rows.lock().unwrap() = rows.into_iter().map(record).collect();
        fake
    }

    pub fn write_count(&self) -> usize {
        self.created.lock().unwrap().len() + self.updated.lock().unwrap().len()
    }

    pub fn list_count(&self) -> usize {
        self.list_queries.lock().unwrap().len()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_list(
        &self,
        _schema: &'static EntitySchema,
        query: &ListQuery,
    ) -> Result<ListPage, ApiError> {
        self.list_queries.lock().unwrap().push(query.clone());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(unavailable("GET list"));
        }
        Ok(ListPage {
            rows: self.rows.lock().unwrap().clone(),
            total: *self.total.lock().unwrap(),
        })
    }

    async fn create(
        &self,
        _schema: &'static EntitySchema,
        payload: &Record,
    ) -> Result<Value, ApiError> {
        self.created.lock().unwrap().push(payload.clone());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(rejected("POST create"));
        }
        Ok(json!({"status": true, "message": "created"}))
    }

    async fn update(
        &self,
        _schema: &'static EntitySchema,
        payload: &Record,
    ) -> Result<Value, ApiError> {
        self.updated.lock().unwrap().push(payload.clone());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(rejected("POST update"));
        }
        Ok(json!({"status": true, "message": "updated"}))
    }

    async fn delete(&self, _schema: &'static EntitySchema, id: &str) -> Result<(), ApiError> {
        self.deleted.lock().unwrap().push(id.to_string());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(rejected("DELETE remove"));
        }
        self.rows
            .lock()
            .unwrap()
            .retain(|r| r.get("_id").and_then(Value::as_str) != Some(id));
        Ok(())
    }

    async fn options(&self, _schema: &'static EntitySchema) -> Result<Vec<SelectOption>, ApiError> {
        *self.option_calls.lock().unwrap() += 1;
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(unavailable("GET options"));
        }
        Ok(self.options.lock().unwrap().clone())
    }

    async fn upload(&self, from: &str, file: &FileUpload) -> Result<String, ApiError> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(unavailable("POST v2/multer/upload"));
        }
        let stored = format!("{from}-{}", file.file_name);
        self.uploaded.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn remove_upload(&self, from: &str, stored: &str) -> Result<(), ApiError> {
        self.removed
            .lock()
            .unwrap()
            .push((from.to_string(), stored.to_string()));
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(unavailable("DELETE v2/multer/remove"));
        }
        Ok(())
    }

    async fn periodicity(&self, _compliance_id: &str) -> Result<String, ApiError> {
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(unavailable("GET complianceMaster/getCompliancePeriodicity"));
        }
        Ok(self.periodicity.lock().unwrap().clone())
    }

    async fn transfer(&self, req: &TransferRequest) -> Result<Value, ApiError> {
        self.transfers.lock().unwrap().push(req.clone());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(rejected("POST complianceMaster/complianceTransfer"));
        }
        Ok(json!({"status": true}))
    }
}
