//! List controller: fetch, filter, sort and paginate an entity's rows.
//!
//! Client-paginated entities are fetched once per refresh and every
//! filter/sort/page change works on the fetched rows. Server-paginated
//! entities issue exactly one refetch per change, carrying the updated
//! query parameters. A failed fetch empties the rows and raises a
//! dismissible banner; nothing is retried.

use std::cmp::Ordering;
use std::sync::Arc;

use lexcomply_client::{ListQuery, SortOrder};
use lexcomply_core::{
    record_id, value_text, EntitySchema, FieldSpec, PaginationMode, Record, ValidationError,
};
use serde_json::Value;

use crate::backend::Backend;
use crate::dialog::Dialog;
use crate::error::ViewError;

/// Rows per page when a list opens.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Per-row actions a list offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    View,
    Edit,
    Delete,
}

/// Initial list state, applied before the first fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSettings {
    pub parent: Option<String>,
    pub filter: String,
    /// Sort column (UI name) and direction.
    pub sort: Option<(String, SortOrder)>,
    /// Zero-based page index.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            parent: None,
            filter: String::new(),
            sort: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Headless list view over one entity.
pub struct ListView {
    backend: Arc<dyn Backend>,
    schema: &'static EntitySchema,
    rows: Vec<Record>,
    total: Option<u64>,
    parent: Option<String>,
    filter: String,
    sort: Option<(&'static str, SortOrder)>,
    page: usize,
    page_size: usize,
    loading: bool,
    error: Option<String>,
}

impl ListView {
    pub fn new(backend: Arc<dyn Backend>, schema: &'static EntitySchema) -> Self {
        Self {
            backend,
            schema,
            rows: Vec::new(),
            total: None,
            parent: None,
            filter: String::new(),
            sort: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            loading: false,
            error: None,
        }
    }

    /// Apply settings without fetching. Unknown sort columns are rejected.
    pub fn with_settings(mut self, settings: ListSettings) -> Result<Self, ViewError> {
        if let Some((field, order)) = settings.sort {
            let spec = self.field_spec(&field)?;
            self.sort = Some((spec.name, order));
        }
        self.parent = settings.parent.filter(|p| !p.trim().is_empty());
        self.filter = settings.filter;
        self.page = settings.page;
        self.page_size = settings.page_size.max(1);
        Ok(self)
    }

    fn field_spec(&self, field: &str) -> Result<&'static FieldSpec, ValidationError> {
        self.schema
            .field(field)
            .ok_or_else(|| ValidationError::UnknownField {
                field: field.to_string(),
                entity: self.schema.label.to_string(),
            })
    }

    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Rows as last fetched, before filtering and paging.
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The error banner, if the last fetch or delete failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Current sort column (UI name) and direction.
    pub fn sort(&self) -> Option<(&'static str, SortOrder)> {
        self.sort
    }

    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    fn server_side(&self) -> bool {
        self.schema.pagination == PaginationMode::Server
    }

    /// Query for the next fetch.
    pub fn query(&self) -> ListQuery {
        let mut query = ListQuery {
            parent: self.parent.clone(),
            ..ListQuery::default()
        };
        if self.server_side() {
            query.page = Some(u32::try_from(self.page.saturating_add(1)).unwrap_or(u32::MAX));
            query.limit = Some(u32::try_from(self.page_size).unwrap_or(u32::MAX));
            query.search = Some(self.filter.clone()).filter(|s| !s.trim().is_empty());
            if let Some((name, order)) = self.sort {
                query.sort_field = self.schema.field(name).map(|f| f.api_name.to_string());
                query.sort_order = Some(order);
            }
        }
        query
    }

    /// Fetch rows. Selector-driven lists without a selection stay empty
    /// and send nothing.
    pub async fn refresh(&mut self) -> Result<(), ViewError> {
        if self.schema.endpoints.parent_param.is_some() && self.parent.is_none() {
            self.rows.clear();
            self.total = None;
            return Ok(());
        }

        self.fetch().await?;
        if self.server_side()
            && self.total.is_some()
            && self.page > 0
            && self.page >= self.page_count()
        {
            self.page = self.page_count().saturating_sub(1);
            tracing::debug!(
                entity = %self.schema.kind,
                page = self.page,
                "page past the end, fetching the last page"
            );
            self.fetch().await?;
        }
        Ok(())
    }

    async fn fetch(&mut self) -> Result<(), ViewError> {
        let query = self.query();
        self.loading = true;
        let result = self.backend.fetch_list(self.schema, &query).await;
        self.loading = false;

        match result {
            Ok(page) => {
                tracing::debug!(
                    entity = %self.schema.kind,
                    rows = page.rows.len(),
                    "list refreshed"
                );
                self.rows = page.rows;
                self.total = page.total;
                self.error = None;
                if !self.server_side() {
                    self.page = self.page.min(self.page_count().saturating_sub(1));
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(entity = %self.schema.kind, error = %e, "list fetch failed");
                self.error = Some(e.user_message());
                self.rows.clear();
                self.total = None;
                Err(e.into())
            }
        }
    }

    /// Change the selector value (e.g. the chosen act) and refetch.
    pub async fn select_parent(&mut self, parent: Option<String>) -> Result<(), ViewError> {
        self.parent = parent.filter(|p| !p.trim().is_empty());
        self.page = 0;
        self.refresh().await
    }

    /// Set the search text. Resets to the first page.
    pub async fn set_filter(&mut self, text: impl Into<String>) -> Result<(), ViewError> {
        self.filter = text.into();
        self.page = 0;
        if self.server_side() {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Sort by a column; the same column again flips the direction.
    pub async fn sort_by(&mut self, field: &str) -> Result<(), ViewError> {
        let spec = self.field_spec(field)?;
        self.sort = match self.sort {
            Some((current, order)) if current == spec.name => Some((spec.name, order.toggled())),
            _ => Some((spec.name, SortOrder::Asc)),
        };
        if self.server_side() {
            self.refresh().await?;
        }
        Ok(())
    }

    pub async fn set_page(&mut self, page: usize) -> Result<(), ViewError> {
        if self.server_side() {
            self.page = page;
            return self.refresh().await;
        }
        self.page = page.min(self.page_count().saturating_sub(1));
        Ok(())
    }

    /// Change rows per page. Resets to the first page.
    pub async fn set_page_size(&mut self, size: usize) -> Result<(), ViewError> {
        self.page_size = size.max(1);
        self.page = 0;
        if self.server_side() {
            self.refresh().await?;
        }
        Ok(())
    }

    /// Rows matching the filter, in sort order. Server lists return the
    /// fetched page unchanged.
    pub fn matching_rows(&self) -> Vec<&Record> {
        if self.server_side() {
            return self.rows.iter().collect();
        }
        let needle = self.filter.trim().to_lowercase();
        let mut rows: Vec<&Record> = self
            .rows
            .iter()
            .filter(|row| needle.is_empty() || self.row_matches(row, &needle))
            .collect();

        if let Some((name, order)) = self.sort {
            if let Some(spec) = self.schema.field(name) {
                rows.sort_by(|a, b| compare_rows(a, b, spec.api_name, order));
            }
        }
        rows
    }

    /// The rows on the current page.
    pub fn visible_rows(&self) -> Vec<&Record> {
        if self.server_side() {
            return self.rows.iter().collect();
        }
        self.matching_rows()
            .into_iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .collect()
    }

    /// Number of rows across all pages.
    pub fn matching_count(&self) -> usize {
        if self.server_side() {
            return self
                .total
                .and_then(|t| usize::try_from(t).ok())
                .unwrap_or(self.rows.len());
        }
        self.matching_rows().len()
    }

    pub fn page_count(&self) -> usize {
        self.matching_count().div_ceil(self.page_size)
    }

    fn row_matches(&self, row: &Record, needle: &str) -> bool {
        self.schema.listed_fields().any(|f| {
            row.get(f.api_name)
                .and_then(value_text)
                .map(|text| text.to_lowercase().contains(needle))
                .unwrap_or(false)
        })
    }

    /// Actions the entity's endpoints allow.
    pub fn row_actions(&self) -> Vec<RowAction> {
        let mut actions = vec![RowAction::View];
        if self.schema.endpoints.update.is_some() {
            actions.push(RowAction::Edit);
        }
        if self.schema.endpoints.delete.is_some() {
            actions.push(RowAction::Delete);
        }
        actions
    }

    /// `View`: the fetched row with this identifier.
    pub fn row(&self, id: &str) -> Option<&Record> {
        self.rows
            .iter()
            .find(|r| record_id(r, self.schema.id_field).as_deref() == Some(id))
    }

    /// `Edit`: a dialog seeded from the row.
    pub fn edit_dialog(&self, id: &str) -> Result<Dialog, ViewError> {
        let row = self.row(id).ok_or_else(|| ViewError::NoSuchRow {
            entity: self.schema.label,
            id: id.to_string(),
        })?;
        Dialog::edit(self.backend.clone(), self.schema, row)
    }

    /// An empty create dialog for this entity.
    pub fn create_dialog(&self) -> Dialog {
        Dialog::create(self.backend.clone(), self.schema)
    }

    /// `Delete`: one delete request, then a refresh.
    pub async fn delete_row(&mut self, id: &str) -> Result<(), ViewError> {
        if self.loading {
            return Err(ViewError::Busy);
        }
        self.loading = true;
        let result = self.backend.delete(self.schema, id).await;
        self.loading = false;

        if let Err(e) = result {
            tracing::warn!(entity = %self.schema.kind, %id, error = %e, "delete failed");
            self.error = Some(e.user_message());
            return Err(e.into());
        }
        tracing::info!(entity = %self.schema.kind, %id, "row deleted");
        self.refresh().await
    }
}

fn cell<'a>(row: &'a Record, api_name: &str) -> Option<&'a Value> {
    row.get(api_name).filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Missing cells sort last in either direction.
fn compare_rows(a: &Record, b: &Record, api_name: &str, order: SortOrder) -> Ordering {
    match (cell(a, api_name), cell(b, api_name)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ord = compare_values(x, y);
            match order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        }
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    let x = value_text(a).unwrap_or_default().to_lowercase();
    let y = value_text(b).unwrap_or_default().to_lowercase();
    x.cmp(&y)
}
