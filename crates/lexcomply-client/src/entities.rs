//! Typed client for one entity's list/create/update/delete endpoints.
//!
//! The endpoint paths come from the entity's [`EntitySchema`], so one
//! implementation serves every master table. Paths per entity are declared
//! in `lexcomply_core::registry`.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `{list}?page&limit&search&sortField&sortOrder&{parent}` | List |
//! | POST   | `{create}` | Create |
//! | POST   | `{update}` | Update (body carries the id) |
//! | DELETE | `{delete}?id={id}` | Delete |
//! | GET    | `{options}` | Select options |

use lexcomply_core::{EntitySchema, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{self, ListPage, SelectOption};
use crate::error::ApiError;
use crate::transport::Transport;

/// Column sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// The other direction.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Query parameters for a list request.
///
/// Client-paginated lists send only `parent`; server-paginated lists send
/// the rest as well. `page` is 1-based on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    /// API name of the sort column.
    pub sort_field: Option<String>,
    pub sort_order: Option<SortOrder>,
    /// Selector value, sent under the schema's parent parameter.
    pub parent: Option<String>,
}

impl ListQuery {
    /// Encode as query pairs. Empty search strings are dropped.
    pub fn to_pairs(&self, parent_param: Option<&str>) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        if let Some(field) = &self.sort_field {
            pairs.push(("sortField".to_string(), field.clone()));
            pairs.push((
                "sortOrder".to_string(),
                self.sort_order.unwrap_or_default().as_str().to_string(),
            ));
        }
        if let (Some(param), Some(parent)) = (parent_param, &self.parent) {
            pairs.push((param.to_string(), parent.clone()));
        }
        pairs
    }
}

/// Client for one entity's endpoints.
#[derive(Debug, Clone)]
pub struct EntityClient {
    transport: Transport,
    schema: &'static EntitySchema,
}

impl EntityClient {
    pub(crate) fn new(transport: Transport, schema: &'static EntitySchema) -> Self {
        Self { transport, schema }
    }

    /// The schema this client serves.
    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    fn path(
        &self,
        path: Option<&'static str>,
        operation: &'static str,
    ) -> Result<&'static str, ApiError> {
        path.ok_or(ApiError::Unsupported {
            entity: self.schema.label,
            operation,
        })
    }

    /// Fetch one page (or the whole collection).
    ///
    /// Calls `GET {base_url}{list}`.
    pub async fn list(&self, query: &ListQuery) -> Result<ListPage, ApiError> {
        let path = self.path(self.schema.endpoints.list, "listing")?;
        let pairs = query.to_pairs(self.schema.endpoints.parent_param);
        let body = self.transport.get(path, &pairs).await?;
        let page = envelope::list_page(&format!("GET {path}"), body)?;
        tracing::debug!(
            entity = %self.schema.kind,
            rows = page.rows.len(),
            total = ?page.total,
            "fetched list"
        );
        Ok(page)
    }

    /// Create a record from a mapped payload.
    ///
    /// Calls `POST {base_url}{create}`.
    pub async fn create(&self, payload: &Record) -> Result<Value, ApiError> {
        let path = self.path(self.schema.endpoints.create, "creating")?;
        let resp = self.transport.post_json(path, payload).await?;
        tracing::info!(entity = %self.schema.kind, "created record");
        Ok(resp)
    }

    /// Update a record. The payload must carry the identifier.
    ///
    /// Calls `POST {base_url}{update}`.
    pub async fn update(&self, payload: &Record) -> Result<Value, ApiError> {
        let path = self.path(self.schema.endpoints.update, "editing")?;
        let resp = self.transport.post_json(path, payload).await?;
        tracing::info!(entity = %self.schema.kind, "updated record");
        Ok(resp)
    }

    /// Delete a record by identifier.
    ///
    /// Calls `DELETE {base_url}{delete}?id={id}`.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = self.path(self.schema.endpoints.delete, "deleting")?;
        self.transport
            .delete(path, &[("id".to_string(), id.to_string())])
            .await?;
        tracing::info!(entity = %self.schema.kind, %id, "deleted record");
        Ok(())
    }

    /// Option list for selectors referencing this entity.
    ///
    /// Uses the dedicated options endpoint when the schema has one;
    /// otherwise fetches the list and labels each row by its first listed
    /// field.
    pub async fn options(&self) -> Result<Vec<SelectOption>, ApiError> {
        if let Some(path) = self.schema.endpoints.options {
            let body = self.transport.get(path, &[]).await?;
            return envelope::options(&format!("GET {path}"), body);
        }
        let page = self.list(&ListQuery::default()).await?;
        let labels: Vec<&str> = self.schema.listed_fields().map(|f| f.api_name).collect();
        Ok(envelope::options_from_rows(
            &page.rows,
            self.schema.id_field,
            &labels,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_query_encodes_all_parameters() {
        let q = ListQuery {
            page: Some(2),
            limit: Some(25),
            search: Some("  factories ".into()),
            sort_field: Some("name".into()),
            sort_order: Some(SortOrder::Desc),
            parent: None,
        };
        let pairs = q.to_pairs(None);
        let flat: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(
            flat,
            vec![
                ("page", "2"),
                ("limit", "25"),
                ("search", "factories"),
                ("sortField", "name"),
                ("sortOrder", "desc"),
            ]
        );
    }

    #[test]
    fn blank_search_and_missing_parent_param_are_dropped() {
        let q = ListQuery {
            search: Some("   ".into()),
            parent: Some("act-1".into()),
            ..ListQuery::default()
        };
        assert!(q.to_pairs(None).is_empty());
        assert_eq!(
            q.to_pairs(Some("act_id")),
            vec![("act_id".to_string(), "act-1".to_string())]
        );
    }

    #[test]
    fn sort_order_defaults_to_ascending() {
        let q = ListQuery {
            sort_field: Some("name".into()),
            ..ListQuery::default()
        };
        assert!(q.to_pairs(None).contains(&("sortOrder".to_string(), "asc".to_string())));
        assert_eq!(SortOrder::Asc.toggled(), SortOrder::Desc);
    }
}
