//! The CRUD boundary between content views and the backend
//!
//! [`CrudGateway`] moves untyped JSON; [`Repository`] sits on top of it and
//! validates every record on the way in, so aggregation code only ever
//! sees well-formed values.

mod contact;
mod http;
mod memory;
mod upload;

use async_trait::async_trait;
use log::warn;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{ContentKind, Record};

pub use contact::*;
pub use http::*;
pub use memory::*;
pub use upload::*;

/// List/create/update/delete over one backend
#[async_trait]
pub trait CrudGateway: Send + Sync {
    async fn list(&self, kind: ContentKind) -> Result<Vec<Value>>;

    async fn create(&self, kind: ContentKind, data: Value) -> Result<Value>;

    async fn update(&self, kind: ContentKind, id: i64, data: Value) -> Result<Value>;

    /// Fails with [`Error::NotFound`] when `id` does not exist
    async fn delete(&self, kind: ContentKind, id: i64) -> Result<()>;
}

/// Parse one wire record, rejecting anything malformed
pub fn parse_record<T: Record>(value: Value) -> Result<T> {
    let data: T::Data = serde_json::from_value(value)
        .map_err(|e| Error::validation(format!("malformed {}: {}", T::KIND, e)))?;
    T::from_wire(data)
}

/// Parse a list response, skipping rows that fail validation
pub fn parse_records<T: Record>(values: Vec<Value>) -> Vec<T> {
    let total = values.len();
    let records: Vec<T> = values
        .into_iter()
        .filter_map(|value| match parse_record::<T>(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("dropping {} row: {}", T::KIND, err);
                None
            }
        })
        .collect();
    if records.len() < total {
        warn!("{} of {} {} rows were invalid", total - records.len(), total, T::KIND);
    }
    records
}

/// Typed access to one collection through a gateway
pub struct Repository<T> {
    gateway: Arc<dyn CrudGateway>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            _record: PhantomData,
        }
    }
}

impl<T: Record> Repository<T> {
    pub fn new(gateway: Arc<dyn CrudGateway>) -> Self {
        Self {
            gateway,
            _record: PhantomData,
        }
    }

    pub fn kind(&self) -> ContentKind {
        T::KIND
    }

    pub async fn list(&self) -> Result<Vec<T>> {
        let values = self.gateway.list(T::KIND).await?;
        Ok(parse_records(values))
    }

    pub async fn create<D: Serialize + ?Sized>(&self, data: &D) -> Result<T> {
        let value = serde_json::to_value(data)?;
        let created = self.gateway.create(T::KIND, value).await?;
        parse_record(created)
    }

    pub async fn update<D: Serialize + ?Sized>(&self, id: i64, data: &D) -> Result<T> {
        let value = serde_json::to_value(data)?;
        let updated = self.gateway.update(T::KIND, id, value).await?;
        parse_record(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.gateway.delete(T::KIND, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Partner, Project};
    use serde_json::json;

    #[test]
    fn list_parsing_skips_invalid_rows() {
        let rows = vec![
            json!({ "id": 1, "titleFr": "Valide" }),
            json!({ "titleFr": "Sans id" }),
            json!({ "id": "pas un nombre", "titleFr": "Mauvais type" }),
            json!({ "id": 2, "titleFr": "Valide aussi" }),
        ];
        let projects: Vec<Project> = parse_records(rows);
        assert_eq!(projects.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn single_record_parsing_reports_the_kind() {
        let err = parse_record::<Partner>(json!({ "id": 3 })).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("partner"));
    }

    #[tokio::test]
    async fn repository_round_trips_through_gateway() {
        let gateway = Arc::new(MemoryGateway::new());
        let repo: Repository<Project> = Repository::new(gateway.clone());

        let created = repo
            .create(&json!({ "titleFr": "Station de traitement", "category": "AEP" }))
            .await
            .unwrap();
        let updated = repo.update(created.id, &json!({ "active": false })).await.unwrap();
        assert!(!updated.active);
        assert_eq!(updated.category.as_deref(), Some("AEP"));

        repo.delete(created.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
