//! In-memory gateway for previews and tests

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

use super::CrudGateway;
use crate::error::{Error, Result};
use crate::models::ContentKind;

#[derive(Default)]
struct MemoryState {
    rows: HashMap<ContentKind, Vec<Value>>,
    next_id: i64,
    failures: HashMap<ContentKind, VecDeque<(u16, String)>>,
    calls: usize,
}

impl MemoryState {
    fn take_failure(&mut self, kind: ContentKind) -> Result<()> {
        self.calls += 1;
        match self.failures.get_mut(&kind).and_then(VecDeque::pop_front) {
            Some((status, message)) => Err(Error::server(status, message)),
            None => Ok(()),
        }
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Stores rows as JSON and behaves like the admin API: ids are assigned on
/// create and never reused, updates merge fields, deleting an unknown id
/// fails with [`Error::NotFound`].
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

fn row_id(row: &Value) -> Option<i64> {
    row.get("id").and_then(Value::as_i64)
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows of `kind`
    pub async fn seed(&self, kind: ContentKind, rows: Vec<Value>) {
        let mut state = self.state.lock().await;
        let highest = rows.iter().filter_map(row_id).max().unwrap_or(0);
        state.next_id = state.next_id.max(highest);
        state.rows.insert(kind, rows);
    }

    /// Make the next call on `kind` fail with a server error
    pub async fn fail_next(&self, kind: ContentKind, status: u16, message: &str) {
        let mut state = self.state.lock().await;
        state
            .failures
            .entry(kind)
            .or_default()
            .push_back((status, message.to_string()));
    }

    pub async fn rows(&self, kind: ContentKind) -> Vec<Value> {
        let state = self.state.lock().await;
        state.rows.get(&kind).cloned().unwrap_or_default()
    }

    /// Total calls received, failed ones included
    pub async fn calls(&self) -> usize {
        self.state.lock().await.calls
    }
}

fn as_object(data: Value) -> Result<Map<String, Value>> {
    match data {
        Value::Object(map) => Ok(map),
        other => Err(Error::server(400, format!("expected a JSON object, got {}", other))),
    }
}

#[async_trait]
impl CrudGateway for MemoryGateway {
    async fn list(&self, kind: ContentKind) -> Result<Vec<Value>> {
        let mut state = self.state.lock().await;
        state.take_failure(kind)?;
        Ok(state.rows.get(&kind).cloned().unwrap_or_default())
    }

    async fn create(&self, kind: ContentKind, data: Value) -> Result<Value> {
        let mut state = self.state.lock().await;
        state.take_failure(kind)?;
        let mut row = as_object(data)?;
        let id = state.allocate_id();
        row.insert("id".to_string(), Value::from(id));
        let row = Value::Object(row);
        state.rows.entry(kind).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, kind: ContentKind, id: i64, data: Value) -> Result<Value> {
        let mut state = self.state.lock().await;
        state.take_failure(kind)?;
        let changes = as_object(data)?;
        let row = state
            .rows
            .get_mut(&kind)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id)))
            .ok_or(Error::NotFound { kind, id })?;
        if let Some(fields) = row.as_object_mut() {
            for (key, value) in changes {
                if key != "id" {
                    fields.insert(key, value);
                }
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, kind: ContentKind, id: i64) -> Result<()> {
        let mut state = self.state.lock().await;
        state.take_failure(kind)?;
        let rows = state.rows.entry(kind).or_default();
        match rows.iter().position(|row| row_id(row) == Some(id)) {
            Some(index) => {
                rows.remove(index);
                Ok(())
            }
            None => Err(Error::NotFound { kind, id }),
        }
    }
}
