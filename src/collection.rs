//! Client-side state for one content collection
//!
//! A [`Collection`] owns the latest snapshot of a record list and keeps it
//! consistent under overlapping refreshes:
//!
//! - every refresh takes a generation number and only the newest one may
//!   replace the snapshot, so responses arriving out of order are dropped;
//! - every gateway call is bounded by a timeout;
//! - failed reads keep the previous snapshot and report through `on_error`;
//! - mutations are confirmed by the gateway before the list is refetched.

use log::{debug, error, info};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::aggregate::ContentFilter;
use crate::error::{Error, Result};
use crate::events::ChangeBus;
use crate::gateway::{CrudGateway, Repository};
use crate::models::{ContactMessage, ContactStatus, ContentKind, ContentRecord, Record};

/// Default bound on a gateway call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Receives a human-readable message for every failed call
pub type ErrorHandler = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Outcome of [`Collection::refresh`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Snapshot replaced with this many records
    Applied(usize),
    /// A newer refresh started meanwhile; the response was dropped
    Stale,
    /// The read failed; the previous snapshot is kept
    Failed,
}

/// What a list page should render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    /// Nothing could be loaded
    Unavailable(String),
    /// Loaded, but the collection has no records
    Empty,
    /// Records exist but none pass the current filters
    NoResults,
    Ready(usize),
}

impl ViewState {
    pub fn from_counts(load: &LoadState, total: usize, shown: usize) -> Self {
        if total == 0 {
            return match load {
                LoadState::Idle | LoadState::Loading => ViewState::Loading,
                LoadState::Failed(message) => ViewState::Unavailable(message.clone()),
                LoadState::Loaded => ViewState::Empty,
            };
        }
        if shown == 0 {
            ViewState::NoResults
        } else {
            ViewState::Ready(shown)
        }
    }
}

struct Snapshot<T> {
    records: Arc<Vec<T>>,
    load: LoadState,
}

pub struct Collection<T: Record> {
    repository: Repository<T>,
    timeout: Duration,
    bus: Option<ChangeBus>,
    on_error: Option<ErrorHandler>,
    generation: AtomicU64,
    snapshot: RwLock<Snapshot<T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(gateway: Arc<dyn CrudGateway>) -> Self {
        Self {
            repository: Repository::new(gateway),
            timeout: DEFAULT_TIMEOUT,
            bus: None,
            on_error: None,
            generation: AtomicU64::new(0),
            snapshot: RwLock::new(Snapshot {
                records: Arc::new(Vec::new()),
                load: LoadState::Idle,
            }),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Publish confirmed mutations on `bus`
    pub fn with_bus(mut self, bus: ChangeBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn on_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(handler));
        self
    }

    /// Current snapshot; never mutated after publication
    pub async fn records(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.snapshot.read().await.records)
    }

    pub async fn load_state(&self) -> LoadState {
        self.snapshot.read().await.load.clone()
    }

    fn report(&self, err: &Error) {
        error!("{} request failed: {}", T::KIND, err);
        if let Some(handler) = &self.on_error {
            handler(&err.to_string());
        }
    }

    async fn bounded<R, F>(&self, call: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(self.timeout)),
        }
    }

    /// Refetch the list; the last refresh to start is the one that counts
    pub async fn refresh(&self) -> Refresh {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.snapshot.write().await.load = LoadState::Loading;

        let result = self.bounded(self.repository.list()).await;

        let mut snapshot = self.snapshot.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("dropping stale {} response (generation {})", T::KIND, generation);
            return Refresh::Stale;
        }

        match result {
            Ok(records) => {
                let count = records.len();
                snapshot.records = Arc::new(records);
                snapshot.load = LoadState::Loaded;
                debug!("{} snapshot replaced with {} records", T::KIND, count);
                Refresh::Applied(count)
            }
            Err(err) => {
                snapshot.load = LoadState::Failed(err.to_string());
                drop(snapshot);
                self.report(&err);
                Refresh::Failed
            }
        }
    }

    /// Run a confirmed mutation, then notify and refetch
    async fn mutate<R, F>(&self, action: &str, call: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        match self.bounded(call).await {
            Ok(value) => {
                info!("{} {} confirmed", T::KIND, action);
                if let Some(bus) = &self.bus {
                    bus.publish(T::KIND);
                }
                self.refresh().await;
                Ok(value)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    pub async fn create<D: Serialize + Sync + ?Sized>(&self, data: &D) -> Result<T> {
        self.mutate("create", self.repository.create(data)).await
    }

    pub async fn update<D: Serialize + Sync + ?Sized>(&self, id: i64, data: &D) -> Result<T> {
        self.mutate("update", self.repository.update(id, data)).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.mutate("delete", self.repository.delete(id)).await
    }

    /// Record from the current snapshot
    pub async fn get(&self, id: i64) -> Option<T> {
        self.records().await.iter().find(|record| record.id() == id).cloned()
    }
}

impl<T: ContentRecord> Collection<T> {
    /// Records of the current snapshot passing `filter`
    pub async fn filtered(&self, filter: &ContentFilter) -> Vec<T> {
        let records = self.records().await;
        filter.apply(records.iter()).into_iter().cloned().collect()
    }

    pub async fn view_state(&self, filter: &ContentFilter) -> ViewState {
        let snapshot = self.snapshot.read().await;
        let shown = filter.apply(snapshot.records.iter()).len();
        ViewState::from_counts(&snapshot.load, snapshot.records.len(), shown)
    }

    /// Flip the visibility flag (`active`, `isActive` or `published`)
    pub async fn set_visible(&self, id: i64, visible: bool) -> Result<T> {
        let field = match T::KIND {
            ContentKind::BlogPost => "published",
            ContentKind::Project => "active",
            _ => "isActive",
        };
        let mut payload = Map::new();
        payload.insert(field.to_string(), Value::Bool(visible));
        self.update(id, &payload).await
    }
}

impl Collection<ContactMessage> {
    /// Move a message forward in the inbox workflow
    pub async fn set_status(&self, id: i64, status: ContactStatus) -> Result<ContactMessage> {
        let current = match self.get(id).await {
            Some(message) => message.status,
            None => {
                let err = Error::NotFound { kind: ContactMessage::KIND, id };
                self.report(&err);
                return Err(err);
            }
        };
        if let Err(err) = current.transition(status) {
            self.report(&err);
            return Err(err);
        }
        self.update(id, &json!({ "status": status })).await
    }
}

impl<T: Record> Collection<T> {
    /// Refetch whenever another view publishes a change of this kind.
    ///
    /// Returns `None` when the collection has no bus.
    pub fn watch(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut subscription = self.bus.as_ref()?.subscribe_to(&[T::KIND]);
        let collection = Arc::downgrade(self);
        Some(tokio::spawn(async move {
            while subscription.next().await.is_some() {
                match collection.upgrade() {
                    Some(collection) => {
                        collection.refresh().await;
                    }
                    None => break,
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{group_records, ContentFilter};
    use crate::gateway::MemoryGateway;
    use crate::models::Project;
    use std::sync::Mutex;

    async fn seeded() -> Arc<MemoryGateway> {
        let gateway = Arc::new(MemoryGateway::new());
        gateway
            .seed(
                ContentKind::Project,
                vec![
                    json!({
                        "id": 1,
                        "titleFr": "Adduction Oujda",
                        "category": "AEP",
                        "client": "ONEE"
                    }),
                    json!({ "id": 2, "titleFr": "Réseau Safi", "category": "AEP" }),
                    json!({ "id": 3, "titleFr": "STEP Agadir", "category": "Assainissement" }),
                ],
            )
            .await;
        gateway
    }

    fn collecting_errors() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |message: &str| sink.lock().unwrap().push(message.to_string()))
    }

    #[tokio::test]
    async fn refresh_replaces_snapshot() {
        let gateway = seeded().await;
        let projects: Collection<Project> = Collection::new(gateway);
        assert_eq!(projects.load_state().await, LoadState::Idle);

        assert_eq!(projects.refresh().await, Refresh::Applied(3));
        assert_eq!(projects.load_state().await, LoadState::Loaded);
        assert_eq!(projects.records().await.len(), 3);
    }

    #[tokio::test]
    async fn failed_read_keeps_previous_snapshot() {
        let gateway = seeded().await;
        let (errors, handler) = collecting_errors();
        let projects: Collection<Project> = Collection::new(gateway.clone()).on_error(handler);
        projects.refresh().await;

        gateway.fail_next(ContentKind::Project, 500, "base indisponible").await;
        assert_eq!(projects.refresh().await, Refresh::Failed);

        assert_eq!(projects.records().await.len(), 3);
        assert!(matches!(projects.load_state().await, LoadState::Failed(_)));
        let errors = errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("base indisponible"));
    }

    #[tokio::test]
    async fn delete_drops_one_record_and_one_category_count() {
        let gateway = seeded().await;
        let (errors, handler) = collecting_errors();
        let projects: Collection<Project> = Collection::new(gateway).on_error(handler);
        projects.refresh().await;

        let before = projects.records().await;
        let aep_before = group_records(before.iter(), None).get("AEP").map(|g| g.count());
        assert_eq!(aep_before, Some(2));

        projects.delete(2).await.unwrap();
        let after = projects.records().await;
        assert_eq!(after.len(), before.len() - 1);
        let aep_after = group_records(after.iter(), None).get("AEP").map(|g| g.count());
        assert_eq!(aep_after, Some(1));

        let err = projects.delete(2).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 2, .. }));
        assert_eq!(projects.records().await.len(), after.len());
        assert_eq!(errors.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_state_untouched() {
        let gateway = seeded().await;
        let projects: Collection<Project> = Collection::new(gateway.clone());
        projects.refresh().await;
        let calls = gateway.calls().await;

        gateway.fail_next(ContentKind::Project, 422, "titre requis").await;
        let err = projects.create(&json!({ "category": "AEP" })).await.unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert_eq!(projects.records().await.len(), 3);
        // no refetch after a failed write
        assert_eq!(gateway.calls().await, calls + 1);
    }

    #[tokio::test]
    async fn confirmed_mutation_publishes_change() {
        let gateway = seeded().await;
        let bus = ChangeBus::default();
        let mut subscription = bus.subscribe();
        let projects: Collection<Project> = Collection::new(gateway).with_bus(bus);

        let created = projects
            .create(&json!({ "titleFr": "Barrage collinaire", "category": "Barrages" }))
            .await
            .unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(subscription.next().await.map(|e| e.kind), Some(ContentKind::Project));
        assert!(projects.get(4).await.is_some());
    }

    #[tokio::test]
    async fn set_visible_uses_the_kind_specific_flag() {
        let gateway = seeded().await;
        let projects: Collection<Project> = Collection::new(gateway.clone());
        projects.refresh().await;

        let hidden = projects.set_visible(1, false).await.unwrap();
        assert!(!hidden.active);
        let row: Vec<Value> = gateway.rows(ContentKind::Project).await;
        assert_eq!(row[0]["active"], false);

        let public = projects.filtered(&ContentFilter::new().visible_only()).await;
        assert_eq!(public.len(), 2);
    }

    #[tokio::test]
    async fn view_state_tells_empty_from_no_results() {
        let gateway = Arc::new(MemoryGateway::new());
        let projects: Collection<Project> = Collection::new(gateway.clone());
        let filter = ContentFilter::new().with_search("introuvable");

        assert_eq!(projects.view_state(&filter).await, ViewState::Loading);
        projects.refresh().await;
        assert_eq!(projects.view_state(&filter).await, ViewState::Empty);

        gateway
            .seed(ContentKind::Project, vec![json!({ "id": 1, "titleFr": "Projet" })])
            .await;
        projects.refresh().await;
        assert_eq!(projects.view_state(&filter).await, ViewState::NoResults);
        assert_eq!(projects.view_state(&ContentFilter::new()).await, ViewState::Ready(1));
    }

    #[tokio::test]
    async fn contact_status_only_moves_forward() {
        let gateway = Arc::new(MemoryGateway::new());
        gateway
            .seed(
                ContentKind::Contact,
                vec![json!({
                    "id": 1,
                    "name": "Nadia",
                    "email": "n@example.ma",
                    "message": "Devis",
                    "status": "lu"
                })],
            )
            .await;
        let inbox: Collection<ContactMessage> = Collection::new(gateway);
        inbox.refresh().await;

        let err = inbox.set_status(1, ContactStatus::New).await.unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));

        let handled = inbox.set_status(1, ContactStatus::Handled).await.unwrap();
        assert_eq!(handled.status, ContactStatus::Handled);
        assert!(matches!(
            inbox.set_status(9, ContactStatus::Read).await,
            Err(Error::NotFound { id: 9, .. })
        ));
    }
}
