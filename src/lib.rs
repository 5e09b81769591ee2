//! Waman content client
//!
//! Data layer of the Waman bilingual (French/English) site and CMS: a typed
//! gateway over the admin JSON API, collection state with last-request-wins
//! refreshes, and the read-only views built on top of it (category grouping,
//! multi-field search, counters, public visibility rules, map markers).

pub mod aggregate;
pub mod collection;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod gateway;
pub mod geo;
pub mod models;

use std::sync::Arc;

use crate::collection::Collection;
use crate::config::{ClientOptions, ENV_API_URL};
use crate::error::{Error, Result};
use crate::events::ChangeBus;
use crate::gateway::{CrudGateway, HttpGateway, Repository};
use crate::models::{ActivityCategory, Record};

/// The main entry point for the content client
pub struct Waman {
    gateway: Arc<HttpGateway>,
    bus: ChangeBus,
    options: ClientOptions,
}

impl Waman {
    /// Create a new client for the site at `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use waman_content::Waman;
    ///
    /// let waman = Waman::new("https://www.waman.ma").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::new_with_options(base_url, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use waman_content::{Waman, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_request_timeout(Duration::from_secs(5));
    /// let waman = Waman::new_with_options("https://www.waman.ma", options).unwrap();
    /// ```
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Result<Self> {
        let gateway = HttpGateway::new(base_url, options.clone())?;
        Ok(Self {
            gateway: Arc::new(gateway),
            bus: ChangeBus::new(options.change_bus_capacity),
            options,
        })
    }

    /// Create a client from `WAMAN_API_URL` and optional `WAMAN_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(ENV_API_URL)
            .map_err(|_| Error::config(format!("{} environment variable not found", ENV_API_URL)))?;
        Self::new_with_options(&url, ClientOptions::from_env()?)
    }

    /// The HTTP gateway, for contact submission and uploads
    pub fn http(&self) -> &HttpGateway {
        &self.gateway
    }

    pub fn gateway(&self) -> Arc<dyn CrudGateway> {
        self.gateway.clone()
    }

    /// Bus shared by every collection created from this client
    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Typed one-shot access to a collection
    pub fn repository<T: Record>(&self) -> Repository<T> {
        Repository::new(self.gateway())
    }

    /// Stateful collection wired to this client's timeout and change bus
    ///
    /// # Example
    ///
    /// ```no_run
    /// use waman_content::{Waman, models::Project};
    ///
    /// # async fn run() -> waman_content::error::Result<()> {
    /// let waman = Waman::new("https://www.waman.ma")?;
    /// let projects = waman.collection::<Project>();
    /// projects.refresh().await;
    /// # Ok(())
    /// # }
    /// ```
    pub fn collection<T: Record>(&self) -> Collection<T> {
        Collection::new(self.gateway())
            .with_timeout(self.options.request_timeout)
            .with_bus(self.bus.clone())
    }

    /// The activity category tree with nested subcategories and activities
    pub async fn activity_categories(&self) -> Result<Vec<ActivityCategory>> {
        self.repository::<ActivityCategory>().list().await
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::aggregate::{
        group_activities, group_by, group_records, public_blog_posts, public_records, search,
        search_records, CategoryCatalog, CategoryInfo, ContentFilter, ContentStats,
    };
    pub use crate::collection::{Collection, LoadState, Refresh, ViewState};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::events::ChangeBus;
    pub use crate::gateway::{CrudGateway, HttpGateway, Repository};
    pub use crate::geo::{GeoPoint, GeoTable};
    pub use crate::models::{
        Activity, ActivityCategory, BlogPost, ContactForm, ContactMessage, ContactStatus,
        ContentKind, ContentRecord, Language, Partner, Project, Record,
    };
    pub use crate::Waman;
}
