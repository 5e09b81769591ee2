//! Gateway backed by the site's JSON admin API

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::CrudGateway;
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::fetch::{Fetch, FetchBuilder};
use crate::models::ContentKind;

/// Talks to `{base}/{admin_prefix}/{endpoint}`.
///
/// Single records are always addressed by path segment:
/// `PUT .../projects/12`, `DELETE .../projects/12`.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base_url: Url,
    client: Client,
    options: ClientOptions,
}

/// Base URLs must end in a slash for `Url::join` to append to them
fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(Error::config(format!("{} cannot be used as a base URL", raw)));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn not_found(kind: ContentKind, id: i64) -> impl FnOnce(Error) -> Error {
    move |err| match err {
        Error::Server { status: 404, .. } => Error::NotFound { kind, id },
        other => other,
    }
}

impl HttpGateway {
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self> {
        let client = Client::builder().timeout(options.request_timeout).build()?;
        Self::with_client(base_url, client, options)
    }

    pub fn with_client(base_url: &str, client: Client, options: ClientOptions) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base(base_url)?,
            client,
            options,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// URL of a public (non-admin) route such as `api/contact`
    pub(crate) fn site_url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub fn collection_url(&self, kind: ContentKind) -> Result<Url> {
        self.site_url(&format!("{}/{}", self.options.admin_prefix, kind.endpoint()))
    }

    pub fn record_url(&self, kind: ContentKind, id: i64) -> Result<Url> {
        self.site_url(&format!("{}/{}/{}", self.options.admin_prefix, kind.endpoint(), id))
    }

    pub(crate) fn request<'a>(&self, builder: FetchBuilder<'a>) -> FetchBuilder<'a> {
        builder.header("X-Client-Info", &self.options.client_info)
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl CrudGateway for HttpGateway {
    async fn list(&self, kind: ContentKind) -> Result<Vec<Value>> {
        let url = self.collection_url(kind)?;
        let rows: Vec<Value> = self.request(Fetch::get(&self.client, url)).execute().await?;
        debug!("fetched {} {} rows", rows.len(), kind);
        Ok(rows)
    }

    async fn create(&self, kind: ContentKind, data: Value) -> Result<Value> {
        let url = self.collection_url(kind)?;
        self.request(Fetch::post(&self.client, url))
            .json(&data)?
            .execute()
            .await
    }

    async fn update(&self, kind: ContentKind, id: i64, data: Value) -> Result<Value> {
        let url = self.record_url(kind, id)?;
        self.request(Fetch::put(&self.client, url))
            .json(&data)?
            .execute()
            .await
            .map_err(not_found(kind, id))
    }

    async fn delete(&self, kind: ContentKind, id: i64) -> Result<()> {
        let url = self.record_url(kind, id)?;
        self.request(Fetch::delete(&self.client, url))
            .execute_empty()
            .await
            .map_err(not_found(kind, id))
    }
}
