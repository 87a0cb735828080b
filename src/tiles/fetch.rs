//! TileJSON retrieval

use crate::core::config::FetchOptions;
use crate::data::tilejson::TileJson;
use crate::{MapError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};

/// Source of TileJSON documents.
///
/// Any transport failure, non-2xx status, or undecodable body is an error;
/// callers treat them all as "fetch failed".
#[async_trait]
pub trait TileJsonClient: Send + Sync {
    async fn fetch_tilejson(&self, url: &str) -> Result<TileJson>;
}

/// `reqwest` backed client
pub struct HttpTileJsonClient {
    client: reqwest::Client,
    options: FetchOptions,
}

impl HttpTileJsonClient {
    pub fn new(options: FetchOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("tmsview/", env!("CARGO_PKG_VERSION")))
            .cookie_store(options.include_credentials);
        if let Some(timeout) = options.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            options,
        })
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }
}

#[async_trait]
impl TileJsonClient for HttpTileJsonClient {
    async fn fetch_tilejson(&self, url: &str) -> Result<TileJson> {
        log::info!("fetching TileJSON from {}", url);

        let mut request = self.client.get(url);
        if self.options.json_content_type {
            request = request.header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let response = request.send().await?;
        let status = response.status();
        log::debug!("TileJSON response status {}", status);
        if !status.is_success() {
            return Err(MapError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let document = TileJson::from_slice(&body)?;
        log::debug!(
            "parsed TileJSON with {} tile template(s), zoom {:?}..{:?}",
            document.tiles.len(),
            document.minzoom,
            document.maxzoom
        );
        Ok(document)
    }
}
