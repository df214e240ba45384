//! Image object stores
//!
//! Blobs are addressed by the opaque identifiers generated in
//! `medrec_core::ident`; the stores never invent or rewrite keys.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::error::{Result, StorageError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Write-side interface to the object store holding patient images.
///
/// Reads happen out of band: objects are publicly fetchable at
/// `<public-base><key>`, so the API never proxies blob content.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<()>;

    /// Delete an object. Deleting a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// S3-compatible object store driven over plain HTTP.
///
/// Talks to `<endpoint>/<bucket>/<key>` with PUT and DELETE, authenticating
/// with a bearer token when one is configured.
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpObjectStore {
    pub fn new(endpoint: &str, bucket: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
            token,
        })
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, key: &str, content_type: &str, body: Vec<u8>) -> Result<()> {
        let request = self
            .client
            .put(self.url_for(key))
            .header(CONTENT_TYPE, content_type)
            .body(body);

        let response = self.authorize(request).send().await?;
        if !response.status().is_success() {
            return Err(StorageError::ObjectStore {
                key: key.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let request = self.client.delete(self.url_for(key));
        let response = self.authorize(request).send().await?;

        // A missing object is already the state delete asks for.
        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            return Err(StorageError::ObjectStore {
                key: key.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

/// Local-directory object store for development and tests.
///
/// One file per key under `root`; content types are not preserved, the
/// static file layer serving the directory sniffs them instead.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, key: &str, _content_type: &str, body: Vec<u8>) -> Result<()> {
        tokio::fs::write(self.path_for(key), body).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
