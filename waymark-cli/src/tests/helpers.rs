//! Test helpers: scripted client builders and scratch workspaces.

use std::cell::RefCell;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use waymark_core::test_support::ScriptedSearchClient;
use waymark_core::{LatLng, SearchClient};

use crate::CliError;
use crate::client::{ClientBuilder, ClientConfig};

/// Hands out a prepared [`ScriptedSearchClient`] and remembers the config.
#[derive(Debug, Default)]
pub(super) struct ScriptedClientBuilder {
    client: RefCell<Option<ScriptedSearchClient>>,
    seen: RefCell<Option<ClientConfig>>,
}

impl ScriptedClientBuilder {
    pub(super) fn new(client: ScriptedSearchClient) -> Self {
        Self {
            client: RefCell::new(Some(client)),
            seen: RefCell::new(None),
        }
    }

    pub(super) fn seen(&self) -> Option<ClientConfig> {
        self.seen.borrow().clone()
    }
}

impl ClientBuilder for ScriptedClientBuilder {
    fn build(&self, config: &ClientConfig) -> Result<Box<dyn SearchClient>, CliError> {
        self.seen.replace(Some(config.clone()));
        let client = self
            .client
            .borrow_mut()
            .take()
            .expect("scripted client is built once per run");
        Ok(Box::new(client))
    }
}

/// A client that geocodes `Paris` and serves pages of two and one records.
pub(super) fn paris_client() -> ScriptedSearchClient {
    ScriptedSearchClient::with_page_sizes(&[2, 1])
        .with_geocode("Paris", &[LatLng::new(48.8566, 2.3522)])
}

/// Temporary directory exposed as a UTF-8 path.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }
}
