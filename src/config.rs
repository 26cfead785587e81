//! Configuration resolution.
//!
//! The engine owns a long-lived base [`Config`]; each Verify call may
//! supply a short-lived [`Options`] delta. Merging follows one rule: a
//! field the delta explicitly set overrides the base, an unset field never
//! does. The approval flag only propagates forward within a merge; a
//! non-approving delta cannot unset an approving base.

use std::sync::Arc;

use crate::scrub::Scrubber;

pub(crate) const DEFAULT_FOLDER: &str = "__snapshots";
pub(crate) const DEFAULT_EXTENSION: &str = ".snap";
/// Master snapshots hold structured records, so they carry a JSON-flavored
/// extension by default.
pub(crate) const MASTER_EXTENSION: &str = ".snap.json";

/// Resolved configuration for one Verify invocation.
#[derive(Clone)]
pub(crate) struct Config {
    pub(crate) folder: String,
    pub(crate) name: Option<String>,
    pub(crate) ext: String,
    pub(crate) approve: bool,
    pub(crate) scrubbers: Vec<Arc<dyn Scrubber>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            folder: DEFAULT_FOLDER.to_string(),
            name: None,
            ext: DEFAULT_EXTENSION.to_string(),
            approve: false,
            scrubbers: Vec::new(),
        }
    }
}

impl Config {
    /// Produces the effective configuration for one call. Neither input is
    /// mutated.
    pub(crate) fn merge(&self, delta: &Options) -> Config {
        Config {
            folder: delta
                .folder
                .clone()
                .unwrap_or_else(|| self.folder.clone()),
            name: delta.name.clone().or_else(|| self.name.clone()),
            ext: delta.ext.clone().unwrap_or_else(|| self.ext.clone()),
            approve: self.approve || delta.approve,
            scrubbers: if delta.scrubbers.is_empty() {
                self.scrubbers.clone()
            } else {
                delta.scrubbers.clone()
            },
        }
    }

    /// Deterministic snapshot path for this configuration. The name
    /// defaults to the invoking test's identity; joining always uses
    /// forward slashes so paths are identical across platforms.
    pub(crate) fn snapshot_path(&self, test_name: &str) -> String {
        let name = self.name.as_deref().unwrap_or(test_name);
        format!("{}/{}{}", self.folder, name, self.ext)
    }

    pub(crate) fn approval_mode(&self) -> bool {
        self.approve
    }
}

/// Per-call options for a single Verify or Master invocation, applied as a
/// delta over the engine's defaults. Each setter is independent and
/// composable; setting the same field twice keeps the last write.
#[derive(Clone, Default)]
pub struct Options {
    pub(crate) folder: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) ext: Option<String>,
    pub(crate) approve: bool,
    pub(crate) scrubbers: Vec<Arc<dyn Scrubber>>,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    /// Uses `name` as the snapshot file name instead of the test identity.
    pub fn snapshot(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Stores the snapshot under `folder` instead of the default one.
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Uses `ext` as the snapshot file extension.
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    /// Runs this call in approval mode: the snapshot is regenerated and
    /// the test fails until the option is removed. Per call, never sticky.
    pub fn wait_approval(mut self) -> Self {
        self.approve = true;
        self
    }

    /// Appends a scrubber, applied after any previously added one.
    pub fn scrub<S: Scrubber + 'static>(mut self, scrubber: S) -> Self {
        self.scrubbers.push(Arc::new(scrubber));
        self
    }

    /// Overlays `other` on top of self: fields `other` set win.
    pub(crate) fn overlay(mut self, other: &Options) -> Options {
        if other.folder.is_some() {
            self.folder = other.folder.clone();
        }
        if other.name.is_some() {
            self.name = other.name.clone();
        }
        if other.ext.is_some() {
            self.ext = other.ext.clone();
        }
        self.approve = self.approve || other.approve;
        if !other.scrubbers.is_empty() {
            self.scrubbers = other.scrubbers.clone();
        }
        self
    }
}
