use std::collections::BTreeMap;

use thiserror::Error;

use swale_model::{sanitize_name, DatasetError, FeatureClass};

/// Errors raised by workspace catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("workspace name cannot be empty")]
    EmptyWorkspaceName,
    #[error("dataset name {0:?} contains characters the store rejects")]
    InvalidDatasetName(String),
    #[error("dataset {0:?} not found in workspace")]
    DatasetNotFound(String),
    #[error("dataset {0:?} already exists in workspace")]
    DatasetExists(String),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Whether an insert may replace an existing dataset of the same name.
///
/// The explicit flag mirrors the overwrite-output switch geographic stores
/// expose process-wide; here it travels with each call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwrite {
    Allow,
    Deny,
}

/// A named catalog of datasets, the working analogue of a file geodatabase.
///
/// Dataset names must already be store-safe (see
/// [`sanitize_name`](swale_model::sanitize_name)); lookup is by exact name.
#[derive(Debug, Clone)]
pub struct Workspace {
    name: String,
    datasets: BTreeMap<String, FeatureClass>,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(StoreError::EmptyWorkspaceName);
        }
        Ok(Self {
            name,
            datasets: BTreeMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contains(&self, dataset: &str) -> bool {
        self.datasets.contains_key(dataset)
    }

    /// Dataset names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.datasets.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Adds `dataset` under its own name.
    pub fn insert(&mut self, dataset: FeatureClass, overwrite: Overwrite) -> Result<()> {
        let name = dataset.name().to_string();
        if name != sanitize_name(&name) {
            return Err(StoreError::InvalidDatasetName(name));
        }
        if overwrite == Overwrite::Deny && self.datasets.contains_key(&name) {
            return Err(StoreError::DatasetExists(name));
        }
        self.datasets.insert(name, dataset);
        Ok(())
    }

    pub fn dataset(&self, name: &str) -> Result<&FeatureClass> {
        self.datasets
            .get(name)
            .ok_or_else(|| StoreError::DatasetNotFound(name.to_string()))
    }

    pub fn dataset_mut(&mut self, name: &str) -> Result<&mut FeatureClass> {
        self.datasets
            .get_mut(name)
            .ok_or_else(|| StoreError::DatasetNotFound(name.to_string()))
    }

    /// Removes and returns a dataset.
    pub fn remove(&mut self, name: &str) -> Result<FeatureClass> {
        self.datasets
            .remove(name)
            .ok_or_else(|| StoreError::DatasetNotFound(name.to_string()))
    }

    /// Drops every dataset in the workspace.
    pub fn clear(&mut self) {
        self.datasets.clear();
    }
}

/// Deep-copies a dataset from one workspace into another under `new_name`.
///
/// The snapshot is independent of the source: later edits to either side do
/// not affect the other.
pub fn copy_dataset(
    src: &Workspace,
    name: &str,
    dst: &mut Workspace,
    new_name: &str,
    overwrite: Overwrite,
) -> Result<()> {
    let mut copy = src.dataset(name)?.clone();
    copy.set_name(new_name)?;
    dst.insert(copy, overwrite)
}
