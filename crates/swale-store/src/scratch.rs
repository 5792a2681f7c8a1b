//! Scoped scratch workspaces for staging intermediate datasets.
//!
//! Each scratch workspace gets a process-unique generated name, registered
//! while it is alive so two concurrent callers can never collide, and the
//! registration plus contents are released on drop — on every exit path.

use std::collections::HashSet;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, OnceLock};

use uuid::Uuid;

use crate::Workspace;

fn registry() -> &'static Mutex<HashSet<String>> {
    static REGISTRY: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashSet::new()))
}

/// A temporary [`Workspace`] with a generated unique name.
#[derive(Debug)]
pub struct ScratchWorkspace {
    workspace: Workspace,
}

impl ScratchWorkspace {
    pub fn new() -> Self {
        let mut names = registry().lock().expect("scratch registry poisoned");
        let name = loop {
            let candidate = format!("scratch_{}", Uuid::new_v4().simple());
            if names.insert(candidate.clone()) {
                break candidate;
            }
        };
        drop(names);
        Self {
            workspace: Workspace::new(name).expect("generated scratch name is never empty"),
        }
    }
}

impl Default for ScratchWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ScratchWorkspace {
    type Target = Workspace;

    fn deref(&self) -> &Workspace {
        &self.workspace
    }
}

impl DerefMut for ScratchWorkspace {
    fn deref_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }
}

impl Drop for ScratchWorkspace {
    fn drop(&mut self) {
        self.workspace.clear();
        if let Ok(mut names) = registry().lock() {
            names.remove(self.workspace.name());
        }
    }
}

/// True while a scratch workspace with this name is alive.
pub fn is_scratch_active(name: &str) -> bool {
    registry()
        .lock()
        .map(|names| names.contains(name))
        .unwrap_or(false)
}
