//! `swale-store` is the working boundary between operations and datasets:
//! named workspaces that catalog feature classes, deep dataset copies, and
//! scoped scratch workspaces for staging intermediates.

mod scratch;
mod workspace;

pub use scratch::{is_scratch_active, ScratchWorkspace};
pub use workspace::{copy_dataset, Overwrite, Result, StoreError, Workspace};
