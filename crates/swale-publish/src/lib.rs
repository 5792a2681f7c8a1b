//! `swale-publish` stages curated dataset snapshots for publication: archive
//! copies under date-stamped names, delete-then-copy pushes to a loading
//! dock, and the area bookkeeping that publication schemas expect.

mod area;
mod snapshot;

use thiserror::Error;

use swale_model::DatasetError;
use swale_store::StoreError;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

pub type Result<T> = std::result::Result<T, PublishError>;

pub use area::{calc_area_field, AreaUnit, SQUARE_FEET_PER_ACRE};
pub use snapshot::{archive_snapshot, date_stamped_name, replace_datasets, ReplaceOutcome};
