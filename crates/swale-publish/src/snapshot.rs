use chrono::NaiveDate;

use swale_store::{copy_dataset, Overwrite, Workspace};

use crate::Result;

/// Archive naming convention: `{base}_{MMDDYYYY}`.
pub fn date_stamped_name(base: &str, date: NaiveDate) -> String {
    format!("{base}_{}", date.format("%m%d%Y"))
}

/// Copies each named dataset from `src` into `archive` under its
/// date-stamped name, overwriting a same-day snapshot if one exists.
/// Returns the archived names in input order.
pub fn archive_snapshot(
    src: &Workspace,
    names: &[(&str, &str)],
    archive: &mut Workspace,
    date: NaiveDate,
) -> Result<Vec<String>> {
    let mut archived = Vec::with_capacity(names.len());
    for (dataset, base) in names {
        let stamped = date_stamped_name(base, date);
        log::info!("archiving {dataset} as {stamped}");
        copy_dataset(src, dataset, archive, &stamped, Overwrite::Allow)?;
        archived.push(stamped);
    }
    Ok(archived)
}

/// What [`replace_datasets`] did with one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// An old version was deleted before the copy.
    Replaced,
    /// Nothing to delete; the dataset is new to the destination.
    Added,
}

/// Loading-dock push: for each named dataset, delete any existing version in
/// `dest`, then copy the current one from `src`.
pub fn replace_datasets(
    src: &Workspace,
    names: &[&str],
    dest: &mut Workspace,
) -> Result<Vec<(String, ReplaceOutcome)>> {
    let mut outcomes = Vec::with_capacity(names.len());
    for name in names {
        let outcome = if dest.contains(name) {
            log::info!("deleting {name} from {}", dest.name());
            dest.remove(name)?;
            ReplaceOutcome::Replaced
        } else {
            ReplaceOutcome::Added
        };
        log::info!("copying {name} from {} to {}", src.name(), dest.name());
        copy_dataset(src, name, dest, name, Overwrite::Deny)?;
        outcomes.push((name.to_string(), outcome));
    }
    Ok(outcomes)
}
