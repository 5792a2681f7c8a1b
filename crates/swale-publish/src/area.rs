use swale_model::{FeatureClass, Value};

use crate::Result;

pub const SQUARE_FEET_PER_ACRE: f64 = 43_560.0;

/// Unit for [`calc_area_field`]. Dataset coordinates are assumed to be in
/// feet, as in a state-plane projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaUnit {
    SquareFeet,
    Acres,
}

impl AreaUnit {
    fn convert(self, square_feet: f64) -> f64 {
        match self {
            AreaUnit::SquareFeet => square_feet,
            AreaUnit::Acres => square_feet / SQUARE_FEET_PER_ACRE,
        }
    }
}

/// Computes each polygon's area into `field`, converted to `unit` and
/// rounded to `decimals` places. Records without geometry are skipped.
/// Returns the number of records written.
pub fn calc_area_field(
    fc: &mut FeatureClass,
    field: &str,
    unit: AreaUnit,
    decimals: u32,
) -> Result<usize> {
    log::info!("calculating {field} for {}", fc.name());
    let scale = 10f64.powi(decimals as i32);
    let mut updated = 0;
    let mut cursor = fc.update(&[field])?;
    while let Some(mut row) = cursor.next_row() {
        let Some(area) = row.geometry().map(|g| g.area()) else {
            continue;
        };
        let value = (unit.convert(area) * scale).round() / scale;
        row.set(0, Value::Double(value))?;
        updated += 1;
    }
    Ok(updated)
}
