//! Highest ticketed-point-mileage carrier.

use indexmap::IndexMap;
use tracing::trace;

use crate::domain::{CarrierCode, TravelSegment};

use super::mileage::MileageSource;

/// Carrier flying the most ticketed point mileage across `segments`.
///
/// Mileage is summed per carrier over air segments; a segment with unknown
/// mileage contributes nothing. The strictly greatest total wins, so on a
/// tie the carrier encountered first keeps the lead. Returns `None` when
/// there are no air segments.
pub fn highest_tpm_carrier(
    segments: &[&TravelSegment],
    mileage: &dyn MileageSource,
) -> Option<CarrierCode> {
    let mut totals: IndexMap<CarrierCode, u64> = IndexMap::new();
    for seg in segments.iter().filter(|s| s.is_air()) {
        let miles = mileage.segment_mileage(seg).unwrap_or(0);
        *totals.entry(seg.carrier_or_industry()).or_insert(0) += u64::from(miles);
    }

    let mut best: Option<(CarrierCode, u64)> = None;
    for (&carrier, &total) in &totals {
        match best {
            Some((_, best_total)) if total <= best_total => {}
            _ => best = Some((carrier, total)),
        }
    }

    if let Some((carrier, total)) = best {
        trace!(carrier = %carrier, miles = total, "highest TPM carrier");
    }
    best.map(|(carrier, _)| carrier)
}
