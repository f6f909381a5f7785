//! Minimum connection time between consecutive legs.

use tracing::{debug, trace};

use crate::domain::{Arena, Leg, TravelSegment};

use super::config::AnalyzerConfig;

/// Whether a traveller arriving on `arriving` can make `departing`.
///
/// The international threshold applies when `departing` crosses a national
/// border. A non-positive threshold only requires the arrival not to be
/// after the departure.
pub fn connection_ok(
    arriving: &TravelSegment,
    departing: &TravelSegment,
    config: &AnalyzerConfig,
) -> bool {
    let arrival = arriving.arrival();
    let departure = departing.departure();

    if config.allow_illogical_flights {
        return arrival < departure;
    }
    if arrival > departure {
        return false;
    }

    let mct = if departing.is_international() {
        config.min_connection_international()
    } else {
        config.min_connection_domestic()
    };
    mct <= chrono::Duration::zero() || departure - arrival >= mct
}

/// Check the first SOP of every leg against the first SOP of the next.
fn first_options_connect(arena: &Arena, legs: &[Leg], config: &AnalyzerConfig) -> bool {
    legs.windows(2).all(|pair| {
        let (Some(prev), Some(next)) = (pair[0].sops.first(), pair[1].sops.first()) else {
            return true;
        };
        let prev_segs = arena.itin_segments(prev.itin);
        let next_segs = arena.itin_segments(next.itin);
        match (prev_segs.last(), next_segs.first()) {
            (Some(arriving), Some(departing)) => connection_ok(arriving, departing, config),
            _ => true,
        }
    })
}

/// Earliest-arriving last segment and latest-departing first segment over
/// all of a leg's SOPs.
fn extremes<'a>(
    arena: &'a Arena,
    leg: &Leg,
) -> (Option<&'a TravelSegment>, Option<&'a TravelSegment>) {
    let mut earliest_arrival: Option<&TravelSegment> = None;
    let mut latest_departure: Option<&TravelSegment> = None;
    for sop in &leg.sops {
        let segs = arena.itin_segments(sop.itin);
        if let Some(&back) = segs.last() {
            if earliest_arrival.is_none_or(|e| back.arrival() < e.arrival()) {
                earliest_arrival = Some(back);
            }
        }
        if let Some(&front) = segs.first() {
            if latest_departure.is_none_or(|l| front.departure() > l.departure()) {
                latest_departure = Some(front);
            }
        }
    }
    (earliest_arrival, latest_departure)
}

/// Legs that cannot be reached in time from the previous leg.
///
/// The first SOP of each leg is tried first; when every consecutive pair
/// connects there is nothing to report. Otherwise the best case is checked
/// for each pair: the previous leg's earliest arrival against this leg's
/// latest departure. Returned indices are zero-based and name the later leg
/// of each failing pair. Fewer than two legs always pass.
pub fn check_min_connection(arena: &Arena, legs: &[Leg], config: &AnalyzerConfig) -> Vec<usize> {
    if legs.len() < 2 {
        return Vec::new();
    }
    if first_options_connect(arena, legs, config) {
        trace!(legs = legs.len(), "first options connect");
        return Vec::new();
    }

    let bounds: Vec<_> = legs.iter().map(|leg| extremes(arena, leg)).collect();
    let mut failing = Vec::new();
    for i in 1..legs.len() {
        let (Some(arriving), _) = bounds[i - 1] else {
            continue;
        };
        let (_, Some(departing)) = bounds[i] else {
            continue;
        };
        if !connection_ok(arriving, departing, config) {
            debug!(
                leg = i,
                arrival = %arriving.arrival(),
                departure = %departing.departure(),
                "minimum connection time not met"
            );
            failing.push(i);
        }
    }
    failing
}
