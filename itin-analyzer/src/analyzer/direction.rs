//! Fare-market direction relative to the journey origin.

use tracing::{debug, trace};

use crate::domain::{Arena, Direction, Leg, Loc};

use super::journey::Journey;

/// Direction of the journey fare market at `position`.
///
/// The first fare market is outbound. A later one is inbound when it
/// returns to the journey origin: the same city on a domestic journey, the
/// same nation on an international one.
pub fn journey_direction(
    journey_origin: &Loc,
    destination: &Loc,
    position: usize,
    domestic: bool,
) -> Direction {
    if position == 0 {
        return Direction::Outbound;
    }
    let returns = if domestic {
        destination.city == journey_origin.city
    } else {
        destination.nation == journey_origin.nation
    };
    if returns {
        Direction::Inbound
    } else {
        Direction::Outbound
    }
}

/// Set the direction of every journey fare market.
pub fn assign_journey_directions(arena: &mut Arena, journey: &Journey) {
    let Some(&first) = journey.leg_fare_markets.first() else {
        return;
    };
    let origin = arena.fare_market(first).origin;
    let domestic = journey.boundary.is_domestic();

    for (position, &fm) in journey.leg_fare_markets.iter().enumerate() {
        let destination = arena.fare_market(fm).destination;
        let direction = journey_direction(&origin, &destination, position, domestic);
        trace!(position, direction = ?direction, "journey fare market direction");
        arena.fare_market_mut(fm).direction = direction;
    }
    if let Some(whole) = journey.whole_fare_market {
        arena.fare_market_mut(whole).direction = Direction::Outbound;
    }
}

fn journey_leg_direction(arena: &Arena, journey: &Journey, leg: usize) -> Direction {
    journey
        .leg_fare_markets
        .get(leg)
        .map(|&fm| arena.fare_market(fm).direction)
        .unwrap_or_default()
}

/// Direction of a leg, read from the journey fare markets.
///
/// A stop-over leg starting at the first leg takes the first journey fare
/// market's direction. Any other stop-over leg takes the single direction
/// shared by its jumped legs, or `Unknown` when they disagree or one is
/// unknown.
pub fn leg_direction(arena: &Arena, journey: &Journey, leg: &Leg) -> Direction {
    let Some(stop_over) = &leg.stop_over else {
        return journey_leg_direction(arena, journey, leg.index);
    };
    if stop_over.first_leg() == Some(0) {
        return journey_leg_direction(arena, journey, 0);
    }

    let mut found: Option<Direction> = None;
    for jumped in stop_over.jumped_legs() {
        let direction = journey_leg_direction(arena, journey, jumped);
        match (direction, found) {
            (Direction::Unknown, _) => return Direction::Unknown,
            (d, Some(f)) if d != f => return Direction::Unknown,
            (d, _) => found = Some(d),
        }
    }
    found.unwrap_or_default()
}

/// Copy journey directions onto every leg and every SOP fare market.
pub fn propagate_directions(arena: &mut Arena, legs: &mut [Leg], journey: &Journey) {
    for leg in legs.iter_mut() {
        let direction = leg_direction(arena, journey, leg);
        leg.direction = direction;

        let fare_markets: Vec<_> = leg
            .sops
            .iter()
            .flat_map(|sop| arena.itin(sop.itin).fare_markets.clone())
            .collect();
        for fm in &fare_markets {
            arena.fare_market_mut(*fm).direction = direction;
        }
        debug!(
            leg = leg.index,
            direction = ?direction,
            fare_markets = fare_markets.len(),
            "propagated direction"
        );
    }
}
