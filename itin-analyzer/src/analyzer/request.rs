//! Request DTOs and their conversion to domain types.
//!
//! The JSON shape mirrors what a schedule search hands over: legs of
//! candidate itineraries whose points are plain airport codes, plus a table
//! classifying every code used. Optional fields default rather than fail.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::trace;

use crate::domain::{
    Arena, Cabin, CarrierCode, Itinerary, Leg, Loc, LocCode, NationCode, SchedulingOption,
    SegmentFlags, SubArea, TravelSegment,
};
use crate::governing::MileageTable;

use super::error::{AnalysisError, ConfigError};

/// A shopping request as read from JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequestDto {
    /// Requested legs, in travel order.
    pub legs: Vec<LegDto>,

    /// Classification of every location code used by the segments.
    pub locations: Vec<LocationDto>,

    /// Ticketed point mileage between location pairs.
    #[serde(default)]
    pub mileage: Vec<MileageDto>,

    /// Whether the journey is priced as a round-the-world fare.
    #[serde(default)]
    pub round_the_world: bool,
}

impl AnalysisRequestDto {
    /// Read a request from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// One requested leg.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegDto {
    /// Cabin the traveller asked for on this leg. Defaults to economy.
    pub preferred_cabin: Option<Cabin>,

    /// Candidate itineraries from the schedule search.
    pub options: Vec<OptionDto>,
}

/// One scheduling option.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    /// Id assigned by the schedule search.
    pub id: u32,

    /// Segments in travel order.
    pub segments: Vec<SegmentDto>,
}

/// Kind of a requested segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKindDto {
    #[default]
    Air,
    Open,
    Arunk,
}

/// One segment of a scheduling option.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentDto {
    /// Departure location code.
    pub origin: String,

    /// Arrival location code.
    pub destination: String,

    /// Flown, open or surface. Defaults to flown.
    #[serde(default)]
    pub kind: SegmentKindDto,

    /// Marketing carrier; required for flown segments.
    pub carrier: Option<String>,

    /// Operating carrier when it differs from the marketing carrier.
    pub operating_carrier: Option<String>,

    /// Flight number; required for flown segments.
    pub flight_number: Option<u32>,

    /// Local departure time (ISO 8601, no offset).
    pub departure: NaiveDateTime,

    /// Local arrival time (ISO 8601, no offset).
    pub arrival: NaiveDateTime,

    /// Cabins offered. Empty means unrestricted.
    #[serde(default)]
    pub cabins: Vec<Cabin>,

    /// Passenger stops over at the destination.
    #[serde(default)]
    pub stopover: bool,

    /// Connection at the destination is forced.
    #[serde(default)]
    pub forced_connection: bool,
}

/// Classification of one location code.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    /// Airport or city code.
    pub code: String,

    /// City the airport belongs to. Defaults to the code itself.
    pub city: Option<String>,

    /// ISO country code.
    pub nation: String,

    /// Two-digit IATA sub-area.
    pub sub_area: String,
}

/// Mileage between two points.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MileageDto {
    pub from: String,
    pub to: String,
    pub miles: u32,
}

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// A location code or its classification failed to parse
    #[error("invalid location: {0}")]
    InvalidLocation(String),

    /// A segment names a location missing from the location table
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// Failed to parse a carrier code
    #[error("invalid carrier code: {0}")]
    InvalidCarrier(String),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Segment failed domain validation
    #[error("invalid segment: {0}")]
    InvalidSegment(String),
}

impl From<ConversionError> for AnalysisError {
    fn from(e: ConversionError) -> Self {
        AnalysisError::InvalidInput(e.to_string())
    }
}

/// A request converted into the arena-backed domain model.
#[derive(Debug)]
pub struct AnalysisRequest {
    pub arena: Arena,
    pub legs: Vec<Leg>,
    pub mileage: MileageTable,
    pub round_the_world: bool,
}

/// Convert a location table entry.
pub fn convert_location(dto: &LocationDto) -> Result<Loc, ConversionError> {
    let invalid = |what: &str| ConversionError::InvalidLocation(format!("{what} for {}", dto.code));
    let code = LocCode::parse(&dto.code).map_err(|_| invalid("code"))?;
    let city = match &dto.city {
        Some(city) => LocCode::parse(city).map_err(|_| invalid("city"))?,
        None => code,
    };
    let nation = NationCode::parse(&dto.nation).map_err(|_| invalid("nation"))?;
    let sub_area = SubArea::parse(&dto.sub_area).map_err(|_| invalid("sub-area"))?;
    Ok(Loc::new(code, city, nation, sub_area))
}

fn parse_carrier(code: &str) -> Result<CarrierCode, ConversionError> {
    CarrierCode::parse(code).map_err(|_| ConversionError::InvalidCarrier(code.to_string()))
}

/// Convert one segment, resolving its points through `locations`.
pub fn convert_segment(
    dto: &SegmentDto,
    locations: &HashMap<String, Loc>,
) -> Result<TravelSegment, ConversionError> {
    let lookup = |code: &str| {
        locations
            .get(code)
            .copied()
            .ok_or_else(|| ConversionError::UnknownLocation(code.to_string()))
    };
    let origin = lookup(&dto.origin)?;
    let destination = lookup(&dto.destination)?;
    let carrier = dto.carrier.as_deref().map(parse_carrier).transpose()?;
    let invalid = |e: crate::domain::DomainError| ConversionError::InvalidSegment(e.to_string());

    let mut seg = match dto.kind {
        SegmentKindDto::Air => {
            let carrier = carrier.ok_or(ConversionError::MissingField("carrier"))?;
            let number = dto
                .flight_number
                .ok_or(ConversionError::MissingField("flightNumber"))?;
            TravelSegment::air(origin, destination, carrier, number, dto.departure, dto.arrival)
                .map_err(invalid)?
        }
        SegmentKindDto::Open => {
            TravelSegment::open(origin, destination, carrier, dto.departure, dto.arrival)
                .map_err(invalid)?
        }
        SegmentKindDto::Arunk => {
            TravelSegment::arunk(origin, destination, dto.departure, dto.arrival)
                .map_err(invalid)?
        }
    };

    if let Some(operating) = &dto.operating_carrier {
        seg.operating = Some(parse_carrier(operating)?);
    }
    seg.offered_cabins = dto.cabins.clone();
    if dto.stopover {
        seg.flags |= SegmentFlags::STOPOVER;
    }
    if dto.forced_connection {
        seg.flags |= SegmentFlags::FORCED_CONNECTION;
    }
    Ok(seg)
}

/// Convert a whole request, allocating every segment and itinerary in a
/// fresh arena.
pub fn convert_request(dto: &AnalysisRequestDto) -> Result<AnalysisRequest, ConversionError> {
    let mut locations = HashMap::with_capacity(dto.locations.len());
    for loc in &dto.locations {
        locations.insert(loc.code.clone(), convert_location(loc)?);
    }

    let mut arena = Arena::new();
    let mut legs = Vec::with_capacity(dto.legs.len());
    for (index, leg_dto) in dto.legs.iter().enumerate() {
        let mut sops = Vec::with_capacity(leg_dto.options.len());
        for (sop_id, option) in leg_dto.options.iter().enumerate() {
            let mut segments = Vec::with_capacity(option.segments.len());
            for seg in &option.segments {
                segments.push(arena.alloc_segment(convert_segment(seg, &locations)?));
            }
            let itin = arena.alloc_itin(Itinerary::new(segments));
            sops.push(SchedulingOption::new(itin, option.id, sop_id));
        }
        let cabin = leg_dto.preferred_cabin.unwrap_or(Cabin::Economy);
        trace!(leg = index, options = sops.len(), cabin = ?cabin, "converted leg");
        legs.push(Leg::new(index, sops, cabin));
    }

    let mut mileage = MileageTable::new();
    for entry in &dto.mileage {
        let parse = |code: &str| {
            LocCode::parse(code).map_err(|_| ConversionError::InvalidLocation(code.to_string()))
        };
        mileage.insert(parse(&entry.from)?, parse(&entry.to)?, entry.miles);
    }

    Ok(AnalysisRequest {
        arena,
        legs,
        mileage,
        round_the_world: dto.round_the_world,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SegmentKind;
    use crate::governing::MileageSource;

    const REQUEST: &str = r#"{
        "legs": [
            {
                "preferredCabin": "Business",
                "options": [
                    {
                        "id": 7,
                        "segments": [
                            {
                                "origin": "JFK",
                                "destination": "LHR",
                                "carrier": "BA",
                                "operatingCarrier": "AA",
                                "flightNumber": 117,
                                "departure": "2024-06-01T18:00:00",
                                "arrival": "2024-06-02T06:00:00",
                                "cabins": ["Business", "Economy"]
                            },
                            {
                                "origin": "LHR",
                                "destination": "LGW",
                                "kind": "arunk",
                                "departure": "2024-06-02T07:00:00",
                                "arrival": "2024-06-02T09:00:00"
                            }
                        ]
                    }
                ]
            }
        ],
        "locations": [
            { "code": "JFK", "city": "NYC", "nation": "US", "subArea": "11" },
            { "code": "LHR", "city": "LON", "nation": "GB", "subArea": "21" },
            { "code": "LGW", "city": "LON", "nation": "GB", "subArea": "21" }
        ],
        "mileage": [ { "from": "JFK", "to": "LHR", "miles": 3451 } ]
    }"#;

    fn make_segment(kind: SegmentKindDto) -> SegmentDto {
        SegmentDto {
            origin: "JFK".to_string(),
            destination: "LHR".to_string(),
            kind,
            carrier: Some("BA".to_string()),
            operating_carrier: None,
            flight_number: Some(1),
            departure: "2024-06-01T18:00:00".parse().unwrap(),
            arrival: "2024-06-02T06:00:00".parse().unwrap(),
            cabins: Vec::new(),
            stopover: false,
            forced_connection: false,
        }
    }

    fn make_locations() -> HashMap<String, Loc> {
        [("JFK", "NYC", "US", "11"), ("LHR", "LON", "GB", "21")]
            .iter()
            .map(|(code, city, nation, sub)| {
                let dto = LocationDto {
                    code: code.to_string(),
                    city: Some(city.to_string()),
                    nation: nation.to_string(),
                    sub_area: sub.to_string(),
                };
                (code.to_string(), convert_location(&dto).unwrap())
            })
            .collect()
    }

    #[test]
    fn convert_full_request() {
        let dto: AnalysisRequestDto = serde_json::from_str(REQUEST).unwrap();
        let request = convert_request(&dto).unwrap();

        assert!(!request.round_the_world);
        assert_eq!(request.legs.len(), 1);
        let leg = &request.legs[0];
        assert_eq!(leg.preferred_cabin, Cabin::Business);
        assert_eq!(leg.sops[0].external_id, 7);
        assert_eq!(leg.sops[0].sop_id, 0);

        let segs = request.arena.itin_segments(leg.sops[0].itin);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].marketing, Some(CarrierCode::parse("BA").unwrap()));
        assert_eq!(segs[0].operating, Some(CarrierCode::parse("AA").unwrap()));
        assert_eq!(segs[0].offered_cabins, vec![Cabin::Business, Cabin::Economy]);
        assert_eq!(segs[0].origin.city, LocCode::parse("NYC").unwrap());
        assert_eq!(segs[1].kind, SegmentKind::Arunk);

        let jfk = LocCode::parse("JFK").unwrap();
        let lhr = LocCode::parse("LHR").unwrap();
        assert_eq!(request.mileage.mileage(&lhr, &jfk), Some(3451));
    }

    #[test]
    fn flown_segment_needs_carrier_and_number() {
        let locations = make_locations();
        let mut seg = make_segment(SegmentKindDto::Air);
        seg.flight_number = None;
        assert!(matches!(
            convert_segment(&seg, &locations),
            Err(ConversionError::MissingField("flightNumber"))
        ));

        let mut seg = make_segment(SegmentKindDto::Air);
        seg.carrier = None;
        assert!(matches!(
            convert_segment(&seg, &locations),
            Err(ConversionError::MissingField("carrier"))
        ));

        let mut seg = make_segment(SegmentKindDto::Open);
        seg.carrier = None;
        seg.flight_number = None;
        assert!(convert_segment(&seg, &locations).is_ok());
    }

    #[test]
    fn unknown_location_is_rejected() {
        let locations = make_locations();
        let mut seg = make_segment(SegmentKindDto::Air);
        seg.destination = "CDG".to_string();
        let err = convert_segment(&seg, &locations).unwrap_err();
        assert_eq!(err.to_string(), "unknown location: CDG");
    }

    #[test]
    fn reversed_times_are_invalid_segment() {
        let locations = make_locations();
        let mut seg = make_segment(SegmentKindDto::Air);
        std::mem::swap(&mut seg.departure, &mut seg.arrival);
        assert!(matches!(
            convert_segment(&seg, &locations),
            Err(ConversionError::InvalidSegment(_))
        ));
    }

    #[test]
    fn location_city_defaults_to_code() {
        let dto = LocationDto {
            code: "ORD".to_string(),
            city: None,
            nation: "US".to_string(),
            sub_area: "11".to_string(),
        };
        let loc = convert_location(&dto).unwrap();
        assert_eq!(loc.city, loc.code);

        let bad = LocationDto {
            sub_area: "55".to_string(),
            ..dto
        };
        assert!(matches!(
            convert_location(&bad),
            Err(ConversionError::InvalidLocation(_))
        ));
    }

    #[test]
    fn conversion_errors_become_invalid_input() {
        let err: AnalysisError = ConversionError::MissingField("carrier").into();
        assert_eq!(
            err.to_string(),
            "invalid input: missing required field: carrier"
        );
    }
}
