//! Location types: airport/city codes, nations, IATA areas.

use std::fmt;

/// Error returned when parsing an invalid location component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid location: {reason}")]
pub struct InvalidLocation {
    reason: &'static str,
}

impl InvalidLocation {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A 3-letter airport or city code (e.g. "JFK", "NYC").
///
/// # Examples
///
/// ```
/// use itin_analyzer::domain::LocCode;
///
/// let jfk = LocCode::parse("JFK").unwrap();
/// assert_eq!(jfk.as_str(), "JFK");
/// assert!(LocCode::parse("jfk").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocCode([u8; 3]);

impl LocCode {
    /// Parse a location code. Must be exactly 3 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidLocation> {
        let bytes = s.as_bytes();
        if bytes.len() != 3 {
            return Err(InvalidLocation::new("location code must be 3 characters"));
        }
        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidLocation::new(
                "location code must be uppercase ASCII letters A-Z",
            ));
        }
        Ok(LocCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for LocCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocCode({})", self.as_str())
    }
}

impl fmt::Display for LocCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 2-letter ISO nation code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NationCode([u8; 2]);

impl NationCode {
    pub const US: NationCode = NationCode(*b"US");
    pub const CA: NationCode = NationCode(*b"CA");

    /// Parse a nation code. Must be exactly 2 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidLocation> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidLocation::new(
                "nation code must be 2 uppercase ASCII letters",
            ));
        }
        Ok(NationCode([bytes[0], bytes[1]]))
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// True for the United States and Canada.
    pub fn is_usca(&self) -> bool {
        *self == Self::US || *self == Self::CA
    }
}

impl fmt::Debug for NationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NationCode({})", self.as_str())
    }
}

impl fmt::Display for NationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// IATA traffic conference area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IataArea {
    /// The Americas.
    Area1,
    /// Europe, Middle East, Africa.
    Area2,
    /// Asia, Australasia, Pacific.
    Area3,
}

/// IATA sub-area, written as two digits: the area followed by the zone
/// within it (e.g. "11" North America, "21" Europe, "34" South West Pacific).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubArea(u8);

impl SubArea {
    /// North America, Central America and the Caribbean.
    pub const NORTH_AMERICA: SubArea = SubArea(11);
    /// Europe.
    pub const EUROPE: SubArea = SubArea(21);

    /// Parse a two-digit sub-area code such as "11" or "23".
    pub fn parse(s: &str) -> Result<Self, InvalidLocation> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidLocation::new("sub-area must be 2 digits"));
        }
        let area = bytes[0] - b'0';
        let zone = bytes[1] - b'0';
        if !(1..=3).contains(&area) || !(1..=4).contains(&zone) {
            return Err(InvalidLocation::new("sub-area out of range"));
        }
        Ok(SubArea(area * 10 + zone))
    }

    /// The IATA area this sub-area belongs to.
    pub fn area(&self) -> IataArea {
        match self.0 / 10 {
            1 => IataArea::Area1,
            2 => IataArea::Area2,
            _ => IataArea::Area3,
        }
    }

    pub fn code(&self) -> u8 {
        self.0
    }
}

impl fmt::Debug for SubArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubArea({})", self.0)
    }
}

impl fmt::Display for SubArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fully classified location.
///
/// `city` is the multi-airport city the location belongs to (e.g. JFK and
/// LGA both belong to NYC); connection and surface checks compare cities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Loc {
    pub code: LocCode,
    pub city: LocCode,
    pub nation: NationCode,
    pub sub_area: SubArea,
}

impl Loc {
    pub fn new(code: LocCode, city: LocCode, nation: NationCode, sub_area: SubArea) -> Self {
        Self {
            code,
            city,
            nation,
            sub_area,
        }
    }

    pub fn area(&self) -> IataArea {
        self.sub_area.area()
    }

    /// True if the location is in the United States or Canada.
    pub fn is_usca(&self) -> bool {
        self.nation.is_usca()
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code.as_str())
    }
}
