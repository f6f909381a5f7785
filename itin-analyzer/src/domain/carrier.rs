//! Airline carrier code type.

use std::fmt;

/// Error returned when parsing an invalid carrier code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid carrier code: {reason}")]
pub struct InvalidCarrierCode {
    reason: &'static str,
}

/// A valid 2 or 3 character airline designator.
///
/// IATA designators are two characters (e.g. "AA", "LH", "9W"); ICAO-style
/// designators used by some schedule feeds are three. Characters are
/// uppercase ASCII letters or digits.
///
/// # Examples
///
/// ```
/// use itin_analyzer::domain::CarrierCode;
///
/// let lh = CarrierCode::parse("LH").unwrap();
/// assert_eq!(lh.as_str(), "LH");
///
/// // Digits are allowed
/// assert!(CarrierCode::parse("9W").is_ok());
///
/// // Lowercase is rejected
/// assert!(CarrierCode::parse("lh").is_err());
///
/// // Wrong length is rejected
/// assert!(CarrierCode::parse("L").is_err());
/// assert!(CarrierCode::parse("LHAB").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarrierCode {
    bytes: [u8; 3],
    len: u8,
}

impl CarrierCode {
    /// The industry pseudo-carrier, used for surface sectors and segments
    /// without a marketing carrier.
    pub const INDUSTRY: CarrierCode = CarrierCode {
        bytes: *b"YY\0",
        len: 2,
    };

    /// Parse a carrier code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidCarrierCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 && bytes.len() != 3 {
            return Err(InvalidCarrierCode {
                reason: "must be 2 or 3 characters",
            });
        }

        for &b in bytes {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return Err(InvalidCarrierCode {
                    reason: "must be uppercase ASCII letters or digits",
                });
            }
        }

        if bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidCarrierCode {
                reason: "must contain at least one letter",
            });
        }

        let mut stored = [0u8; 3];
        stored[..bytes.len()].copy_from_slice(bytes);
        Ok(CarrierCode {
            bytes: stored,
            len: bytes.len() as u8,
        })
    }

    /// Returns the carrier code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII letters and digits are ever stored.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }

    /// Returns true for the industry pseudo-carrier.
    pub fn is_industry(&self) -> bool {
        *self == Self::INDUSTRY
    }
}

impl fmt::Debug for CarrierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CarrierCode({})", self.as_str())
    }
}

impl fmt::Display for CarrierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_carrier_codes() {
        assert!(CarrierCode::parse("AA").is_ok()); // American
        assert!(CarrierCode::parse("LH").is_ok()); // Lufthansa
        assert!(CarrierCode::parse("9W").is_ok()); // Jet Airways
        assert!(CarrierCode::parse("U2").is_ok()); // easyJet
        assert!(CarrierCode::parse("BAW").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(CarrierCode::parse("aa").is_err());
        assert!(CarrierCode::parse("Aa").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(CarrierCode::parse("").is_err());
        assert!(CarrierCode::parse("A").is_err());
        assert!(CarrierCode::parse("ABCD").is_err());
    }

    #[test]
    fn reject_all_digits() {
        assert!(CarrierCode::parse("12").is_err());
        assert!(CarrierCode::parse("123").is_err());
    }

    #[test]
    fn reject_punctuation() {
        assert!(CarrierCode::parse("A-").is_err());
        assert!(CarrierCode::parse("A ").is_err());
    }

    #[test]
    fn industry_carrier() {
        assert_eq!(CarrierCode::INDUSTRY.as_str(), "YY");
        assert!(CarrierCode::parse("YY").unwrap().is_industry());
        assert!(!CarrierCode::parse("AA").unwrap().is_industry());
    }

    #[test]
    fn display_and_debug() {
        let code = CarrierCode::parse("BA").unwrap();
        assert_eq!(format!("{}", code), "BA");
        assert_eq!(format!("{:?}", code), "CarrierCode(BA)");
    }

    #[test]
    fn two_and_three_letter_codes_differ() {
        let two = CarrierCode::parse("BA").unwrap();
        let three = CarrierCode::parse("BAW").unwrap();
        assert_ne!(two, three);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Z][A-Z0-9]{1,2}") {
            let code = CarrierCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Lowercase letters are always rejected
        #[test]
        fn lowercase_rejected(s in "[a-z]{2,3}") {
            prop_assert!(CarrierCode::parse(&s).is_err());
        }

        /// Wrong-length strings are always rejected
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,1}|[A-Z]{4,8}") {
            prop_assert!(CarrierCode::parse(&s).is_err());
        }
    }
}
