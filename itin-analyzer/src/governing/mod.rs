//! Governing carrier selection.
//!
//! The governing carrier is the carrier whose fare-construction rules apply
//! to a fare market. It is chosen by classifying the fare market's travel
//! boundary and running the rule registered for that boundary, with a
//! mileage-based tie-break for European travel and a separate step list for
//! round-the-world fares.

mod mileage;
pub mod rtw;
pub mod rules;
mod selector;
mod tpm;

pub use mileage::{MileageSource, MileageTable};
pub use selector::{GoverningCarrierSelector, GoverningSelection};
pub use tpm::highest_tpm_carrier;
