// File: ./src/model/mod.rs
pub mod holiday;
pub mod range;
pub mod waiver;

pub use holiday::{Holiday, HolidayCandidate, RegionMap, SelectionContext};
pub use range::NormalizedRange;
pub use waiver::{WaiverCandidate, WaiverRecord};
