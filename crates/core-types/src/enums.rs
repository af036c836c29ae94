use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// The eight-phase lunar classification, ordered over one synodic cycle.
///
/// The discriminants are stable and match the phase codes used by the
/// astronomical data providers (0 = new moon through 7 = waning crescent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LunarPhase {
    New = 0,
    WaxingCrescent = 1,
    FirstQuarter = 2,
    WaxingGibbous = 3,
    Full = 4,
    WaningGibbous = 5,
    LastQuarter = 6,
    WaningCrescent = 7,
}

impl LunarPhase {
    /// All phases in cycle order, for iteration and grouping.
    pub const ALL: [LunarPhase; 8] = [
        LunarPhase::New,
        LunarPhase::WaxingCrescent,
        LunarPhase::FirstQuarter,
        LunarPhase::WaxingGibbous,
        LunarPhase::Full,
        LunarPhase::WaningGibbous,
        LunarPhase::LastQuarter,
        LunarPhase::WaningCrescent,
    ];

    /// Returns the stable numeric code for this phase.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Converts a raw provider phase code into a `LunarPhase`.
    pub fn from_code(code: u8) -> Result<Self, CoreError> {
        match code {
            0 => Ok(LunarPhase::New),
            1 => Ok(LunarPhase::WaxingCrescent),
            2 => Ok(LunarPhase::FirstQuarter),
            3 => Ok(LunarPhase::WaxingGibbous),
            4 => Ok(LunarPhase::Full),
            5 => Ok(LunarPhase::WaningGibbous),
            6 => Ok(LunarPhase::LastQuarter),
            7 => Ok(LunarPhase::WaningCrescent),
            other => Err(CoreError::UnknownPhase(other)),
        }
    }

    /// Human-readable display name.
    pub fn name(&self) -> &'static str {
        match self {
            LunarPhase::New => "New Moon",
            LunarPhase::WaxingCrescent => "Waxing Crescent",
            LunarPhase::FirstQuarter => "First Quarter",
            LunarPhase::WaxingGibbous => "Waxing Gibbous",
            LunarPhase::Full => "Full Moon",
            LunarPhase::WaningGibbous => "Waning Gibbous",
            LunarPhase::LastQuarter => "Last Quarter",
            LunarPhase::WaningCrescent => "Waning Crescent",
        }
    }

    /// The illumination percentage range (inclusive) expected for this phase.
    ///
    /// The waxing and waning halves of the cycle mirror each other, so the
    /// gibbous phases share a range and the quarter phases share a range.
    pub fn expected_illumination(&self) -> (f64, f64) {
        match self {
            LunarPhase::New => (0.0, 12.5),
            LunarPhase::WaxingCrescent | LunarPhase::WaningCrescent => (12.5, 37.5),
            LunarPhase::FirstQuarter | LunarPhase::LastQuarter => (37.5, 62.5),
            LunarPhase::WaxingGibbous | LunarPhase::WaningGibbous => (62.5, 87.5),
            LunarPhase::Full => (87.5, 100.0),
        }
    }
}

impl std::fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
