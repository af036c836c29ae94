use core_types::{CombinedRecord, LunarPhase};
use tracing::warn;

/// Length of the synodic lunar cycle in days.
const SYNODIC_CYCLE_DAYS: f64 = 29.5;

/// Checks a record's categorical phase against its illumination using the
/// expected-range table carried by `LunarPhase`.
///
/// Mismatches point at upstream provider drift (the phase boundary dates
/// and the illumination series come from different ephemeris models), so
/// they are logged for the audit trail and the record is left unchanged.
pub fn validate_phase_consistency(record: &CombinedRecord) {
    let (min_illumination, max_illumination) = record.phase.expected_illumination();
    if !(min_illumination..=max_illumination).contains(&record.illumination) {
        warn!(
            date = %record.date(),
            phase = %record.phase,
            illumination = record.illumination,
            expected_min = min_illumination,
            expected_max = max_illumination,
            "phase-illumination mismatch"
        );
    }
}

/// Maps a signed day offset from the full moon into a position in [0, 1)
/// over the synodic cycle, with 0.5 at the full moon itself.
pub fn lunar_cycle_position(days_from_full: i32) -> f64 {
    let position = if days_from_full >= 0 {
        0.5 - days_from_full as f64 / SYNODIC_CYCLE_DAYS
    } else {
        0.5 + days_from_full.unsigned_abs() as f64 / SYNODIC_CYCLE_DAYS
    };
    position.rem_euclid(1.0)
}

/// How far an illumination deviation can reach before a phase counts as
/// fully off-peak.
const MAX_PEAK_DEVIATION: f64 = 25.0;

/// How close a day is to the peak of its phase, in [0, 1].
///
/// Each phase has a nominal peak illumination (0 at new, 100 at full, and
/// the mirrored 25/50/75 steps between); the strength falls off linearly
/// with the distance from that peak and bottoms out at zero beyond
/// `MAX_PEAK_DEVIATION` points.
pub fn moon_phase_strength(illumination: f64, phase: LunarPhase) -> f64 {
    let peak = match phase {
        LunarPhase::New => 0.0,
        LunarPhase::WaxingCrescent | LunarPhase::WaningCrescent => 25.0,
        LunarPhase::FirstQuarter | LunarPhase::LastQuarter => 50.0,
        LunarPhase::WaxingGibbous | LunarPhase::WaningGibbous => 75.0,
        LunarPhase::Full => 100.0,
    };
    (1.0 - (illumination - peak).abs() / MAX_PEAK_DEVIATION).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_position_peaks_at_full_moon() {
        assert_eq!(lunar_cycle_position(0), 0.5);
    }

    #[test]
    fn cycle_position_wraps_into_unit_interval() {
        for offset in -15..=15 {
            let position = lunar_cycle_position(offset);
            assert!((0.0..1.0).contains(&position), "offset {offset} -> {position}");
        }
        // Waxing side approaches the full moon from below 0.5.
        assert!(lunar_cycle_position(3) < 0.5);
        // Waning side moves past it.
        assert!(lunar_cycle_position(-3) > 0.5);
    }

    #[test]
    fn phase_strength_peaks_at_nominal_illumination() {
        assert_eq!(moon_phase_strength(100.0, LunarPhase::Full), 1.0);
        assert_eq!(moon_phase_strength(0.0, LunarPhase::New), 1.0);
        assert_eq!(moon_phase_strength(75.0, LunarPhase::Full), 0.0);
        assert!((moon_phase_strength(80.0, LunarPhase::WaxingGibbous) - 0.8).abs() < 1e-12);
        // Far beyond the deviation range the strength floors at zero.
        assert_eq!(moon_phase_strength(60.0, LunarPhase::New), 0.0);
    }
}
