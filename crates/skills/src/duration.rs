//! Duration-entity math shared by the moderation skills.

use sigil_nlu::DurationParam;

/// Seconds per NLU duration unit.
pub fn unit_seconds(unit: &str) -> Option<i64> {
    match unit {
        "wk" => Some(7 * 86_400),
        "day" => Some(86_400),
        "h" => Some(3_600),
        "min" => Some(60),
        "s" => Some(1),
        _ => None,
    }
}

/// Bulk deletion reaches at most this far into the past.
pub const MAX_PURGE_SECS: i64 = 14 * 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffError {
    UnknownUnit,
    TooFarPast,
    InFuture,
}

/// Compute the purge cutoff: messages newer than the returned unix time are
/// candidates for deletion.
pub fn purge_cutoff(origin: i64, duration: &DurationParam) -> Result<i64, CutoffError> {
    let per_unit = unit_seconds(&duration.unit).ok_or(CutoffError::UnknownUnit)?;
    let span = i128::from(duration.amount) * i128::from(per_unit);
    if span < 0 {
        return Err(CutoffError::InFuture);
    }
    if span > i128::from(MAX_PURGE_SECS) {
        return Err(CutoffError::TooFarPast);
    }
    Ok(origin - span as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration(amount: i64, unit: &str) -> DurationParam {
        DurationParam {
            amount,
            unit: unit.into(),
        }
    }

    #[test]
    fn unit_table_matches_the_nlu_entity() {
        assert_eq!(unit_seconds("wk"), Some(604_800));
        assert_eq!(unit_seconds("day"), Some(86_400));
        assert_eq!(unit_seconds("h"), Some(3_600));
        assert_eq!(unit_seconds("min"), Some(60));
        assert_eq!(unit_seconds("s"), Some(1));
        assert_eq!(unit_seconds("fortnight"), None);
    }

    #[test]
    fn cutoff_subtracts_the_span() {
        let origin = 1_700_000_000;
        assert_eq!(purge_cutoff(origin, &duration(2, "h")), Ok(origin - 7_200));
        assert_eq!(purge_cutoff(origin, &duration(1, "day")), Ok(origin - 86_400));
        assert_eq!(purge_cutoff(origin, &duration(30, "s")), Ok(origin - 30));
    }

    #[test]
    fn one_hundred_weeks_is_too_far() {
        assert_eq!(
            purge_cutoff(1_700_000_000, &duration(100, "wk")),
            Err(CutoffError::TooFarPast)
        );
    }

    #[test]
    fn fourteen_days_is_the_boundary() {
        let origin = 1_700_000_000;
        assert_eq!(
            purge_cutoff(origin, &duration(14, "day")),
            Ok(origin - MAX_PURGE_SECS)
        );
        assert_eq!(
            purge_cutoff(origin, &duration(15, "day")),
            Err(CutoffError::TooFarPast)
        );
    }

    #[test]
    fn negative_amounts_point_at_the_future() {
        assert_eq!(
            purge_cutoff(1_700_000_000, &duration(-5, "min")),
            Err(CutoffError::InFuture)
        );
    }

    #[test]
    fn unknown_units_are_rejected() {
        assert_eq!(
            purge_cutoff(1_700_000_000, &duration(5, "ms")),
            Err(CutoffError::UnknownUnit)
        );
    }

    #[test]
    fn huge_amounts_do_not_overflow() {
        assert_eq!(
            purge_cutoff(1_700_000_000, &duration(i64::MAX, "wk")),
            Err(CutoffError::TooFarPast)
        );
    }
}
