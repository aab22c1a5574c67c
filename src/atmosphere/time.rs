//! Time-of-day buckets.

use serde::{Deserialize, Serialize};

/// Coarse time-of-day bucket. Hosts derive it from the wall clock; the
/// renderer only ever sees the bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    #[default]
    Day,
    Sunset,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 3] = [TimeOfDay::Day, TimeOfDay::Sunset, TimeOfDay::Night];

    /// Index written into the uniform block (matches `TOD_*` in the shader).
    #[inline]
    pub fn index(self) -> u32 {
        match self {
            TimeOfDay::Day => 0,
            TimeOfDay::Sunset => 1,
            TimeOfDay::Night => 2,
        }
    }

    /// Bucket a wall-clock hour.
    ///
    /// - Day: `[7, 17)`
    /// - Sunset: `[5, 7)` and `[17, 20)` (dawn shares the sunset palette)
    /// - Night: everything else
    ///
    /// Hours outside `[0, 24)` wrap; non-finite hours are treated as noon.
    pub fn from_hour(hour: f32) -> Self {
        let hour = if hour.is_finite() { hour.rem_euclid(24.0) } else { 12.0 };
        if (7.0..17.0).contains(&hour) {
            TimeOfDay::Day
        } else if (5.0..7.0).contains(&hour) || (17.0..20.0).contains(&hour) {
            TimeOfDay::Sunset
        } else {
            TimeOfDay::Night
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buckets() {
        assert_eq!(TimeOfDay::from_hour(12.0), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(7.0), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(16.99), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(17.0), TimeOfDay::Sunset);
        assert_eq!(TimeOfDay::from_hour(6.0), TimeOfDay::Sunset);
        assert_eq!(TimeOfDay::from_hour(20.0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0.0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(4.5), TimeOfDay::Night);
    }

    #[test]
    fn test_wrapping_hours() {
        assert_eq!(TimeOfDay::from_hour(36.0), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(-6.0), TimeOfDay::Sunset);
        assert_eq!(TimeOfDay::from_hour(f32::NAN), TimeOfDay::Day);
    }

    #[test]
    fn test_indices() {
        let indices: Vec<u32> = TimeOfDay::ALL.iter().map(|t| t.index()).collect();
        assert_eq!(indices, [0, 1, 2]);
    }
}
