//! Wall-clock primitives: the 5-minute placement grid and `DayOfWeek`.

use chrono::Duration;

/// Size of the placement grid. Session durations the solver commits are
/// always a multiple of this; slot *starts* are whatever the eligibility
/// domain produces and are not independently re-aligned.
pub const GRID_MINUTES: i64 = 5;

/// Floor of what the solver will ever commit as a session length.
pub const MIN_SESSION_MINUTES: i64 = 5;

/// Round a duration down to the nearest multiple of [`GRID_MINUTES`].
pub fn floor_duration_to_grid(d: Duration) -> Duration {
    let mins = d.num_minutes();
    let rem = mins.rem_euclid(GRID_MINUTES);
    Duration::minutes(mins - rem)
}

/// Round a duration up to the nearest multiple of [`GRID_MINUTES`].
pub fn ceil_duration_to_grid(d: Duration) -> Duration {
    let mins = d.num_minutes();
    let rem = mins.rem_euclid(GRID_MINUTES);
    if rem == 0 {
        Duration::minutes(mins)
    } else {
        Duration::minutes(mins + (GRID_MINUTES - rem))
    }
}

/// Day of the week, pinned to the `0..6`/Monday-first encoding spelled out
/// in the solver's external interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum DayOfWeek {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl DayOfWeek {
    /// All seven days in `Monday..Sunday` order.
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Build a `DayOfWeek` from chrono's `Weekday`.
    pub fn from_chrono(w: chrono::Weekday) -> Self {
        match w {
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
            chrono::Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_rounding_is_idempotent_on_multiples() {
        let d = Duration::minutes(25);
        assert_eq!(floor_duration_to_grid(d), d);
        assert_eq!(ceil_duration_to_grid(d), d);
    }

    #[test]
    fn grid_rounding_moves_non_multiples_to_neighbors() {
        let d = Duration::minutes(23);
        assert_eq!(floor_duration_to_grid(d), Duration::minutes(20));
        assert_eq!(ceil_duration_to_grid(d), Duration::minutes(25));
    }

    #[test]
    fn day_of_week_discriminants_match_pinned_encoding() {
        assert_eq!(DayOfWeek::Monday as u8, 0);
        assert_eq!(DayOfWeek::Sunday as u8, 6);
    }
}
