use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

const SECS_PER_DAY: i64 = 86_400;

/// Date/time source for day-boundary and streak computations. A pinned clock
/// (from `--date`) fixes both the epoch-day and the calendar day, which is
/// also how the tests drive the selector and the streak rule.
#[derive(Clone, Copy, Debug, Default)]
pub struct Clock {
    pinned: Option<NaiveDate>,
}

impl Clock {
    pub fn system() -> Self {
        Self { pinned: None }
    }

    pub fn pinned(date: NaiveDate) -> Self {
        Self {
            pinned: Some(date),
        }
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        match self.pinned {
            // Midday keeps the pinned instant well inside the epoch-day.
            Some(date) => date
                .and_hms_opt(12, 0, 0)
                .map(|dt| dt.and_utc())
                .unwrap_or_else(Utc::now),
            None => Utc::now(),
        }
    }

    /// Calendar date used for streak arithmetic and the answered-today check.
    pub fn today(&self) -> NaiveDate {
        self.pinned.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Local calendar date, used only for the "Day N of 365" display.
    /// Intentionally a different clock than `today()` — see `day_of_year`.
    pub fn today_local(&self) -> NaiveDate {
        self.pinned.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Deterministic daily pick: whole days since the Unix epoch, mod bank size.
/// The boundary is the global epoch-day rollover, not local midnight — every
/// user sees the same question on the same epoch-day by definition.
pub fn daily_index(now: DateTime<Utc>, bank_size: usize) -> usize {
    debug_assert!(bank_size > 0);
    let epoch_day = now.timestamp().div_euclid(SECS_PER_DAY);
    (epoch_day.rem_euclid(bank_size as i64)) as usize
}

/// Ordinal day within the local calendar year, display only. Deliberately
/// decoupled from `daily_index`: one numbers the year, the other picks the
/// question, and unifying them would shift the pick for some timezones.
pub fn day_of_year(today: NaiveDate) -> u32 {
    today.ordinal()
}

/// Browse navigation clamps to the bank bounds; no wraparound.
pub fn clamp_index(index: i64, bank_size: usize) -> usize {
    if bank_size == 0 {
        return 0;
    }
    index.clamp(0, bank_size as i64 - 1) as usize
}

pub fn next_index(current: usize, bank_size: usize) -> usize {
    clamp_index(current as i64 + 1, bank_size)
}

pub fn prev_index(current: usize, bank_size: usize) -> usize {
    clamp_index(current as i64 - 1, bank_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn same_epoch_day_same_index() {
        let morning = at(10 * SECS_PER_DAY + 3600);
        let night = at(10 * SECS_PER_DAY + 23 * 3600);
        assert_eq!(daily_index(morning, 7), daily_index(night, 7));
    }

    #[test]
    fn consecutive_days_step_by_one_mod_bank_size() {
        let size = 7;
        let today = at(100 * SECS_PER_DAY + 5);
        let tomorrow = at(101 * SECS_PER_DAY + 5);
        let i = daily_index(today, size);
        assert_eq!(daily_index(tomorrow, size), (i + 1) % size);
    }

    #[test]
    fn bank_of_three_on_epoch_day_ten() {
        // floor(t / day) = 10, 10 mod 3 = 1.
        let now = at(10 * SECS_PER_DAY + 42);
        assert_eq!(daily_index(now, 3), 1);
    }

    #[test]
    fn index_wraps_over_the_whole_bank() {
        let size = 16;
        let seen: Vec<usize> = (0..size as i64)
            .map(|d| daily_index(at(d * SECS_PER_DAY), size))
            .collect();
        let mut sorted = seen.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), size);
    }

    #[test]
    fn day_of_year_counts_from_january_first() {
        let jan1 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(day_of_year(jan1), 1);
        let dec31 = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert_eq!(day_of_year(dec31), 365);
    }

    #[test]
    fn browse_navigation_clamps_without_wraparound() {
        assert_eq!(prev_index(0, 5), 0);
        assert_eq!(next_index(4, 5), 4);
        assert_eq!(next_index(2, 5), 3);
        assert_eq!(clamp_index(99, 5), 4);
        assert_eq!(clamp_index(-3, 5), 0);
    }

    #[test]
    fn pinned_clock_fixes_both_calendars() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let clock = Clock::pinned(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.today_local(), date);
        assert_eq!(clock.now_utc().date_naive(), date);
    }
}
