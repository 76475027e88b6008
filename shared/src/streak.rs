//! Streak calculation over a date-ordered day sequence.

use crate::models::DayRecord;

/// Length of the longest run of consecutive days with contributions.
pub fn longest_streak(days: &[DayRecord]) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for day in days {
        if day.count > 0 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Length of the run of days with contributions ending at the latest day.
pub fn current_streak(days: &[DayRecord]) -> usize {
    days.iter().rev().take_while(|day| day.count > 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn days(counts: &[u32]) -> Vec<DayRecord> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| DayRecord::new(start + Duration::days(i as i64), count))
            .collect()
    }

    #[test]
    fn test_longest() {
        assert_eq!(longest_streak(&days(&[1, 0, 2, 3, 0, 0, 5])), 2);
        assert_eq!(longest_streak(&days(&[4, 4, 4, 0, 1])), 3);
        assert_eq!(longest_streak(&days(&[0, 0])), 0);
        assert_eq!(longest_streak(&[]), 0);
    }

    #[test]
    fn test_current() {
        assert_eq!(current_streak(&days(&[0, 1, 1, 1])), 3);
        assert_eq!(current_streak(&days(&[1, 0, 2, 3, 0, 0, 0])), 0);
        assert_eq!(current_streak(&days(&[1, 0, 2, 3, 0, 0, 5])), 1);
        assert_eq!(current_streak(&days(&[2, 2])), 2);
        assert_eq!(current_streak(&[]), 0);
    }
}
