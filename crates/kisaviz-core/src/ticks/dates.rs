use chrono::NaiveDate;

/// Every calendar day from `start` through `end`, inclusive and ascending.
/// Empty when `start > end`.
pub fn day_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Number of days `day_range` yields.
pub fn day_count(start: NaiveDate, end: NaiveDate) -> usize {
    usize::try_from((end - start).num_days() + 1).unwrap_or(0)
}
