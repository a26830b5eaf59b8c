use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::dates::{day_count, day_range};
use crate::error::AggregateError;
use crate::models::{Participation, TickList};

/// Joins codes that share the top count on a day. Shown to users as-is.
pub const TIE_SEPARATOR: &str = ", ";

/// Most ticked code(s) of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyWinner {
    pub date: NaiveDate,
    /// Sorted codes tied at `count`, joined with `TIE_SEPARATOR`. Empty if nothing was ticked.
    pub label: String,
    pub count: usize,
}

/// One fetch's participations plus the count queries over their tick lists.
#[derive(Debug, Clone, Default)]
pub struct ContestSnapshot {
    participations: Vec<Participation>,
}

impl ContestSnapshot {
    pub fn new(participations: Vec<Participation>) -> Self {
        Self { participations }
    }

    pub fn from_tick_lists(tick_lists: impl IntoIterator<Item = TickList>) -> Self {
        Self::new(tick_lists.into_iter().map(Participation::new).collect())
    }

    /// All participations, including those without ticks
    pub fn participations(&self) -> &[Participation] {
        &self.participations
    }

    /// The corpus: every non-empty tick list
    pub fn tick_lists(&self) -> impl Iterator<Item = &TickList> {
        self.participations
            .iter()
            .filter(|p| p.has_ticks())
            .map(|p| &p.tick_list)
    }

    pub fn is_empty(&self) -> bool {
        self.tick_lists().next().is_none()
    }

    /// How many participants ticked `code` on each date.
    pub fn count_by_code(&self, code: &str) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for date in self.tick_lists().filter_map(|ticks| ticks.get(code)) {
            *counts.entry(*date).or_insert(0) += 1;
        }
        counts
    }

    /// How many participants ticked each code on `date`.
    pub fn count_by_date(&self, date: NaiveDate) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for ticks in self.tick_lists() {
            for (code, _) in ticks.iter().filter(|(_, ticked)| **ticked == date) {
                *counts.entry(code.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Daily tick counts of `code` for every day in the range, zeros included.
    /// Missing bounds default to `date_limits`.
    pub fn cumulation(
        &self,
        code: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<(NaiveDate, usize)>, AggregateError> {
        let (start, end) = self.resolve_range(start, end)?;
        let counts = self.count_by_code(code);

        let mut series = Vec::with_capacity(day_count(start, end));
        series.extend(day_range(start, end).map(|day| (day, counts.get(&day).copied().unwrap_or(0))));
        Ok(series)
    }

    /// The most ticked code(s) of every day in the range.
    pub fn daily_popular(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyWinner>, AggregateError> {
        let (start, end) = self.resolve_range(Some(start), Some(end))?;
        let by_day = self.counts_by_day();

        let mut winners = Vec::with_capacity(day_count(start, end));
        winners.extend(day_range(start, end).map(|date| match by_day.get(&date) {
            Some(counts) => Self::winner(date, counts),
            None => DailyWinner {
                date,
                label: String::new(),
                count: 0,
            },
        }));
        Ok(winners)
    }

    /// Total ticks over all codes for every day in the range, zeros included.
    pub fn daily_totals(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<(NaiveDate, usize)>, AggregateError> {
        let (start, end) = self.resolve_range(start, end)?;
        let by_day = self.counts_by_day();

        let mut totals = Vec::with_capacity(day_count(start, end));
        totals.extend(day_range(start, end).map(|day| {
            let total = by_day.get(&day).map(|c| c.values().sum::<usize>()).unwrap_or(0);
            (day, total)
        }));
        Ok(totals)
    }

    /// Every code ticked by anyone, sorted.
    pub fn all_codes(&self) -> Vec<String> {
        self.tick_lists()
            .flat_map(|ticks| ticks.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Earliest and latest tick date in the corpus.
    pub fn date_limits(&self) -> Result<(NaiveDate, NaiveDate), AggregateError> {
        let mut dates = self.tick_lists().flat_map(|ticks| ticks.values().copied());
        let first = dates.next().ok_or(AggregateError::EmptyCorpus)?;

        Ok(dates.fold((first, first), |(min, max), date| {
            (min.min(date), max.max(date))
        }))
    }

    fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(NaiveDate, NaiveDate), AggregateError> {
        let (first, last) = self.date_limits()?;
        let start = start.unwrap_or(first);
        let end = end.unwrap_or(last);

        if start > end {
            return Err(AggregateError::InvalidRange { start, end });
        }
        Ok((start, end))
    }

    /// date -> code -> count, in one pass over the corpus
    fn counts_by_day(&self) -> BTreeMap<NaiveDate, BTreeMap<&str, usize>> {
        let mut by_day: BTreeMap<NaiveDate, BTreeMap<&str, usize>> = BTreeMap::new();
        for ticks in self.tick_lists() {
            for (code, date) in ticks {
                *by_day.entry(*date).or_default().entry(code.as_str()).or_insert(0) += 1;
            }
        }
        by_day
    }

    fn winner(date: NaiveDate, counts: &BTreeMap<&str, usize>) -> DailyWinner {
        let count = counts.values().copied().max().unwrap_or(0);
        // BTreeMap keys are already in lexicographic order
        let label = counts
            .iter()
            .filter(|(_, c)| **c == count)
            .map(|(code, _)| *code)
            .collect::<Vec<_>>()
            .join(TIE_SEPARATOR);

        DailyWinner { date, label, count }
    }
}
