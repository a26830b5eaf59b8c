//! Data prepared for the chart and leaderboard renderer.
//!
//! The renderer wants every series on one shared date axis and plots axis
//! points as timestamps. Some renderers drop zone information and show
//! midnight on the previous day; `axis_offset_hours` shifts the axis points
//! to compensate. The shift is applied here only, never to the dates used
//! for counting.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::AggregateError;
use crate::ticks::{ContestSnapshot, DailyWinner};

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    /// Midnight of each day in the date span, shifted by the axis offset
    pub axis: Vec<NaiveDateTime>,
    /// Daily tick counts per code, aligned with `axis`
    pub series: BTreeMap<String, Vec<usize>>,
    /// Daily tick counts over all codes, aligned with `axis`
    pub totals: Vec<usize>,
    pub leaderboard: Vec<DailyWinner>,
}

impl ChartData {
    /// Build chart data covering the snapshot's whole date span.
    pub fn build(snapshot: &ContestSnapshot, axis_offset_hours: i64) -> Result<Self, AggregateError> {
        let (start, end) = snapshot.date_limits()?;
        let invalid_offset = AggregateError::InvalidOffset {
            hours: axis_offset_hours,
        };
        let offset = Duration::try_hours(axis_offset_hours).ok_or_else(|| invalid_offset.clone())?;

        let mut series: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for code in snapshot.all_codes() {
            let counts: Vec<usize> = snapshot
                .cumulation(&code, Some(start), Some(end))?
                .into_iter()
                .map(|(_, count)| count)
                .collect();
            series.insert(code, counts);
        }

        let totals_by_day = snapshot.daily_totals(Some(start), Some(end))?;
        let axis = totals_by_day
            .iter()
            .map(|(day, _)| axis_point(*day, offset).ok_or_else(|| invalid_offset.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        let totals = totals_by_day.into_iter().map(|(_, total)| total).collect();

        Ok(Self {
            axis,
            series,
            totals,
            leaderboard: snapshot.daily_popular(start, end)?,
        })
    }
}

fn axis_point(day: NaiveDate, offset: Duration) -> Option<NaiveDateTime> {
    day.and_time(NaiveTime::MIN).checked_add_signed(offset)
}
