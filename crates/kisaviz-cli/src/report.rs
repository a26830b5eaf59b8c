//! Plain text rendering of contests and daily leaderboards.

use std::fmt::Write;

use kisaviz_core::{Contest, DailyWinner};

const DATE_WIDTH: usize = 12;
const COUNT_WIDTH: usize = 6;

/// One line per contest: end date, id, name.
pub fn contest_lines(contests: &[Contest]) -> String {
    let mut out = String::new();
    for contest in contests {
        let _ = writeln!(
            out,
            "{:<width$}{}  {}",
            contest.date_end.as_deref().unwrap_or("-"),
            contest.id,
            contest.name().unwrap_or(""),
            width = DATE_WIDTH
        );
    }
    out
}

/// The daily most-ticked table, one row per day.
pub fn leaderboard_table(winners: &[DailyWinner]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<dw$}{:>cw$}  Most ticked",
        "Date",
        "Ticks",
        dw = DATE_WIDTH,
        cw = COUNT_WIDTH
    );
    for winner in winners {
        let label = if winner.label.is_empty() { "-" } else { winner.label.as_str() };
        let _ = writeln!(
            out,
            "{:<dw$}{:>cw$}  {}",
            winner.date.to_string(),
            winner.count,
            label,
            dw = DATE_WIDTH,
            cw = COUNT_WIDTH
        );
    }
    out
}
