use std::fmt;

use chrono::Datelike;

use crate::source::{PlanRow, PlanTable};

/// The date phrase searched for in the date column, e.g. `1月5日`.
///
/// Month and day are written without leading zeros, matching how the sheet spells dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateKeyword(String);

impl DateKeyword {
    pub fn for_date(date: impl Datelike) -> Self {
        DateKeyword(format!("{}月{}日", date.month(), date.day()))
    }

    /// Keyword for the current day in local time.
    pub fn today() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-sensitive containment, so annotations like `1月5日（周三）` still match.
    ///
    /// An occurrence directly preceded by a digit is ignored: `1月5日` is not found in `11月5日`.
    pub fn matches(&self, cell: &str) -> bool {
        cell.match_indices(self.as_str()).any(|(start, _)| {
            !cell[..start]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_digit())
        })
    }
}

impl fmt::Display for DateKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First row whose `date_column` cell contains `keyword`, in table order.
///
/// A missing cell is treated as empty and never matches. `None` means there's no plan for the day.
pub fn select_row<'t>(
    table: &'t PlanTable,
    date_column: &str,
    keyword: &DateKeyword,
) -> Option<&'t PlanRow> {
    let found = table
        .rows
        .iter()
        .position(|row| keyword.matches(row.get(date_column).unwrap_or("")));
    match found {
        Some(index) => {
            log::debug!("Row {index} matches '{keyword}'");
            table.rows.get(index)
        }
        None => {
            log::debug!("None of {} rows matches '{keyword}'", table.rows.len());
            None
        }
    }
}
