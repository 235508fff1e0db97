use std::collections::HashMap;

use crate::config::COL_DATE;

/// Failure to obtain the raw table from the published sheet.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connecting, reading the body or a non-success status code
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a web page instead of CSV (sheet published as html or a login wall)
    #[error("expected CSV but received {0}")]
    NotCsv(String),
    /// The body isn't readable as CSV
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Nothing usable could be loaded, so no task may be created.
    #[error("reading the plan spreadsheet failed: {0}")]
    Unavailable(#[from] FetchError),
    /// The table was loaded but the required column is missing.
    #[error("the sheet has no column named '{column}', found columns: {found:?}")]
    Schema {
        column: &'static str,
        found: Vec<String>,
    },
}

/// One spreadsheet row, cells addressed by their trimmed column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanRow {
    cells: HashMap<String, String>,
}

impl PlanRow {
    /// `None` if the column doesn't exist. An existing but blank cell is `Some("")`.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PlanRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut cells = HashMap::new();
        for (k, v) in iter {
            cells.entry(k.into()).or_insert_with(|| v.into());
        }
        PlanRow { cells }
    }
}

/// All rows of the sheet in the order the server delivered them.
#[derive(Debug, Clone, Default)]
pub struct PlanTable {
    pub columns: Vec<String>,
    pub rows: Vec<PlanRow>,
}

/// Anything able to hand out a fresh [PlanTable].
pub trait PlanSource {
    fn load(&self) -> Result<PlanTable, SourceError>;
}

/// A spreadsheet published to the web as CSV.
pub struct PublishedSheet<'a> {
    pub url: &'a str,
}

impl PlanSource for PublishedSheet<'_> {
    fn load(&self) -> Result<PlanTable, SourceError> {
        fetch_plan_table(self.url)
    }
}

/// Download `url` and parse it with [parse_plan_table].
pub fn fetch_plan_table(url: &str) -> Result<PlanTable, SourceError> {
    log::debug!("Fetching plan sheet from {url}");
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(FetchError::Http)?;
    log::trace!("Sheet responded with status {}", response.status());

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = response.text().map_err(FetchError::Http)?;

    if looks_like_html(content_type.as_deref(), &body) {
        return Err(FetchError::NotCsv(content_type.unwrap_or_else(|| "an html page".into())).into());
    }
    parse_plan_table(&body, COL_DATE)
}

fn looks_like_html(content_type: Option<&str>, body: &str) -> bool {
    if content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("text/html")) {
        return true;
    }
    let head: String = body.trim_start().chars().take(15).collect();
    let head = head.to_ascii_lowercase();
    head.starts_with("<!doctype html") || head.starts_with("<html")
}

/// Parse CSV text whose first record is the header.
///
/// Column names are trimmed (including a leading byte order mark). Records shorter than
/// the header get empty cells for the missing columns, surplus fields are dropped.
pub fn parse_plan_table(text: &str, date_column: &'static str) -> Result<PlanTable, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(FetchError::Csv)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_owned())
        .collect();

    if !columns.iter().any(|c| c == date_column) {
        return Err(SourceError::Schema {
            column: date_column,
            found: columns,
        });
    }

    let mut rows: Vec<PlanRow> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(FetchError::Csv)?;
        let row: PlanRow = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), record.get(i).unwrap_or("")))
            .collect();
        rows.push(row);
    }
    log::debug!("Loaded {} rows with columns {columns:?}", rows.len());

    Ok(PlanTable { columns, rows })
}
