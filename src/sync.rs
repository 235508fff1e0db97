use crate::{
    config::{COL_DATE, ConfigError, Credential},
    formatter::format_tasks,
    publisher::{PublishReport, TaskService, publish_all},
    selector::{DateKeyword, select_row},
    source::{PlanSource, SourceError},
};

/// A fatal error ending the run before any task was created.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The credential is missing, nothing was loaded or sent.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The sheet couldn't be loaded or lacks the date column.
    #[error("{0}")]
    Source(#[from] SourceError),
}

/// How a run ended when nothing fatal happened.
#[derive(Debug)]
pub enum SyncOutcome {
    /// No row carries today's date. A rest day, not an error.
    NoPlanToday { keyword: DateKeyword },
    /// Today's row exists but all plan columns are blank.
    EmptyPlan { keyword: DateKeyword },
    /// Tasks were attempted, see the report for each one's result.
    Published {
        keyword: DateKeyword,
        report: PublishReport,
    },
}

/// Run one synchronization for the day described by `keyword`.
///
/// The credential is checked before `source` is touched. `connect` is only called
/// once there is at least one task to create.
pub fn run<S, T, C>(
    credential: Result<Credential, ConfigError>,
    source: &S,
    connect: C,
    keyword: DateKeyword,
) -> Result<SyncOutcome, Error>
where
    S: PlanSource + ?Sized,
    T: TaskService,
    C: FnOnce(Credential) -> T,
{
    let credential = credential?;
    log::info!("Start synchronizing plan for '{keyword}'");

    let table = source.load()?;
    log::debug!("Sheet has {} rows, columns {:?}", table.rows.len(), table.columns);
    let Some(row) = select_row(&table, COL_DATE, &keyword) else {
        log::info!("No row for '{keyword}'");
        return Ok(SyncOutcome::NoPlanToday { keyword });
    };

    let tasks = format_tasks(row);
    if tasks.is_empty() {
        log::info!("Row for '{keyword}' has no filled plan columns");
        return Ok(SyncOutcome::EmptyPlan { keyword });
    }

    log::debug!("Publishing {} tasks", tasks.len());
    let service = connect(credential);
    let report = publish_all(&service, &tasks);
    log::info!(
        "Publishing finished: {} created, {} failed",
        report.succeeded(),
        report.failed()
    );
    Ok(SyncOutcome::Published { keyword, report })
}
