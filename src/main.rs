//! Pushes today's row of a published fitness plan spreadsheet to Todoist.

use std::process::exit;

mod config;
mod formatter;
mod publisher;
mod selector;
mod source;
mod sync;
use config::{Credential, SHEET_CSV_URL};
use publisher::TodoistClient;
use selector::DateKeyword;
use source::PublishedSheet;
use sync::SyncOutcome;

fn main() {
    let dotenv = dotenvy::dotenv();
    env_logger::init();
    match dotenv {
        Ok(path) => log::debug!("Loaded environment from {path:?}"),
        Err(err) if err.not_found() => log::debug!("No .env file found, using process environment"),
        Err(err) => log::warn!("Ignoring unreadable .env file: {err}"),
    }

    println!("🚀 Syncing today's fitness plan...");
    let res = sync::run(
        Credential::from_env(),
        &PublishedSheet { url: SHEET_CSV_URL },
        TodoistClient::new,
        DateKeyword::today(),
    );

    match res {
        Ok(SyncOutcome::NoPlanToday { keyword }) => {
            println!("😴 No plan for today ('{keyword}') in the sheet, or the date is written differently. Rest day!");
        }
        Ok(SyncOutcome::EmptyPlan { keyword }) => {
            println!("📭 Today ('{keyword}') is in the sheet but all plan columns are empty.");
        }
        Ok(SyncOutcome::Published { keyword, report }) => {
            println!(
                "📅 Plan for '{keyword}': {} of {} tasks created",
                report.succeeded(),
                report.outcomes.len()
            );
            for outcome in &report.outcomes {
                match &outcome.result {
                    Ok(created) => println!("✅ Added task: {}", created.content),
                    Err(err) => println!("❌ Adding '{}' failed: {err}", outcome.content),
                }
            }
        }
        Err(err) => {
            println!("❌ {err}");
            log::error!("Run aborted: {err:?}");
            exit(1);
        }
    }
}
