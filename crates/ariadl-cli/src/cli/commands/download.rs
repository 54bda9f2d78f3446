//! `ariadl episode` / `ariadl collection` – run a flow and print what was queued.

use anyhow::{Context, Result};
use ariadl_core::config::ClientConfig;
use ariadl_core::flow::{DispatchReport, FailurePolicy, Orchestrator};
use ariadl_core::naming::Naming;
use ariadl_core::resolver::CurlPageSource;
use ariadl_core::rpc::{Aria2Dispatcher, CallOutcome};
use ariadl_core::store::ValueDb;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Copy)]
enum Scope {
    Episode,
    Collection,
}

pub async fn run_episode(
    db: ValueDb,
    cfg: &ClientConfig,
    url: &str,
    skip_failed: bool,
) -> Result<()> {
    run_flow(db, cfg, url, skip_failed, Scope::Episode).await
}

pub async fn run_collection(
    db: ValueDb,
    cfg: &ClientConfig,
    url: &str,
    skip_failed: bool,
) -> Result<()> {
    run_flow(db, cfg, url, skip_failed, Scope::Collection).await
}

async fn run_flow(
    db: ValueDb,
    cfg: &ClientConfig,
    url: &str,
    skip_failed: bool,
    scope: Scope,
) -> Result<()> {
    let url = Url::parse(url).with_context(|| format!("invalid watch page URL: {url}"))?;
    let policy = if skip_failed {
        FailurePolicy::SkipFailed
    } else {
        FailurePolicy::AbortAll
    };
    let flow = Orchestrator::new(
        db,
        Arc::new(CurlPageSource::new(cfg)),
        Aria2Dispatcher::new(cfg),
    )
    .with_policy(policy);

    let page = flow.load_page(url).await?;
    let report = match scope {
        Scope::Episode => flow.download_episode(&page).await?,
        Scope::Collection => flow.download_collection(&page).await?,
    };
    print_report(&report, Naming::new(cfg.sanitize_names));
    Ok(())
}

/// `gid  out` per queued item on stdout; rejections and skips on stderr.
fn print_report(report: &DispatchReport, naming: Naming) {
    println!("collection: {}", report.collection);
    for (item, outcome) in report.items.iter().zip(&report.outcomes) {
        let out = naming.out(&item.title);
        match outcome {
            CallOutcome::Queued { gid } => println!("{gid}  {out}"),
            CallOutcome::Fault { code, message } => {
                eprintln!("rejected  {out} ({code}: {message})")
            }
        }
    }
    for s in &report.skipped {
        eprintln!("skipped  {} ({})", s.page, s.error);
    }
}
