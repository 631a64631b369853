//! `collect` command: one full collection-and-ranking run.
//!
//! Collect the current batch from the selected platforms, load the most
//! recent prior snapshot for the same query, score and rank, archive the
//! result, and print a short report. Store read failures degrade to the
//! cold path rather than aborting the run; only a failed snapshot write is
//! fatal.

use std::str::FromStr;
use std::time::Duration;

use clipwatch_core::{AppConfig, Platform, RawCount, ScoredObservation};
use clipwatch_scraper::{collect_observations, SourceClient};
use clipwatch_store::SnapshotStore;

/// How many ranked entries the end-of-run report prints.
const REPORT_TOP_N: usize = 10;
const REPORT_TITLE_WIDTH: usize = 40;

pub(crate) async fn run_collect(
    config: &AppConfig,
    query: &str,
    limit: usize,
    platforms_arg: &str,
) -> anyhow::Result<()> {
    let platforms = parse_platforms(platforms_arg)?;
    tracing::info!(query, limit, platforms = ?platforms, "starting collection run");

    let client = SourceClient::from_config(config)?;
    let current = collect_observations(&client, config, query, limit, &platforms).await;
    if current.is_empty() {
        println!("no observations collected for \"{query}\" — check the query or connectivity");
        return Ok(());
    }
    tracing::info!(count = current.len(), "collected current batch");

    let store = SnapshotStore::with_max_age(
        config.history_dir(),
        Duration::from_secs(config.snapshot_max_age_days * 24 * 60 * 60),
    );

    // A broken archive must not cost the run: score without history instead.
    let previous = match store.load_latest(query) {
        Ok(previous) => previous.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to load previous snapshot — scoring without history");
            Vec::new()
        }
    };
    if previous.is_empty() {
        tracing::info!("no usable prior batch — every video scores on the cold path");
    }

    let ranked = clipwatch_engine::score_and_rank(&current, &previous);
    let path = store.save(query, &ranked)?;
    tracing::info!(path = %path.display(), count = ranked.len(), "snapshot archived");

    print_report(query, &ranked);
    Ok(())
}

fn parse_platforms(arg: &str) -> anyhow::Result<Vec<Platform>> {
    if arg.trim().eq_ignore_ascii_case("all") {
        return Ok(Platform::ALL.to_vec());
    }
    let platforms: Vec<Platform> = arg
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Platform::from_str(s).map_err(anyhow::Error::from))
        .collect::<anyhow::Result<_>>()?;
    if platforms.is_empty() {
        anyhow::bail!("no platforms selected (use \"all\" or a comma-separated list)");
    }
    Ok(platforms)
}

fn print_report(query: &str, ranked: &[ScoredObservation]) {
    let shown = ranked.len().min(REPORT_TOP_N);
    println!("top {shown} viral videos for \"{query}\":");
    for (i, rec) in ranked.iter().take(REPORT_TOP_N).enumerate() {
        let obs = &rec.observation;
        let title = truncate_title(obs.title.as_deref().unwrap_or("(untitled)"));
        println!(
            "{:2}. [{}] {title} — score {}",
            i + 1,
            obs.platform,
            rec.viral_score
        );
        println!(
            "    views {} | likes {} | comments {}",
            display_count(obs.views.as_ref()),
            display_count(obs.likes.as_ref()),
            display_count(obs.comments.as_ref())
        );
        println!("    {}", obs.url.as_deref().unwrap_or("(no url)"));
    }
}

pub(crate) fn display_count(value: Option<&RawCount>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(RawCount::Number(n)) => n.to_string(),
        Some(RawCount::Float(f)) => f.to_string(),
        Some(RawCount::Text(s)) => s.clone(),
    }
}

fn truncate_title(title: &str) -> String {
    if title.chars().count() <= REPORT_TITLE_WIDTH {
        return title.to_string();
    }
    let cut: String = title.chars().take(REPORT_TITLE_WIDTH - 3).collect();
    format!("{cut}...")
}
