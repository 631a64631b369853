//! `history` command: recorded metrics for one video across all snapshots.

use clipwatch_core::AppConfig;
use clipwatch_store::SnapshotStore;

use crate::collect::display_count;

pub(crate) fn run_history(
    config: &AppConfig,
    video_id: &str,
    platform: Option<&str>,
) -> anyhow::Result<()> {
    let store = SnapshotStore::new(config.history_dir());
    let history = store.history_for(video_id, platform)?;

    if history.is_empty() {
        println!("no recorded history for video \"{video_id}\"");
        return Ok(());
    }

    println!("history for video \"{video_id}\" ({} records):", history.len());
    for rec in &history {
        let obs = &rec.observation;
        println!(
            "{} [{}] views {} | likes {} | comments {} | score {}",
            obs.collected_at,
            obs.platform,
            display_count(obs.views.as_ref()),
            display_count(obs.likes.as_ref()),
            display_count(obs.comments.as_ref()),
            rec.viral_score
        );
    }
    Ok(())
}
