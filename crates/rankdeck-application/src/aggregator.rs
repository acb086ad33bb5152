//! Global aggregation batch job.
//!
//! Folds completed sessions' ranking snapshots into the global leaderboard,
//! each snapshot exactly once. Invoked periodically by an external
//! scheduler or on demand.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use rankdeck_core::config::RankdeckConfig;
use rankdeck_core::error::Result;
use rankdeck_core::leaderboard::{GlobalLeaderboardEntry, RankingSnapshot};
use rankdeck_core::repository::{LeaderboardRepository, SnapshotRepository};

/// Summary of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationReport {
    /// Snapshots folded into the leaderboard this run.
    pub snapshots_processed: usize,
    /// Claimed snapshots whose fold failed; released for a future run.
    pub snapshots_skipped: usize,
    /// Leaderboard entries written.
    pub items_updated: usize,
    /// True when another run held the single-flight guard.
    pub already_running: bool,
}

/// Batch aggregator for the global leaderboard.
///
/// Runs are single-flight: a second concurrent invocation observes the held
/// guard and returns immediately without touching any state. The snapshot
/// claim itself is atomic at the repository, so even across processes a
/// snapshot is scored at most once.
pub struct GlobalAggregator {
    snapshot_repository: Arc<dyn SnapshotRepository>,
    leaderboard_repository: Arc<dyn LeaderboardRepository>,
    config: RankdeckConfig,
    run_guard: Mutex<()>,
}

impl GlobalAggregator {
    /// Creates a new `GlobalAggregator`.
    pub fn new(
        snapshot_repository: Arc<dyn SnapshotRepository>,
        leaderboard_repository: Arc<dyn LeaderboardRepository>,
        config: RankdeckConfig,
    ) -> Self {
        Self {
            snapshot_repository,
            leaderboard_repository,
            config,
            run_guard: Mutex::new(()),
        }
    }

    /// Runs one aggregation batch.
    ///
    /// Claims up to the configured batch size of not-yet-contributed
    /// snapshots (most recently completed first) and folds each into the
    /// leaderboard. A snapshot whose fold fails is logged, released, and
    /// left for the next run; the batch continues. Re-invoking with nothing
    /// to claim changes no entry.
    pub async fn run_global_aggregation(&self) -> Result<AggregationReport> {
        let Ok(_guard) = self.run_guard.try_lock() else {
            tracing::warn!("[GlobalAggregator] Aggregation already running, skipping");
            return Ok(AggregationReport {
                already_running: true,
                ..AggregationReport::default()
            });
        };

        let claimed = self
            .snapshot_repository
            .claim_pending(self.config.aggregation_batch_size)
            .await?;
        if claimed.is_empty() {
            tracing::debug!("[GlobalAggregator] No pending snapshots");
            return Ok(AggregationReport::default());
        }

        let mut report = AggregationReport::default();
        for snapshot in &claimed {
            match self.fold_snapshot(snapshot).await {
                Ok(items) => {
                    report.snapshots_processed += 1;
                    report.items_updated += items;
                }
                Err(err) => {
                    tracing::warn!(
                        "[GlobalAggregator] Failed to fold snapshot from session {}: {}",
                        snapshot.session_id,
                        err
                    );
                    if let Err(release_err) =
                        self.snapshot_repository.release(&snapshot.session_id).await
                    {
                        tracing::error!(
                            "[GlobalAggregator] Failed to release snapshot {}: {}",
                            snapshot.session_id,
                            release_err
                        );
                    }
                    report.snapshots_skipped += 1;
                }
            }
        }

        tracing::info!(
            "[GlobalAggregator] Batch complete: processed={}, skipped={}, items_updated={}",
            report.snapshots_processed,
            report.snapshots_skipped,
            report.items_updated
        );

        Ok(report)
    }

    /// The current global ranking, best score first.
    pub async fn global_ranking(&self, limit: usize) -> Result<Vec<GlobalLeaderboardEntry>> {
        self.leaderboard_repository.top(limit).await
    }

    /// Awards positional points for one snapshot and upserts the affected
    /// entries. Position `i` (0-indexed) earns `max(position_points - i, 0)`
    /// points and records rank `i + 1`.
    async fn fold_snapshot(&self, snapshot: &RankingSnapshot) -> Result<usize> {
        let now = Utc::now();
        for (position, item_id) in snapshot.ranking.iter().enumerate() {
            let points = (self.config.position_points - position as i64).max(0);
            let rank = (position + 1) as u64;

            let mut entry = self
                .leaderboard_repository
                .get(item_id)
                .await?
                .unwrap_or_else(|| GlobalLeaderboardEntry::new(item_id, now));
            entry.record_contribution(points, rank, now);
            self.leaderboard_repository.upsert(entry).await?;
        }
        Ok(snapshot.ranking.len())
    }
}
