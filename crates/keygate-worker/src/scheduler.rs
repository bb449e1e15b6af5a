//! Cron scheduler for the stale-session sweep.

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use keygate_core::config::worker::WorkerConfig;
use keygate_core::error::AppError;

use crate::jobs::ReclaimJob;

/// Cron-based scheduler driving [`ReclaimJob`].
pub struct ReclaimScheduler {
    scheduler: JobScheduler,
    job: ReclaimJob,
    schedule: String,
}

impl std::fmt::Debug for ReclaimScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReclaimScheduler")
            .field("schedule", &self.schedule)
            .finish()
    }
}

impl ReclaimScheduler {
    /// Create a new scheduler
    pub async fn new(job: ReclaimJob, config: &WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            job,
            schedule: config.reclaim_schedule.clone(),
        })
    }

    /// Register the sweep and start ticking
    pub async fn start(&mut self) -> Result<(), AppError> {
        self.register_reclaim().await?;
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    async fn register_reclaim(&self) -> Result<(), AppError> {
        let job = self.job.clone();
        let cron = CronJob::new_async(self.schedule.as_str(), move |_uuid, _lock| {
            let job = job.clone();
            Box::pin(async move {
                match job.run().await {
                    Ok(summary) => tracing::trace!(%summary, "Session reclaim tick"),
                    Err(e) => tracing::error!("Stale session sweep failed: {}", e),
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!(
                "Invalid reclaim schedule '{}': {e}",
                self.schedule
            ))
        })?;

        self.scheduler
            .add(cron)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add reclaim schedule: {e}")))?;

        tracing::info!(schedule = %self.schedule, "Registered: session_reclaim");
        Ok(())
    }
}
