//! The bundle of components a front-end talks to.

use std::sync::Arc;

use recall_core::clock::{Clock, SystemClock};

use crate::config::EngineConfig;
use crate::db::StoreHandle;
use crate::error::Result;
use crate::services::accounts::Accounts;
use crate::services::analytics::Analytics;
use crate::services::catalog::Catalog;
use crate::services::priority::DeckPrioritizer;
use crate::services::queue::ReviewQueue;
use crate::services::scheduler::Scheduler;
use crate::services::sessions::SessionRecorder;

/// Every engine component, each with its own store connection.
pub struct StudyEngine {
    pub accounts: Accounts,
    pub catalog: Catalog,
    pub scheduler: Scheduler,
    pub queue: ReviewQueue,
    pub priority: DeckPrioritizer,
    pub sessions: SessionRecorder,
    pub analytics: Analytics,
}

impl StudyEngine {
    /// Open against the system clock.
    pub fn open(config: &EngineConfig) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    pub fn open_with_clock(config: &EngineConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let timeout = config.busy_timeout();
        let open = |component: &'static str| StoreHandle::open(component, &config.store, timeout);

        let engine = Self {
            accounts: Accounts::new(open("accounts")?),
            catalog: Catalog::new(open("catalog")?),
            scheduler: Scheduler::new(open("scheduler")?, Arc::clone(&clock)),
            queue: ReviewQueue::new(open("queue")?, Arc::clone(&clock), config.due_queue_limit),
            priority: DeckPrioritizer::new(open("priority")?),
            sessions: SessionRecorder::new(open("sessions")?, Arc::clone(&clock)),
            analytics: Analytics::new(open("analytics")?, config.history_days),
        };
        tracing::info!(store = ?config.store, "study engine ready");
        Ok(engine)
    }
}
