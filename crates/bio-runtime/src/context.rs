use bio_core::BioreactorConfig;
use bio_econ::{
    compute_breakdown, compute_labor_sensitivity_with, CostBreakdown, CostError,
    LaborSensitivityTable, SensitivityOptions, DEFAULT_DELTAS,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Recalculation settings held by the context for its whole lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextSettings {
    /// Relative labor deltas in percent.
    pub deltas: Vec<i32>,
    pub sensitivity: SensitivityOptions,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            deltas: DEFAULT_DELTAS.to_vec(),
            sensitivity: SensitivityOptions::default(),
        }
    }
}

/// Immutable results derived from one configuration.
#[derive(Clone, Debug)]
pub struct Snapshot {
    /// Starts at 1 and increments on every successful update.
    pub revision: u64,
    pub config: Arc<BioreactorConfig>,
    pub breakdown: Arc<CostBreakdown>,
    pub labor_table: Arc<LaborSensitivityTable>,
}

impl Snapshot {
    fn build(
        revision: u64,
        config: BioreactorConfig,
        settings: &ContextSettings,
    ) -> Result<Self, CostError> {
        let breakdown = compute_breakdown(&config)?;
        let labor_table =
            compute_labor_sensitivity_with(&config, &settings.deltas, &settings.sensitivity)?;
        Ok(Self {
            revision,
            config: Arc::new(config),
            breakdown: Arc::new(breakdown),
            labor_table: Arc::new(labor_table),
        })
    }
}

/// Receives every snapshot the context publishes.
///
/// Called on the writer's thread while the update is still in progress, so
/// implementations must not call back into
/// [`CalculationContext::update_config`], `subscribe` or `unsubscribe`.
pub trait SnapshotListener: Send + Sync {
    fn on_snapshot(&self, snapshot: &Arc<Snapshot>);
}

impl<F> SnapshotListener for F
where
    F: Fn(&Arc<Snapshot>) + Send + Sync,
{
    fn on_snapshot(&self, snapshot: &Arc<Snapshot>) {
        self(snapshot)
    }
}

/// Handle returned by [`CalculationContext::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns the live configuration and the latest derived snapshot.
///
/// Readers get an `Arc<Snapshot>`; an update builds a complete new snapshot
/// and publishes it with one pointer swap, so a reader never sees a
/// breakdown and a labor table from different configurations.
pub struct CalculationContext {
    settings: ContextSettings,
    current: RwLock<Arc<Snapshot>>,
    // Serializes writers; holds the last published revision.
    writer: Mutex<u64>,
    listeners: Mutex<Vec<(SubscriptionId, Box<dyn SnapshotListener>)>>,
    next_subscription: AtomicU64,
}

impl CalculationContext {
    /// Create a context with default settings.
    pub fn init(config: BioreactorConfig) -> Result<Self, CostError> {
        Self::init_with(config, ContextSettings::default())
    }

    /// Create a context; fails if the initial configuration or the delta set
    /// is invalid.
    pub fn init_with(config: BioreactorConfig, settings: ContextSettings) -> Result<Self, CostError> {
        let snapshot = Snapshot::build(1, config, &settings)?;
        info!(
            deltas = ?settings.deltas,
            lever = ?settings.sensitivity.lever,
            total_cost = %snapshot.breakdown.total_cost,
            "calculation context initialized"
        );
        Ok(Self {
            settings,
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(1),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        })
    }

    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    /// Replace the configuration and publish freshly derived results.
    ///
    /// On error the previous snapshot stays published, listeners are not
    /// notified, and the error is returned.
    pub fn update_config(&self, config: BioreactorConfig) -> Result<Arc<Snapshot>, CostError> {
        let mut revision = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = match Snapshot::build(*revision + 1, config, &self.settings) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                warn!(error = %e, revision = *revision, "configuration rejected; keeping last snapshot");
                return Err(e);
            }
        };
        *revision = snapshot.revision;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&snapshot);
        info!(
            revision = snapshot.revision,
            total_cost = %snapshot.breakdown.total_cost,
            cogs_with_depreciation = %snapshot.breakdown.cogs_with_depreciation,
            current_percentage = snapshot.labor_table.current_percentage,
            "published snapshot"
        );
        self.notify(&snapshot);
        Ok(snapshot)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*current)
    }

    pub fn cost_breakdown(&self) -> Arc<CostBreakdown> {
        Arc::clone(&self.snapshot().breakdown)
    }

    pub fn labor_sensitivity_table(&self) -> Arc<LaborSensitivityTable> {
        Arc::clone(&self.snapshot().labor_table)
    }

    pub fn config(&self) -> Arc<BioreactorConfig> {
        Arc::clone(&self.snapshot().config)
    }

    /// Register a listener for future snapshots.
    pub fn subscribe(&self, listener: Box<dyn SnapshotListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        debug!(id = id.0, "listener subscribed");
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        before != listeners.len()
    }

    fn notify(&self, snapshot: &Arc<Snapshot>) {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, l) in listeners.iter() {
            l.on_snapshot(snapshot);
        }
    }

    /// Drop all listeners and release the context.
    pub fn teardown(self) {
        let listeners = self
            .listeners
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let revision = self
            .writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        info!(revision, listeners = listeners.len(), "calculation context torn down");
    }
}
