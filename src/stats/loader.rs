use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use super::{Component, ComponentKind, StatTypeRegistry};

type Slot = Arc<OnceCell<Option<Arc<Component>>>>;

/// Builds editor and setup components on first use and keeps them for the
/// lifetime of the process, keyed by stat type and component kind.
pub struct ComponentLoader {
    registry: Arc<StatTypeRegistry>,
    slots: Mutex<HashMap<(String, ComponentKind), Slot>>,
    loads: AtomicUsize,
}

impl ComponentLoader {
    pub fn new(registry: Arc<StatTypeRegistry>) -> Self {
        Self {
            registry,
            slots: Mutex::new(HashMap::new()),
            loads: AtomicUsize::new(0),
        }
    }

    /// `None` when the stat type is unknown or lacks the matching capability.
    #[instrument(skip(self))]
    pub async fn load(&self, stat_type_id: &str, kind: ComponentKind) -> Option<Arc<Component>> {
        let slot = self.slot(stat_type_id, kind);

        slot.get_or_init(move || async move {
            self.loads.fetch_add(1, Ordering::Relaxed);
            debug!(stat_type = %stat_type_id, ?kind, "Loading component");

            let stat_type = self.registry.get(stat_type_id)?;
            let component = match kind {
                ComponentKind::Updater => stat_type.as_updatable()?.updater(),
                ComponentKind::Configurator => stat_type.as_configurable()?.configurator(),
            };
            Some(Arc::new(component))
        })
        .await
        .clone()
    }

    /// Number of components built so far.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn slot(&self, stat_type_id: &str, kind: ComponentKind) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots
            .entry((stat_type_id.to_string(), kind))
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> ComponentLoader {
        ComponentLoader::new(Arc::new(StatTypeRegistry::builder().build().unwrap()))
    }

    #[tokio::test]
    async fn loads_each_component_once() {
        let loader = loader();

        let first = loader.load("card-vps", ComponentKind::Updater).await.unwrap();
        let second = loader.load("card-vps", ComponentKind::Updater).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.load_count(), 1);
        assert_eq!(first.selector, "tfm-card-vps-player-stats-updater");
    }

    #[tokio::test]
    async fn kinds_are_cached_separately() {
        let loader = loader();

        let updater = loader.load("card-vps", ComponentKind::Updater).await.unwrap();
        let configurator = loader
            .load("card-vps", ComponentKind::Configurator)
            .await
            .unwrap();

        assert_ne!(updater.selector, configurator.selector);
        assert_eq!(loader.load_count(), 2);
    }

    #[tokio::test]
    async fn missing_capability_is_none() {
        let loader = loader();

        assert!(loader
            .load("score", ComponentKind::Configurator)
            .await
            .is_none());
        assert!(loader.load("ghost", ComponentKind::Updater).await.is_none());

        // Misses are cached too.
        loader.load("ghost", ComponentKind::Updater).await;
        assert_eq!(loader.load_count(), 2);
    }
}
