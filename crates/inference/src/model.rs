//! Asynchronously loaded model slot

use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Shared slot for a model that may still be loading.
///
/// Clones share the slot. The slot is filled at most once; until then
/// [`ModelHandle::get`] returns None and callers fail fast instead of
/// queuing work.
pub struct ModelHandle<M> {
    slot: Arc<OnceLock<Arc<M>>>,
}

impl<M> Clone for ModelHandle<M> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<M> Default for ModelHandle<M> {
    fn default() -> Self {
        Self {
            slot: Arc::new(OnceLock::new()),
        }
    }
}

impl<M> std::fmt::Debug for ModelHandle<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl<M> ModelHandle<M> {
    /// A handle with no model yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// A handle that is ready immediately
    pub fn ready(model: M) -> Self {
        let handle = Self::empty();
        handle.install(model);
        handle
    }

    /// Fill the slot. Returns false if a model was already installed.
    pub fn install(&self, model: M) -> bool {
        self.slot.set(Arc::new(model)).is_ok()
    }

    /// The loaded model, or None while loading
    pub fn get(&self) -> Option<Arc<M>> {
        self.slot.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl<M: Send + Sync + 'static> ModelHandle<M> {
    /// Run `load` on the tokio runtime and install its result.
    ///
    /// Must be called from within a tokio runtime. A failed load leaves the
    /// slot empty; the error is logged and returned through the join handle.
    pub fn spawn_load<F, E>(&self, load: F) -> JoinHandle<Result<(), E>>
    where
        F: Future<Output = Result<M, E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let handle = self.clone();
        tokio::spawn(async move {
            match load.await {
                Ok(model) => {
                    if handle.install(model) {
                        info!("Model loaded");
                    } else {
                        warn!("Model loaded but a model was already installed; keeping the first");
                    }
                    Ok(())
                }
                Err(e) => {
                    warn!("Model load failed: {}", e);
                    Err(e)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_then_install() {
        let handle: ModelHandle<u32> = ModelHandle::empty();
        let shared = handle.clone();
        assert!(!handle.is_ready());
        assert!(handle.get().is_none());

        assert!(shared.install(7));
        assert!(!shared.install(8));
        assert_eq!(handle.get().as_deref(), Some(&7));
    }

    #[tokio::test]
    async fn test_spawn_load() {
        let handle: ModelHandle<String> = ModelHandle::empty();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let task = handle.spawn_load(async move {
            rx.await.map_err(|e| e.to_string())?;
            Ok::<_, String>("digits".to_string())
        });
        assert!(!handle.is_ready());

        tx.send(()).unwrap();
        task.await.unwrap().unwrap();
        assert_eq!(handle.get().as_deref().map(String::as_str), Some("digits"));
    }

    #[tokio::test]
    async fn test_failed_load_leaves_slot_empty() {
        let handle: ModelHandle<String> = ModelHandle::empty();
        let result = handle
            .spawn_load(async { Err::<String, _>("missing weights".to_string()) })
            .await
            .unwrap();
        assert_eq!(result, Err("missing weights".to_string()));
        assert!(!handle.is_ready());
    }
}
