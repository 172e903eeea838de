//! Ordered fallback chains: try strategies in turn until one succeeds.

use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait Strategy<T: Sync>: Send + Sync {
    fn name(&self) -> String;
    async fn attempt(&self, target: &T) -> anyhow::Result<()>;
}

/// Runs `strategies` in order against `target` and returns the name of the
/// first one that succeeded, or `None` when every strategy failed.
///
/// Later strategies are never started once one succeeds.
pub async fn first_success<T: Sync>(
    strategies: &[Box<dyn Strategy<T>>],
    target: &T,
) -> Option<String> {
    for strategy in strategies {
        let name = strategy.name();
        match strategy.attempt(target).await {
            Ok(()) => {
                debug!(strategy = %name, "fallback strategy succeeded");
                return Some(name);
            }
            Err(err) => debug!(strategy = %name, "fallback strategy failed: {err:#}"),
        }
    }
    None
}
