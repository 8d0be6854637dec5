use crate::error::ResolverTransportError;
use crate::plugin::{PluginRequest, PluginResolveOutcome, PluginResolver};

/// A source that never resolves anything. It sits at the head of the default
/// chain purely so tests can observe chain traversal in isolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPluginResolver;

impl PluginResolver for NoopPluginResolver {
    fn description(&self) -> String {
        "No-op resolver".to_string()
    }

    fn try_resolve(
        &self,
        _: &PluginRequest,
    ) -> Result<PluginResolveOutcome, ResolverTransportError> {
        Ok(PluginResolveOutcome::not_found("resolves no plugins"))
    }
}
