use std::fmt::Debug;

use crate::error::{PluginNotFoundError, ResolveError, SourceAttempt};
use crate::plugin::{PluginRequest, PluginResolution, PluginResolveOutcome, PluginResolver};

/// Walks an ordered chain of plugin sources, first match wins.
///
/// The order is fixed at construction and is itself part of the contract:
/// a source earlier in the chain masks any plugin a later source could also
/// have supplied, and no further source is consulted once one claims the
/// request. Sources are tried strictly sequentially; a blocking source
/// stalls the chain, which is acceptable because resolution happens once per
/// build, off the scheduling path.
pub struct CompositePluginResolver {
    resolvers: Vec<Box<dyn PluginResolver>>,
}

impl CompositePluginResolver {
    /// Creates a chain from `resolvers`, insertion order = precedence order.
    pub fn new(resolvers: Vec<Box<dyn PluginResolver>>) -> Self {
        Self { resolvers }
    }

    /// Descriptions of the chain members, in precedence order.
    pub fn sources(&self) -> Vec<String> {
        self.resolvers.iter().map(|r| r.description()).collect()
    }

    /// Resolves `request` against the chain.
    ///
    /// On exhaustion the returned [`PluginNotFoundError`] aggregates every
    /// source that rejected the request together with its reason, in chain
    /// order. Sources reporting themselves not applicable are skipped
    /// silently and left out of the report. A transport failure from any
    /// source aborts the chain immediately; it is not folded into "not
    /// found" and never retried here.
    pub fn resolve(&self, request: &PluginRequest) -> Result<PluginResolution, ResolveError> {
        let mut attempts = Vec::new();

        for resolver in &self.resolvers {
            match resolver.try_resolve(request)? {
                PluginResolveOutcome::Found(resolution) => {
                    tracing::debug!(
                        "plugin {} resolved by '{}'",
                        request,
                        resolution.source()
                    );
                    return Ok(resolution);
                }
                PluginResolveOutcome::NotFound { reason } => {
                    tracing::debug!(
                        "plugin {} not found by '{}': {}",
                        request,
                        resolver.description(),
                        reason
                    );
                    attempts.push(SourceAttempt {
                        source: resolver.description(),
                        reason,
                    });
                }
                PluginResolveOutcome::NotApplicable => {
                    tracing::debug!(
                        "plugin source '{}' not applicable to this build",
                        resolver.description()
                    );
                }
            }
        }

        Err(PluginNotFoundError {
            request: request.clone(),
            attempts,
        }
        .into())
    }
}

impl Debug for CompositePluginResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.resolvers.iter().map(|r| r.description()))
            .finish()
    }
}
