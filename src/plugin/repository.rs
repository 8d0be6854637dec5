use std::fmt::Debug;
use std::sync::Arc;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::ResolverTransportError;
use crate::plugin::{
    ModuleCoordinates, PluginImplementation, PluginRequest, PluginResolution,
    PluginResolveOutcome, PluginResolver,
};

/// One artifact repository plugins can be fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRepository {
    pub name: String,
    pub url: String,
}

impl PluginRepository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The public portal searched when a build configures no repositories of
    /// its own.
    pub fn default_portal() -> Self {
        Self::new("Central plugin portal", "https://plugins.kumiki.dev/m2")
    }
}

/// Narrow seam over the dependency-resolution engine: turn module
/// coordinates into a concrete classpath against one repository.
///
/// `Ok(None)` means the repository answered and does not carry the module.
/// `Err` means the repository could not be checked; the caller reports this
/// as a hard failure, never as "not found". Retries, if any, belong behind
/// this seam.
pub trait ModuleArtifactSource: Send + Sync {
    fn resolve(
        &self,
        repository: &PluginRepository,
        coordinates: &ModuleCoordinates,
    ) -> anyhow::Result<Option<Vec<Utf8PathBuf>>>;
}

/// Resolves plugins against configured plugin repositories, or the default
/// public portal when none were configured. Network-bound, so the factory
/// places it last in the chain.
pub struct RepositoryPluginResolver {
    repositories: Vec<PluginRepository>,
    artifacts: Arc<dyn ModuleArtifactSource>,
}

impl RepositoryPluginResolver {
    pub fn new(
        repositories: Vec<PluginRepository>,
        artifacts: Arc<dyn ModuleArtifactSource>,
    ) -> Self {
        let repositories = if repositories.is_empty() {
            vec![PluginRepository::default_portal()]
        } else {
            repositories
        };

        Self {
            repositories,
            artifacts,
        }
    }

    pub fn repositories(&self) -> &[PluginRepository] {
        &self.repositories
    }

    fn searched(&self) -> String {
        let names: Vec<_> = self.repositories.iter().map(|r| r.name.as_str()).collect();
        names.join(", ")
    }
}

impl PluginResolver for RepositoryPluginResolver {
    fn description(&self) -> String {
        "Plugin repositories".to_string()
    }

    fn try_resolve(
        &self,
        request: &PluginRequest,
    ) -> Result<PluginResolveOutcome, ResolverTransportError> {
        // Repositories hold many versions; an unversioned request is
        // unanswerable here rather than an error for the whole chain.
        let Some(version) = &request.version else {
            return Ok(PluginResolveOutcome::not_found(
                "plugin dependency must include a version number for this source",
            ));
        };

        let marker = ModuleCoordinates::plugin_marker(&request.id, version);

        for repository in &self.repositories {
            let entries = self
                .artifacts
                .resolve(repository, &marker)
                .map_err(|cause| ResolverTransportError::new(self.description(), cause))?;

            if let Some(entries) = entries {
                return Ok(PluginResolveOutcome::Found(PluginResolution::new(
                    request.id.clone(),
                    self.description(),
                    PluginImplementation::External {
                        coordinates: marker,
                        repository: repository.name.clone(),
                        entries,
                    },
                )));
            }
        }

        Ok(PluginResolveOutcome::not_found(format!(
            "could not resolve plugin artifact '{marker}'; searched {}",
            self.searched()
        )))
    }
}

impl Debug for RepositoryPluginResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryPluginResolver")
            .field("repositories", &self.repositories)
            .finish_non_exhaustive()
    }
}
