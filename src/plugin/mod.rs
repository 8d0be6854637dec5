//! Plugin source resolution.
//!
//! A build declares the plugins it needs as [`PluginRequest`]s. Deciding
//! *where* each requested implementation comes from is the job of an ordered
//! chain of [`PluginResolver`]s, assembled by [`PluginResolverFactory`] and
//! walked by [`CompositePluginResolver`]. The first source to claim a request
//! wins; earlier sources deliberately mask later ones. A successful lookup
//! yields a [`PluginResolution`], a deferred action
//! that makes the implementation available to a [`TargetScope`] once the
//! caller decides to apply it.

mod composite;
mod core;
mod factory;
mod included;
mod injected;
mod noop;
mod repository;

use std::fmt::{self, Display};

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::{InvalidPluginId, ResolverTransportError};

pub use self::core::{CorePluginMetadata, CorePluginRegistry, CorePluginResolver};
pub use composite::CompositePluginResolver;
pub use factory::PluginResolverFactory;
pub use included::IncludedBuildPluginResolver;
pub use injected::InjectedClasspathPluginResolver;
pub use noop::NoopPluginResolver;
pub use repository::{ModuleArtifactSource, PluginRepository, RepositoryPluginResolver};

/// A validated, dot-separated plugin id, e.g. `kumiki.java` or
/// `org.example.publishing`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PluginId(Box<str>);

impl PluginId {
    pub const SEPARATOR: char = '.';

    pub fn new(value: &str) -> Result<Self, InvalidPluginId> {
        let invalid = |reason| InvalidPluginId {
            id: value.to_string(),
            reason,
        };

        if value.is_empty() {
            return Err(invalid("id cannot be empty"));
        }

        if value.chars().any(char::is_whitespace) {
            return Err(invalid("id cannot contain whitespace"));
        }

        if value.split(Self::SEPARATOR).any(str::is_empty) {
            return Err(invalid(
                "id cannot start or end with, or contain consecutive '.' characters",
            ));
        }

        Ok(Self(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id carries a namespace, i.e. contains at least one
    /// separator.
    pub fn is_qualified(&self) -> bool {
        self.0.contains(Self::SEPARATOR)
    }

    /// Everything before the last separator, `None` for unqualified ids.
    pub fn namespace(&self) -> Option<&str> {
        self.0.rfind(Self::SEPARATOR).map(|at| &self.0[..at])
    }

    /// The last segment of the id.
    pub fn name(&self) -> &str {
        match self.0.rfind(Self::SEPARATOR) {
            Some(at) => &self.0[at + 1..],
            None => &self.0,
        }
    }

    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace() == Some(namespace)
    }
}

impl Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PluginId {
    type Error = InvalidPluginId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PluginId> for String {
    fn from(id: PluginId) -> Self {
        id.0.into()
    }
}

/// A caller's declaration that a named, optionally versioned plugin must be
/// made available to the build. Immutable, created once per declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRequest {
    pub id: PluginId,
    pub version: Option<String>,
    /// Whether the plugin should also be applied to the target, or merely
    /// put on its classpath.
    #[serde(default = "default_apply")]
    pub apply: bool,
}

fn default_apply() -> bool {
    true
}

impl PluginRequest {
    pub fn new(id: PluginId) -> Self {
        Self {
            id,
            version: None,
            apply: true,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_apply(mut self, apply: bool) -> Self {
        self.apply = apply;
        self
    }
}

impl Display for PluginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "[id: '{}', version: '{}']", self.id, version),
            None => write!(f, "[id: '{}']", self.id),
        }
    }
}

/// Artifact coordinates understood by the dependency-resolution engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleCoordinates {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ModuleCoordinates {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The marker artifact a repository publishes for a plugin id. Its sole
    /// purpose is to point at the implementation module, so its coordinates
    /// are fully derived from the id.
    pub fn plugin_marker(id: &PluginId, version: &str) -> Self {
        Self::new(id.as_str(), format!("{id}.plugin"), version)
    }
}

impl Display for ModuleCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}

/// The narrow mutable surface a [`PluginResolution`] writes into when it is
/// applied. Owned by the caller; the loading mechanism behind it is not this
/// crate's concern.
#[derive(Debug, Default)]
pub struct TargetScope {
    core_plugins: Vec<PluginId>,
    classpath: Vec<Utf8PathBuf>,
}

impl TargetScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Core plugin ids made available so far, in application order.
    pub fn core_plugins(&self) -> &[PluginId] {
        &self.core_plugins
    }

    /// Classpath entries made available so far, in application order.
    pub fn classpath(&self) -> &[Utf8PathBuf] {
        &self.classpath
    }
}

/// Where a resolved plugin's implementation lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginImplementation {
    /// Bundled with the tool distribution under the given module.
    Core { module: String },
    /// Already present on a classpath supplied to this build.
    Classpath { entries: Vec<Utf8PathBuf> },
    /// Resolved from an artifact repository.
    External {
        coordinates: ModuleCoordinates,
        repository: String,
        entries: Vec<Utf8PathBuf>,
    },
}

/// Immutable result of a successful lookup: which implementation to load and
/// a deferred action that makes it available to a target scope. Produced by
/// exactly one resolver per successful request.
#[derive(Debug, Clone)]
pub struct PluginResolution {
    plugin_id: PluginId,
    source: String,
    implementation: PluginImplementation,
}

impl PluginResolution {
    pub fn new(
        plugin_id: PluginId,
        source: impl Into<String>,
        implementation: PluginImplementation,
    ) -> Self {
        Self {
            plugin_id,
            source: source.into(),
            implementation,
        }
    }

    pub fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }

    /// Description of the source which claimed the request.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn implementation(&self) -> &PluginImplementation {
        &self.implementation
    }

    /// Makes the implementation available to `scope`.
    pub fn resolve_into(&self, scope: &mut TargetScope) {
        match &self.implementation {
            PluginImplementation::Core { .. } => {
                scope.core_plugins.push(self.plugin_id.clone());
            }
            PluginImplementation::Classpath { entries }
            | PluginImplementation::External { entries, .. } => {
                scope.classpath.extend(entries.iter().cloned());
            }
        }
    }
}

/// The answer one plugin source gives for one request.
#[derive(Debug, Clone)]
pub enum PluginResolveOutcome {
    /// The source claims the request; no later source is consulted.
    Found(PluginResolution),
    /// The source cannot satisfy the request; the reason ends up in the
    /// aggregated report shown when the whole chain is exhausted.
    NotFound { reason: String },
    /// The source does not participate in this build at all. Skipped
    /// silently, without a trace in the aggregated report.
    NotApplicable,
}

impl PluginResolveOutcome {
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }
}

/// A single plugin source. Implementations must be cheap to consult or
/// placed late in the chain; the chain itself never retries and imposes no
/// timeouts.
pub trait PluginResolver: Send + Sync {
    /// Human-readable description of this source, used in diagnostics.
    fn description(&self) -> String;

    /// Attempts to satisfy `request` from this source. A transport error
    /// means the source could not be checked at all; it aborts the chain
    /// rather than being folded into "not found".
    fn try_resolve(
        &self,
        request: &PluginRequest,
    ) -> Result<PluginResolveOutcome, ResolverTransportError>;
}

/// Extension point for hosting distributions: appends zero or more resolvers
/// to the chain under assembly, in whatever order the contributor deems
/// appropriate, without removing or reordering entries already present.
pub trait PluginResolverContributor: Send + Sync {
    fn collect_resolvers_into(&self, resolvers: &mut Vec<Box<dyn PluginResolver>>);
}
