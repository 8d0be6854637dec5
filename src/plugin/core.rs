use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ResolverTransportError;
use crate::plugin::{
    PluginImplementation, PluginRequest, PluginResolution, PluginResolveOutcome, PluginResolver,
};

/// Implementation details of one plugin bundled with the distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorePluginMetadata {
    /// Unqualified plugin name, e.g. `java`.
    pub name: String,
    /// Module within the distribution which carries the implementation.
    pub module: String,
}

/// The set of plugins shipped with the tool, keyed by unqualified name and
/// sharing one namespace. Purely local; lookups are cheap by design so the
/// core source can sit early in the chain.
#[derive(Debug, Clone)]
pub struct CorePluginRegistry {
    namespace: String,
    plugins: HashMap<String, CorePluginMetadata>,
}

impl CorePluginRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            plugins: HashMap::new(),
        }
    }

    /// Parses a distribution manifest of the form
    /// `{"namespace": "...", "plugins": [{"name": "...", "module": "..."}]}`.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct Manifest {
            namespace: String,
            plugins: Vec<CorePluginMetadata>,
        }

        let manifest: Manifest = serde_json::from_str(text)?;
        let mut registry = Self::new(manifest.namespace);

        for plugin in manifest.plugins {
            registry.plugins.insert(plugin.name.clone(), plugin);
        }

        Ok(registry)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn register(&mut self, name: impl Into<String>, module: impl Into<String>) {
        let name = name.into();
        self.plugins.insert(
            name.clone(),
            CorePluginMetadata {
                name,
                module: module.into(),
            },
        );
    }

    pub fn find(&self, name: &str) -> Option<&CorePluginMetadata> {
        self.plugins.get(name)
    }
}

/// Resolves plugins bundled with the distribution, by id, against a static
/// registry.
pub struct CorePluginResolver {
    registry: Arc<CorePluginRegistry>,
}

impl CorePluginResolver {
    pub fn new(registry: Arc<CorePluginRegistry>) -> Self {
        Self { registry }
    }
}

impl PluginResolver for CorePluginResolver {
    fn description(&self) -> String {
        "Core plugins".to_string()
    }

    fn try_resolve(
        &self,
        request: &PluginRequest,
    ) -> Result<PluginResolveOutcome, ResolverTransportError> {
        let namespace = self.registry.namespace();

        // A qualified id pointing outside the core namespace can never be a
        // core plugin, whatever its name.
        if request.id.is_qualified() && !request.id.in_namespace(namespace) {
            return Ok(PluginResolveOutcome::not_found(format!(
                "plugin is not in the '{namespace}' namespace"
            )));
        }

        let Some(metadata) = self.registry.find(request.id.name()) else {
            return Ok(PluginResolveOutcome::not_found(
                "plugin is not in the core plugin set",
            ));
        };

        // Core plugins are versioned with the distribution itself.
        if request.version.is_some() {
            return Ok(PluginResolveOutcome::not_found(format!(
                "core plugin '{}' cannot be requested with a version",
                request.id
            )));
        }

        Ok(PluginResolveOutcome::Found(PluginResolution::new(
            request.id.clone(),
            self.description(),
            PluginImplementation::Core {
                module: metadata.module.clone(),
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginId;

    fn registry() -> Arc<CorePluginRegistry> {
        let mut registry = CorePluginRegistry::new("kumiki");
        registry.register("java", "kumiki-language-java");
        registry.register("publishing", "kumiki-publishing");
        Arc::new(registry)
    }

    fn resolve(request: PluginRequest) -> PluginResolveOutcome {
        CorePluginResolver::new(registry())
            .try_resolve(&request)
            .unwrap()
    }

    #[test]
    fn test_resolves_unqualified_core_id() {
        let outcome = resolve(PluginRequest::new(PluginId::new("java").unwrap()));

        let PluginResolveOutcome::Found(resolution) = outcome else {
            panic!("expected core plugin to resolve");
        };
        assert_eq!(
            resolution.implementation(),
            &PluginImplementation::Core {
                module: "kumiki-language-java".into()
            }
        );
    }

    #[test]
    fn test_resolves_qualified_core_id() {
        let outcome = resolve(PluginRequest::new(PluginId::new("kumiki.java").unwrap()));

        assert!(matches!(outcome, PluginResolveOutcome::Found(_)));
    }

    #[test]
    fn test_rejects_foreign_namespace_with_reason() {
        let outcome = resolve(PluginRequest::new(
            PluginId::new("org.example.java").unwrap(),
        ));

        let PluginResolveOutcome::NotFound { reason } = outcome else {
            panic!("expected not-found");
        };
        assert_eq!(reason, "plugin is not in the 'kumiki' namespace");
    }

    #[test]
    fn test_rejects_unknown_name() {
        let outcome = resolve(PluginRequest::new(PluginId::new("groovy").unwrap()));

        let PluginResolveOutcome::NotFound { reason } = outcome else {
            panic!("expected not-found");
        };
        assert_eq!(reason, "plugin is not in the core plugin set");
    }

    #[test]
    fn test_rejects_versioned_request_for_core_plugin() {
        let outcome = resolve(
            PluginRequest::new(PluginId::new("java").unwrap()).with_version("1.0"),
        );

        let PluginResolveOutcome::NotFound { reason } = outcome else {
            panic!("expected not-found");
        };
        assert!(reason.contains("cannot be requested with a version"));
    }

    #[test]
    fn test_registry_from_json_manifest() {
        let registry = CorePluginRegistry::from_json(
            r#"{
                "namespace": "kumiki",
                "plugins": [
                    { "name": "java", "module": "kumiki-language-java" },
                    { "name": "cpp", "module": "kumiki-language-cpp" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(registry.namespace(), "kumiki");
        assert_eq!(registry.find("cpp").unwrap().module, "kumiki-language-cpp");
        assert!(registry.find("groovy").is_none());
    }

    #[test]
    fn test_registry_rejects_malformed_manifest() {
        assert!(CorePluginRegistry::from_json("{\"plugins\": []}").is_err());
    }
}
