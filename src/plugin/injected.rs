use std::collections::HashSet;

use camino::Utf8PathBuf;

use crate::error::ResolverTransportError;
use crate::plugin::{
    PluginId, PluginImplementation, PluginRequest, PluginResolution, PluginResolveOutcome,
    PluginResolver, PluginResolverContributor,
};

/// Resolves plugins supplied to this build run out-of-band, e.g. by a test
/// harness that puts freshly built plugin jars on an injected classpath.
///
/// With nothing injected the source is inactive for the whole build: it
/// contributes nothing to the chain and reports itself not applicable, so it
/// never shows up in not-found diagnostics.
#[derive(Debug, Clone, Default)]
pub struct InjectedClasspathPluginResolver {
    classpath: Vec<Utf8PathBuf>,
    plugin_ids: HashSet<PluginId>,
}

impl InjectedClasspathPluginResolver {
    pub fn new(
        classpath: Vec<Utf8PathBuf>,
        plugin_ids: impl IntoIterator<Item = PluginId>,
    ) -> Self {
        Self {
            classpath,
            plugin_ids: plugin_ids.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.classpath.is_empty()
    }
}

impl PluginResolver for InjectedClasspathPluginResolver {
    fn description(&self) -> String {
        "Injected classpath".to_string()
    }

    fn try_resolve(
        &self,
        request: &PluginRequest,
    ) -> Result<PluginResolveOutcome, ResolverTransportError> {
        if self.is_empty() {
            return Ok(PluginResolveOutcome::NotApplicable);
        }

        // Injected plugins exist only as classpath entries; there is no
        // version to select between.
        if request.version.is_some() {
            return Ok(PluginResolveOutcome::not_found(
                "injected classpath plugins cannot be requested with a version",
            ));
        }

        if !self.plugin_ids.contains(&request.id) {
            return Ok(PluginResolveOutcome::not_found(
                "plugin was not found on the injected classpath",
            ));
        }

        Ok(PluginResolveOutcome::Found(PluginResolution::new(
            request.id.clone(),
            self.description(),
            PluginImplementation::Classpath {
                entries: self.classpath.clone(),
            },
        )))
    }
}

impl PluginResolverContributor for InjectedClasspathPluginResolver {
    fn collect_resolvers_into(&self, resolvers: &mut Vec<Box<dyn PluginResolver>>) {
        if !self.is_empty() {
            resolvers.push(Box::new(self.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> InjectedClasspathPluginResolver {
        InjectedClasspathPluginResolver::new(
            vec!["build/libs/fixture.jar".into()],
            [PluginId::new("org.example.fixture").unwrap()],
        )
    }

    #[test]
    fn test_resolves_injected_plugin_to_classpath() {
        let request = PluginRequest::new(PluginId::new("org.example.fixture").unwrap());

        let outcome = resolver().try_resolve(&request).unwrap();

        let PluginResolveOutcome::Found(resolution) = outcome else {
            panic!("expected injected plugin to resolve");
        };
        assert_eq!(
            resolution.implementation(),
            &PluginImplementation::Classpath {
                entries: vec!["build/libs/fixture.jar".into()]
            }
        );
    }

    #[test]
    fn test_rejects_versioned_request() {
        let request =
            PluginRequest::new(PluginId::new("org.example.fixture").unwrap()).with_version("1.0");

        let outcome = resolver().try_resolve(&request).unwrap();

        assert!(matches!(outcome, PluginResolveOutcome::NotFound { .. }));
    }

    #[test]
    fn test_empty_classpath_is_not_applicable() {
        let request = PluginRequest::new(PluginId::new("org.example.fixture").unwrap());

        let outcome = InjectedClasspathPluginResolver::empty()
            .try_resolve(&request)
            .unwrap();

        assert!(matches!(outcome, PluginResolveOutcome::NotApplicable));
    }

    #[test]
    fn test_empty_classpath_contributes_nothing() {
        let mut resolvers = Vec::new();
        InjectedClasspathPluginResolver::empty().collect_resolvers_into(&mut resolvers);
        assert!(resolvers.is_empty());

        resolver().collect_resolvers_into(&mut resolvers);
        assert_eq!(resolvers.len(), 1);
    }
}
