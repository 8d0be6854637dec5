use std::collections::HashMap;

use camino::Utf8PathBuf;

use crate::error::ResolverTransportError;
use crate::plugin::{
    PluginId, PluginImplementation, PluginRequest, PluginResolution, PluginResolveOutcome,
    PluginResolver, PluginResolverContributor,
};

/// Resolves plugins exported by another build unit included in this build.
///
/// A hosting distribution typically registers one of these per included
/// build, through the [`PluginResolverContributor`] seam, so that locally
/// built plugins mask any same-id plugin a repository would supply.
#[derive(Debug, Clone)]
pub struct IncludedBuildPluginResolver {
    build_name: String,
    plugins: HashMap<PluginId, Vec<Utf8PathBuf>>,
}

impl IncludedBuildPluginResolver {
    pub fn new(
        build_name: impl Into<String>,
        plugins: impl IntoIterator<Item = (PluginId, Vec<Utf8PathBuf>)>,
    ) -> Self {
        Self {
            build_name: build_name.into(),
            plugins: plugins.into_iter().collect(),
        }
    }

    pub fn build_name(&self) -> &str {
        &self.build_name
    }
}

impl PluginResolver for IncludedBuildPluginResolver {
    fn description(&self) -> String {
        format!("Included build '{}'", self.build_name)
    }

    fn try_resolve(
        &self,
        request: &PluginRequest,
    ) -> Result<PluginResolveOutcome, ResolverTransportError> {
        let Some(entries) = self.plugins.get(&request.id) else {
            return Ok(PluginResolveOutcome::not_found(format!(
                "plugin is not provided by included build '{}'",
                self.build_name
            )));
        };

        Ok(PluginResolveOutcome::Found(PluginResolution::new(
            request.id.clone(),
            self.description(),
            PluginImplementation::Classpath {
                entries: entries.clone(),
            },
        )))
    }
}

impl PluginResolverContributor for IncludedBuildPluginResolver {
    fn collect_resolvers_into(&self, resolvers: &mut Vec<Box<dyn PluginResolver>>) {
        if !self.plugins.is_empty() {
            resolvers.push(Box::new(self.clone()));
        }
    }
}
