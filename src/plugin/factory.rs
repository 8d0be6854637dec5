use std::sync::Arc;

use crate::plugin::{
    CompositePluginResolver, CorePluginRegistry, CorePluginResolver,
    InjectedClasspathPluginResolver, ModuleArtifactSource, NoopPluginResolver, PluginRepository,
    PluginResolver, PluginResolverContributor, RepositoryPluginResolver,
};

/// Assembles the default resolver chain for one build session.
///
/// Plugins are searched from the first source to the last until one claims
/// the request, so order matters:
///
/// 1. [`NoopPluginResolver`] — only used in tests.
/// 2. [`CorePluginResolver`] — plugins bundled with the distribution.
/// 3. [`InjectedClasspathPluginResolver`] — plugins supplied to this run
///    out-of-band, e.g. by a test harness.
/// 4. Resolvers contributed by the hosting distribution, in registration
///    order — typically one per included build.
/// 5. [`RepositoryPluginResolver`] — configured plugin repositories, or the
///    default public portal when none were configured.
///
/// The order is a designed invariant, optimized both for correctness
/// (explicit and local sources must mask implicit and remote ones) and for
/// performance (requests succeed or fail cheaply before any network cost is
/// paid).
pub struct PluginResolverFactory {
    core_registry: Arc<CorePluginRegistry>,
    injected: InjectedClasspathPluginResolver,
    contributors: Vec<Box<dyn PluginResolverContributor>>,
    repositories: Vec<PluginRepository>,
    artifacts: Arc<dyn ModuleArtifactSource>,
}

impl PluginResolverFactory {
    pub fn new(
        core_registry: Arc<CorePluginRegistry>,
        artifacts: Arc<dyn ModuleArtifactSource>,
    ) -> Self {
        Self {
            core_registry,
            injected: InjectedClasspathPluginResolver::empty(),
            contributors: Vec::new(),
            repositories: Vec::new(),
            artifacts,
        }
    }

    pub fn with_injected_classpath(mut self, injected: InjectedClasspathPluginResolver) -> Self {
        self.injected = injected;
        self
    }

    /// Registers a contributor. Contributors are consulted in registration
    /// order and each appends its resolvers contiguously.
    pub fn add_contributor(mut self, contributor: Box<dyn PluginResolverContributor>) -> Self {
        self.contributors.push(contributor);
        self
    }

    pub fn with_repositories(mut self, repositories: Vec<PluginRepository>) -> Self {
        self.repositories = repositories;
        self
    }

    /// Builds a fresh chain. Resolvers are stateless, so the result may be
    /// used for a single request or kept for a whole build session.
    pub fn create(&self) -> CompositePluginResolver {
        let mut resolvers: Vec<Box<dyn PluginResolver>> = Vec::new();

        resolvers.push(Box::new(NoopPluginResolver));
        resolvers.push(Box::new(CorePluginResolver::new(self.core_registry.clone())));

        self.injected.collect_resolvers_into(&mut resolvers);

        for contributor in &self.contributors {
            contributor.collect_resolvers_into(&mut resolvers);
        }

        resolvers.push(Box::new(RepositoryPluginResolver::new(
            self.repositories.clone(),
            self.artifacts.clone(),
        )));

        CompositePluginResolver::new(resolvers)
    }
}
