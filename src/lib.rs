#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod error;
mod exclude;
mod plugin;
mod predicate;
#[cfg(feature = "logging")]
mod utils;

pub use crate::error::*;
pub use crate::exclude::{ExcludedTaskFilteringPreparer, ExecutionPlan, Task, TaskSelector};
pub use crate::plugin::{
    CompositePluginResolver, CorePluginMetadata, CorePluginRegistry, CorePluginResolver,
    IncludedBuildPluginResolver, InjectedClasspathPluginResolver, ModuleArtifactSource,
    ModuleCoordinates, NoopPluginResolver, PluginId, PluginImplementation, PluginRepository,
    PluginRequest, PluginResolution, PluginResolveOutcome, PluginResolver,
    PluginResolverContributor, PluginResolverFactory, RepositoryPluginResolver, TargetScope,
};
pub use crate::predicate::{Predicate, intersect};
#[cfg(feature = "logging")]
pub use crate::utils::init_logging;
