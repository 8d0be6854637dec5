//! Task exclusion before scheduling.
//!
//! At build-preparation time the set of excluded task names is turned into
//! one combined filter and installed on the execution plan, strictly before
//! the plan is handed to the scheduler. Only the named tasks are removed;
//! tasks that merely depend on an excluded task stay scheduled, because
//! dependency-closure pruning belongs to the scheduler.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::TaskSelectionError;
use crate::predicate::{self, Predicate};

/// The view of a task the exclusion filter needs. The real task type is
/// owned by the scheduler.
pub trait Task {
    fn name(&self) -> &str;

    /// Project-qualified path of the task, e.g. `:app:test`.
    fn path(&self) -> &str;
}

/// Maps a task-name string to a predicate over tasks. Name-matching rules
/// (path-relative names, abbreviations) live behind this seam; this crate
/// only consumes the result.
///
/// The returned predicate keeps tasks that are NOT denoted by the name, so
/// intersecting the predicates of several names keeps exactly the tasks
/// excluded by none of them.
pub trait TaskSelector: Send + Sync {
    fn filter_for(&self, task_name: &str) -> Result<Predicate<dyn Task>, TaskSelectionError>;
}

/// The one write this crate performs on the externally owned execution plan.
pub trait ExecutionPlan {
    /// Installs a filter; tasks the predicate rejects are excluded from
    /// scheduling.
    fn use_filter(&mut self, filter: Predicate<dyn Task>);
}

/// Consumes the build's excluded-task-name set and configures the execution
/// plan accordingly, once per build, during preparation.
pub struct ExcludedTaskFilteringPreparer {
    selector: Arc<dyn TaskSelector>,
}

impl ExcludedTaskFilteringPreparer {
    pub fn new(selector: Arc<dyn TaskSelector>) -> Self {
        Self { selector }
    }

    /// Installs at most one combined filter on `plan`.
    ///
    /// The empty set is an explicit fast path: the plan is left untouched.
    /// Otherwise every name is resolved through the selector first, so a
    /// single unresolvable name fails the whole preparation before the plan
    /// is mutated at all. The set is unordered; the predicates are combined
    /// with [`predicate::intersect`], which is insensitive to input order.
    pub fn prepare_for_scheduling(
        &self,
        excluded_names: &HashSet<String>,
        plan: &mut dyn ExecutionPlan,
    ) -> Result<(), TaskSelectionError> {
        if excluded_names.is_empty() {
            return Ok(());
        }

        let mut filters = Vec::with_capacity(excluded_names.len());

        for name in excluded_names {
            filters.push(self.selector.filter_for(name)?);
        }

        tracing::debug!(
            "excluding {} task name(s) from scheduling",
            excluded_names.len()
        );
        plan.use_filter(predicate::intersect(filters));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestTask {
        name: &'static str,
        path: String,
        /// Names of tasks this one depends on. The filter must never look
        /// at these.
        depends_on: Vec<&'static str>,
    }

    impl TestTask {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                path: format!(":{name}"),
                depends_on: Vec::new(),
            }
        }

        fn depending_on(name: &'static str, dependency: &'static str) -> Self {
            Self {
                depends_on: vec![dependency],
                ..Self::new(name)
            }
        }
    }

    impl Task for TestTask {
        fn name(&self) -> &str {
            self.name
        }

        fn path(&self) -> &str {
            &self.path
        }
    }

    /// Matches names against task names exactly, like a selector without
    /// abbreviation support.
    struct ExactNameSelector {
        known: Vec<&'static str>,
    }

    impl TaskSelector for ExactNameSelector {
        fn filter_for(&self, task_name: &str) -> Result<Predicate<dyn Task>, TaskSelectionError> {
            if !self.known.contains(&task_name) {
                return Err(TaskSelectionError::new(task_name));
            }

            let excluded = task_name.to_string();
            Ok(Predicate::new(move |task: &(dyn Task + 'static)| {
                task.name() != excluded
            }))
        }
    }

    /// Plan stub recording the single write the preparer may perform.
    struct PlanStub {
        tasks: Vec<TestTask>,
        filter: Option<Predicate<dyn Task>>,
    }

    impl PlanStub {
        fn new(tasks: Vec<TestTask>) -> Self {
            Self {
                tasks,
                filter: None,
            }
        }

        fn scheduled(&self) -> Vec<&str> {
            self.tasks
                .iter()
                .filter(|task| match &self.filter {
                    Some(filter) => filter.satisfied_by(*task as &dyn Task),
                    None => true,
                })
                .map(|task| task.name)
                .collect()
        }
    }

    impl ExecutionPlan for PlanStub {
        fn use_filter(&mut self, filter: Predicate<dyn Task>) {
            self.filter = Some(filter);
        }
    }

    fn preparer() -> ExcludedTaskFilteringPreparer {
        ExcludedTaskFilteringPreparer::new(Arc::new(ExactNameSelector {
            known: vec!["compile", "test", "build", "check"],
        }))
    }

    fn names(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_empty_exclusion_set_installs_no_filter() {
        let mut plan = PlanStub::new(vec![TestTask::new("compile"), TestTask::new("test")]);

        preparer()
            .prepare_for_scheduling(&HashSet::new(), &mut plan)
            .unwrap();

        assert!(plan.filter.is_none());
        assert_eq!(plan.scheduled(), ["compile", "test"]);
    }

    #[test]
    fn test_named_tasks_are_excluded_and_others_kept() {
        let mut plan = PlanStub::new(vec![
            TestTask::new("compile"),
            TestTask::new("test"),
            TestTask::new("build"),
        ]);

        preparer()
            .prepare_for_scheduling(&names(&["test", "build"]), &mut plan)
            .unwrap();

        assert_eq!(plan.scheduled(), ["compile"]);
    }

    #[test]
    fn test_dependents_of_excluded_tasks_stay_scheduled() {
        let mut plan = PlanStub::new(vec![
            TestTask::new("test"),
            TestTask::depending_on("check", "test"),
        ]);

        preparer()
            .prepare_for_scheduling(&names(&["test"]), &mut plan)
            .unwrap();

        let scheduled = plan.scheduled();
        assert_eq!(scheduled, ["check"]);
        assert_eq!(plan.tasks[1].depends_on, ["test"]);
    }

    #[test]
    fn test_unresolvable_name_fails_before_any_mutation() {
        let mut plan = PlanStub::new(vec![TestTask::new("compile"), TestTask::new("test")]);

        let err = preparer()
            .prepare_for_scheduling(&names(&["test", "no-such-task"]), &mut plan)
            .unwrap_err();

        assert_eq!(err.name, "no-such-task");
        assert!(plan.filter.is_none());
        assert_eq!(plan.scheduled(), ["compile", "test"]);
    }

    #[test]
    fn test_single_exclusion_keeps_everything_else() {
        let mut plan = PlanStub::new(vec![
            TestTask::new("compile"),
            TestTask::new("test"),
            TestTask::new("check"),
        ]);

        preparer()
            .prepare_for_scheduling(&names(&["test"]), &mut plan)
            .unwrap();

        assert_eq!(plan.scheduled(), ["compile", "check"]);
    }
}
