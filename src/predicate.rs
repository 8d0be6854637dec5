//! Cheaply clonable predicates and their intersection.

use std::fmt::Debug;
use std::sync::Arc;

/// A type-erased predicate over `T`. Cloning is cheap (shared `Arc`), which
/// lets one predicate be installed in several places without re-deriving it.
pub struct Predicate<T: ?Sized>(Arc<dyn Fn(&T) -> bool + Send + Sync>);

impl<T: ?Sized> Predicate<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A predicate satisfied by every value.
    pub fn satisfy_all() -> Self {
        Self::new(|_| true)
    }

    /// A predicate satisfied by no value.
    pub fn satisfy_none() -> Self {
        Self::new(|_| false)
    }

    pub fn satisfied_by(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ?Sized> Debug for Predicate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Predicate(*)")
    }
}

/// Folds a sequence of predicates with logical AND. The empty sequence yields
/// [`Predicate::satisfy_all`]. AND is commutative and associative, so callers
/// may feed this from an unordered container.
pub fn intersect<T, I>(predicates: I) -> Predicate<T>
where
    T: ?Sized + 'static,
    I: IntoIterator<Item = Predicate<T>>,
{
    let mut predicates: Vec<_> = predicates.into_iter().collect();

    match predicates.len() {
        0 => Predicate::satisfy_all(),
        1 => predicates.remove(0),
        _ => Predicate::new(move |item| predicates.iter().all(|p| p.satisfied_by(item))),
    }
}
