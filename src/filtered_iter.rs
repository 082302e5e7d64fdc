use crate::Triple;
use std::sync::Arc;

/// A predicate deciding whether a triple may be read, abstracted away from
/// [`crate::PermissionChecker`] so [`FilteredIterator`] doesn't need to know
/// about evaluators, principals, or graph IRIs — it only needs "can this one
/// triple be read".
pub trait ReadFilter {
    fn can_read(&self, triple: &Triple) -> bool;
}

impl<F: Fn(&Triple) -> bool> ReadFilter for F {
    fn can_read(&self, triple: &Triple) -> bool {
        self(triple)
    }
}

/// Lazily filters a base iterator of triples down to the ones the current
/// principal may read (spec.md §4.3, component C3).
///
/// The base iterator is type-erased (`Box<dyn Iterator<...>>`), matching the
/// teacher's own use of boxed trait-object iterators to paper over differing
/// concrete iterator types across graph implementations.
///
/// No triple with `can_read(triple) == false` is ever yielded (spec.md P5);
/// the filter predicate is invoked at most once per base element, not once
/// per consumer poll, so filtering is `O(1)` amortized per yielded element.
pub struct FilteredIterator<'a> {
    base: Option<Box<dyn Iterator<Item = Triple> + 'a>>,
    filter: Arc<dyn ReadFilter + 'a>,
}

impl<'a> FilteredIterator<'a> {
    /// Wrap `base` so that only triples passing `filter` are yielded.
    pub fn new(
        base: Box<dyn Iterator<Item = Triple> + 'a>,
        filter: Arc<dyn ReadFilter + 'a>,
    ) -> Self {
        Self {
            base: Some(base),
            filter,
        }
    }

    /// Pass `base` through unfiltered. Used when the caller has already
    /// established that every triple in `base` is readable (e.g. graph-level
    /// Read plus `can_read(Triple::any())` both hold, per spec.md §4.3's
    /// required optimization), so a per-element check would be pure
    /// overhead.
    pub fn pass_through(base: Box<dyn Iterator<Item = Triple> + 'a>) -> Self {
        Self {
            base: Some(base),
            filter: Arc::new(|_: &Triple| true),
        }
    }

    /// Release the underlying iterator early. Idempotent: closing twice, or
    /// closing after exhaustion, is a no-op.
    pub fn close(&mut self) {
        self.base = None;
    }

    pub fn is_closed(&self) -> bool {
        self.base.is_none()
    }
}

impl<'a> Iterator for FilteredIterator<'a> {
    type Item = Triple;

    fn next(&mut self) -> Option<Triple> {
        loop {
            let triple = self.base.as_mut()?.next();
            match triple {
                Some(triple) if self.filter.can_read(&triple) => return Some(triple),
                Some(_) => continue,
                None => {
                    self.close();
                    return None;
                }
            }
        }
    }
}

impl<'a> Drop for FilteredIterator<'a> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    fn triples(n: usize) -> Vec<Triple> {
        (0..n)
            .map(|i| {
                Triple::new(
                    Node::iri(format!("urn:s{i}")),
                    Node::iri("urn:p"),
                    Node::iri("urn:o"),
                )
            })
            .collect()
    }

    #[test]
    fn filters_out_unreadable() {
        let base = triples(5);
        let allowed_subject = base[2].subject.clone();
        let filter: Arc<dyn ReadFilter> =
            Arc::new(move |t: &Triple| t.subject == allowed_subject);

        let mut iter = FilteredIterator::new(Box::new(base.into_iter()), filter);
        let collected: Vec<Triple> = iter.by_ref().collect();
        assert_eq!(1, collected.len());
        assert!(iter.is_closed());
    }

    #[test]
    fn pass_through_yields_everything() {
        let base = triples(3);
        let iter = FilteredIterator::pass_through(Box::new(base.clone().into_iter()));
        let collected: Vec<Triple> = iter.collect();
        assert_eq!(base, collected);
    }

    #[test]
    fn explicit_close_stops_iteration() {
        let base = triples(3);
        let filter: Arc<dyn ReadFilter> = Arc::new(|_: &Triple| true);
        let mut iter = FilteredIterator::new(Box::new(base.into_iter()), filter);
        assert!(iter.next().is_some());
        iter.close();
        assert!(iter.is_closed());
        assert_eq!(None, iter.next());
    }
}
