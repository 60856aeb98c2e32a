//! Breadth-first supertype walk.

use std::collections::{HashSet, VecDeque};
use std::iter::FusedIterator;

use classref_core::error::ClassRefResult;
use classref_core::names::FqName;
use tracing::debug;

use super::ClassReference;
use crate::module::ModuleDescriptor;

/// Lazy breadth-first walk over every ancestor of a class.
///
/// The class a walk starts from is marked as seen up front, so it is never
/// yielded again even when the hierarchy loops back to it. A failure to
/// resolve a supertype is yielded once and ends the walk.
pub struct SuperTypes<'m> {
    module: &'m ModuleDescriptor,
    queue: VecDeque<ClassReference>,
    seen: HashSet<FqName>,
    /// Last class handed out; its supertypes are enqueued on the next call.
    expand_next: Option<ClassReference>,
    done: bool,
}

impl<'m> SuperTypes<'m> {
    pub(super) fn new(module: &'m ModuleDescriptor, start: ClassReference, include_self: bool) -> Self {
        let mut seen = HashSet::new();
        seen.insert(start.fq_name().clone());
        let mut queue = VecDeque::new();
        let mut expand_next = None;
        if include_self {
            queue.push_back(start);
        } else {
            expand_next = Some(start);
        }
        SuperTypes {
            module,
            queue,
            seen,
            expand_next,
            done: false,
        }
    }
}

impl Iterator for SuperTypes<'_> {
    type Item = ClassRefResult<ClassReference>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some(current) = self.expand_next.take() {
            match current.direct_super_class_references(self.module) {
                Ok(supers) => {
                    for super_class in supers {
                        if self.seen.insert(super_class.fq_name().clone()) {
                            self.queue.push_back(super_class);
                        }
                    }
                }
                Err(err) => {
                    debug!(class = %current, error = %err, "supertype walk stopped");
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
        match self.queue.pop_front() {
            Some(next) => {
                self.expand_next = Some(next.clone());
                Some(Ok(next))
            }
            None => {
                self.done = true;
                None
            }
        }
    }
}

impl FusedIterator for SuperTypes<'_> {}
