//! Merged-view and recording consumers.

use crate::model::contribution::{Contribution, ImplementorEntry, LibraryKey};
use crate::registry::implementors::ImplementorsConsumer;
use log::trace;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Page-wide registry assembled from every delivered contribution.
///
/// A later contribution for a library already present replaces that
/// library's entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedImplementors {
    libraries: BTreeMap<LibraryKey, Vec<ImplementorEntry>>,
    contributions_seen: usize,
}

impl MergedImplementors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, library: &str) -> Option<&[ImplementorEntry]> {
        self.libraries.get(library).map(Vec::as_slice)
    }

    pub fn libraries(&self) -> impl Iterator<Item = &LibraryKey> {
        self.libraries.keys()
    }

    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.libraries.values().map(Vec::len).sum()
    }

    /// Number of contributions delivered so far, empty ones included.
    pub fn contributions_seen(&self) -> usize {
        self.contributions_seen
    }

    pub fn into_inner(self) -> BTreeMap<LibraryKey, Vec<ImplementorEntry>> {
        self.libraries
    }
}

impl ImplementorsConsumer for MergedImplementors {
    fn accept(&mut self, contribution: Contribution) {
        self.contributions_seen += 1;
        self.libraries.extend(contribution);
    }
}

/// Keeps every delivered contribution in delivery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingConsumer {
    deliveries: Vec<Contribution>,
}

impl RecordingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deliveries(&self) -> &[Contribution] {
        &self.deliveries
    }

    pub fn into_deliveries(self) -> Vec<Contribution> {
        self.deliveries
    }
}

impl ImplementorsConsumer for RecordingConsumer {
    fn accept(&mut self, contribution: Contribution) {
        self.deliveries.push(contribution);
    }
}

/// Shared single-threaded handle to a consumer.
///
/// Install a clone into the registry and keep another to read from. Reads are
/// closure-scoped; a contribution that arrives while a read is in progress is
/// held back and applied, in arrival order, once the read ends.
#[derive(Debug, Default)]
pub struct SharedConsumer<C> {
    inner: Rc<RefCell<C>>,
    deferred: Rc<RefCell<Vec<Contribution>>>,
}

impl<C> SharedConsumer<C> {
    pub fn new(consumer: C) -> Self {
        Self {
            inner: Rc::new(RefCell::new(consumer)),
            deferred: Rc::default(),
        }
    }

    /// Contributions waiting for an in-progress read to finish.
    pub fn deferred_len(&self) -> usize {
        self.deferred.borrow().len()
    }
}

impl<C: ImplementorsConsumer> SharedConsumer<C> {
    /// Runs `f` against the consumer's current state.
    pub fn read<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        let result = f(&self.inner.borrow());
        self.apply_deferred();
        result
    }

    fn apply_deferred(&self) {
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            return;
        };
        let backlog = std::mem::take(&mut *self.deferred.borrow_mut());
        for contribution in backlog {
            inner.accept(contribution);
        }
    }
}

impl<C> Clone for SharedConsumer<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            deferred: Rc::clone(&self.deferred),
        }
    }
}

impl<C: ImplementorsConsumer> ImplementorsConsumer for SharedConsumer<C> {
    fn accept(&mut self, contribution: Contribution) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => {
                let backlog = std::mem::take(&mut *self.deferred.borrow_mut());
                for held in backlog {
                    inner.accept(held);
                }
                inner.accept(contribution);
            }
            Err(_) => {
                self.deferred.borrow_mut().push(contribution);
                trace!(
                    "event=delivery_deferred module=consumer deferred={}",
                    self.deferred.borrow().len()
                );
            }
        }
    }
}
