//! Ordered child collections with structured change events.

use crate::backend::Backend;
use crate::error::Error;
use crate::view::View;
use core::fmt;
use std::cell::RefCell;

/// One structural change to a [`Children`] collection.
///
/// Every mutation produces exactly one delta—never coalesced across
/// operations—in the order the mutations were issued. A replace is modeled
/// as a remove delta followed by an add delta.
pub struct ChildDelta<B: Backend> {
    /// The index at which the change applies.
    pub index: usize,
    /// Views removed by this change, in their previous order.
    pub removed: Vec<View<B>>,
    /// Views added by this change, in order, starting at `index`.
    pub added: Vec<View<B>>,
}

impl<B: Backend> fmt::Debug for ChildDelta<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ChildDelta")
            .field("index", &self.index)
            .field("removed", &self.removed.len())
            .field("added", &self.added.len())
            .finish()
    }
}

type Observer<B> = Box<dyn FnMut(&ChildDelta<B>) -> Result<(), Error>>;

/// An ordered, mutable collection of view nodes.
///
/// Insertion order is significant: it determines the order of the native
/// children (and with it z-order). Each mutation synchronously delivers one
/// [`ChildDelta`] to the single registered observer; the observer must not
/// mutate the collection reentrantly.
pub struct Children<B: Backend> {
    items: RefCell<Vec<View<B>>>,
    observer: RefCell<Option<Observer<B>>>,
}

impl<B: Backend> Children<B> {
    pub(crate) fn new() -> Children<B> {
        Children {
            items: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
        }
    }

    /// Appends a view at the end of the collection.
    pub fn push(&self, view: View<B>) -> Result<(), Error> {
        let index = self.items.borrow().len();
        self.splice(index, 0, vec![view])
    }

    /// Inserts a view at `index`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&self, index: usize, view: View<B>) -> Result<(), Error> {
        self.splice(index, 0, vec![view])
    }

    /// Removes and returns the view at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn remove_at(&self, index: usize) -> Result<View<B>, Error> {
        let removed = self.items.borrow()[index].clone();
        self.splice(index, 1, Vec::new())?;
        Ok(removed)
    }

    /// Replaces the view at `index`: one remove delta, then one add delta.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    pub fn replace(&self, index: usize, view: View<B>) -> Result<(), Error> {
        self.splice(index, 1, Vec::new())?;
        self.splice(index, 0, vec![view])
    }

    /// Removes all views, emitting a single remove delta.
    pub fn clear(&self) -> Result<(), Error> {
        let len = self.items.borrow().len();
        if len == 0 {
            return Ok(());
        }
        self.splice(0, len, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Returns a handle to the view at `index`.
    pub fn get(&self, index: usize) -> Option<View<B>> {
        self.items.borrow().get(index).cloned()
    }

    /// Snapshots the current child handles in order.
    pub fn to_vec(&self) -> Vec<View<B>> {
        self.items.borrow().clone()
    }

    /// Registers the observer, replacing any previous registration.
    pub(crate) fn subscribe<F>(&self, observer: F)
    where
        F: FnMut(&ChildDelta<B>) -> Result<(), Error> + 'static,
    {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    fn splice(&self, index: usize, remove: usize, add: Vec<View<B>>) -> Result<(), Error> {
        let removed: Vec<View<B>> = {
            let mut items = self.items.borrow_mut();
            items
                .splice(index..index + remove, add.iter().cloned())
                .collect()
        };
        // the items borrow is released before notifying, so the observer may
        // read the collection
        let delta = ChildDelta {
            index,
            removed,
            added: add,
        };
        if let Some(observer) = self.observer.borrow_mut().as_mut() {
            observer(&delta)?;
        }
        Ok(())
    }
}

impl<B: Backend> fmt::Debug for Children<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Children")
            .field("len", &self.len())
            .field("observed", &self.observer.borrow().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::Headless;
    use crate::host::Host;
    use std::rc::Rc;

    type Shape = (usize, usize, usize); // (index, removed, added)

    fn observed(children: &Children<Headless>) -> Rc<RefCell<Vec<Shape>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        children.subscribe(move |delta| {
            sink.borrow_mut()
                .push((delta.index, delta.removed.len(), delta.added.len()));
            Ok(())
        });
        log
    }

    #[test]
    fn each_mutation_emits_one_delta() {
        let host = Host::new(Headless::new());
        let children: Children<Headless> = Children::new();
        let log = observed(&children);

        children.push(View::new(&host)).unwrap();
        children.push(View::new(&host)).unwrap();
        children.insert(0, View::new(&host)).unwrap();
        children.remove_at(1).unwrap();
        children.clear().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![(0, 0, 1), (1, 0, 1), (0, 0, 1), (1, 1, 0), (0, 2, 0)]
        );
        assert!(children.is_empty());
    }

    #[test]
    fn replace_is_remove_then_add() {
        let host = Host::new(Headless::new());
        let children: Children<Headless> = Children::new();
        children.push(View::new(&host)).unwrap();
        let log = observed(&children);

        let replacement = View::new(&host);
        children.replace(0, replacement.clone()).unwrap();

        assert_eq!(*log.borrow(), vec![(0, 1, 0), (0, 0, 1)]);
        assert_eq!(children.get(0).unwrap().id(), replacement.id());
    }

    #[test]
    fn clear_on_empty_emits_nothing() {
        let children: Children<Headless> = Children::new();
        let log = observed(&children);
        children.clear().unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn collection_order_reflects_mutations() {
        let host = Host::new(Headless::new());
        let children: Children<Headless> = Children::new();
        let a = View::new(&host);
        let b = View::new(&host);
        let c = View::new(&host);

        children.push(a.clone()).unwrap();
        children.push(b.clone()).unwrap();
        children.remove_at(0).unwrap();
        children.insert(0, c.clone()).unwrap();

        let order: Vec<_> = children.to_vec().iter().map(|v| v.id()).collect();
        assert_eq!(order, vec![c.id(), b.id()]);
    }
}
