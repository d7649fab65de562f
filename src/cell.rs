//! Observable property cells.

use crate::error::Error;
use core::fmt;

type Observer<T> = Box<dyn FnMut(&T) -> Result<(), Error>>;

/// A single typed value that notifies one registered observer when it
/// changes.
///
/// Writes of a value equal to the current one are suppressed entirely: the
/// value is not replaced and the observer is not called. Notification is an
/// explicit message to exactly one callback—registering a new observer
/// replaces the previous one.
///
/// Every mutable view attribute is backed by one of these.
pub struct Cell<T> {
    value: T,
    observer: Option<Observer<T>>,
}

impl<T: PartialEq> Cell<T> {
    pub fn new(value: T) -> Cell<T> {
        Cell {
            value,
            observer: None,
        }
    }

    /// Returns the current value. No side effects.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and, only if it differs from the current value,
    /// delivers it to the registered observer.
    ///
    /// Observer errors propagate to the caller; the stored value is updated
    /// either way.
    pub fn set(&mut self, value: T) -> Result<(), Error> {
        if self.value == value {
            return Ok(());
        }
        self.value = value;
        if let Some(observer) = &mut self.observer {
            observer(&self.value)?;
        }
        Ok(())
    }

    /// Registers the observer, replacing any previous registration.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&T) -> Result<(), Error> + 'static,
    {
        self.observer = Some(Box::new(observer));
    }
}

impl<T: fmt::Debug> fmt::Debug for Cell<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Cell")
            .field("value", &self.value)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn no_op_writes_are_suppressed() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut cell = Cell::new(0);
        let sink = Rc::clone(&log);
        cell.subscribe(move |v| {
            sink.borrow_mut().push(*v);
            Ok(())
        });

        cell.set(0).unwrap();
        cell.set(1).unwrap();
        cell.set(1).unwrap();
        cell.set(1).unwrap();
        cell.set(2).unwrap();
        cell.set(1).unwrap();

        // at most one notification per distinct value transition
        assert_eq!(*log.borrow(), vec![1, 2, 1]);
        assert_eq!(*cell.get(), 1);
    }

    #[test]
    fn get_has_no_side_effects() {
        let count = Rc::new(RefCell::new(0));
        let mut cell = Cell::new("a".to_string());
        let sink = Rc::clone(&count);
        cell.subscribe(move |_| {
            *sink.borrow_mut() += 1;
            Ok(())
        });

        let _ = cell.get();
        let _ = cell.get();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn resubscribing_replaces_the_observer() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut cell = Cell::new(0);

        let sink = Rc::clone(&log);
        cell.subscribe(move |v| {
            sink.borrow_mut().push(("first", *v));
            Ok(())
        });
        cell.set(1).unwrap();

        let sink = Rc::clone(&log);
        cell.subscribe(move |v| {
            sink.borrow_mut().push(("second", *v));
            Ok(())
        });
        cell.set(2).unwrap();

        assert_eq!(*log.borrow(), vec![("first", 1), ("second", 2)]);
    }

    #[test]
    fn observer_errors_propagate() {
        let mut cell = Cell::new(0);
        cell.subscribe(|_| Err(Error::native("nope")));
        assert!(cell.set(0).is_ok(), "suppressed write must not notify");
        assert!(cell.set(1).is_err());
        // the value is stored even when the observer fails
        assert_eq!(*cell.get(), 1);
    }
}
