//! Push-based subscription primitive for URL-derived state.
//!
//! [`Signal`] holds the latest value of one reactive source and notifies
//! subscribers when it changes. [`ValueStream`] is a read-only derived view
//! pairing an output signal with the upstream subscriptions that feed it;
//! dropping the stream cancels every listener it wired up, recursively.
//!
//! Everything here is single-threaded: values flow from the route and
//! pagination sources on the UI thread, so plain `Rc`/`RefCell` sharing
//! replaces locks.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct SignalInner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(u64, Callback<T>)>>,
    next_id: Cell<u64>,
}

/// The latest value of one reactive source, plus its subscriber registry.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Signal { inner: Rc::clone(&self.inner) }
    }
}

impl<T: Clone + 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Signal {
            inner: Rc::new(SignalInner {
                value: RefCell::new(value),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Snapshot of the current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Store a new value and notify every subscriber.
    ///
    /// Subscribers are walked over a snapshot of the registry, so a callback
    /// may subscribe or unsubscribe during the walk; one unsubscribed
    /// mid-walk can still observe the in-flight emission. Re-entrant `set`
    /// on the same signal from inside one of its notifications is not
    /// supported.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        let snapshot: Vec<Callback<T>> = self.inner.subscribers.borrow().iter().map(|(_, cb)| Rc::clone(cb)).collect();
        let current = self.get();
        for callback in snapshot {
            (callback.borrow_mut())(&current);
        }
    }

    /// Register a change listener.
    ///
    /// The callback is invoked once with the current value before this
    /// returns, so a late subscriber always observes the latest state, then
    /// again on every change until the returned [`Subscription`] is dropped.
    pub fn subscribe(&self, on_change: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let callback: Callback<T> = Rc::new(RefCell::new(on_change));
        self.inner.subscribers.borrow_mut().push((id, Rc::clone(&callback)));

        let current = self.get();
        (callback.borrow_mut())(&current);

        let weak = Rc::downgrade(&self.inner);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.subscribers.borrow_mut().retain(|(sub_id, _)| *sub_id != id);
                }
            })),
        }
    }

    /// Number of live subscriptions, for diagnostics and leak checks.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }
}

/// Handle for one registered listener; unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the listener now instead of at drop time.
    pub fn unsubscribe(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

/// A live, read-only view of a value that updates as its sources change.
///
/// Owns the subscriptions (and intermediate streams) that keep it fed;
/// dropping it cascades the cancellation to every upstream listener.
pub struct ValueStream<T> {
    signal: Signal<T>,
    upstream: Vec<Box<dyn Any>>,
}

impl<T: Clone + 'static> ValueStream<T> {
    /// View a source signal directly, with no upstream of its own.
    pub fn source(signal: Signal<T>) -> Self {
        ValueStream { signal, upstream: Vec::new() }
    }

    /// View a derived signal, keeping `upstream` alive for as long as the
    /// stream exists.
    pub fn derived(signal: Signal<T>, upstream: Vec<Box<dyn Any>>) -> Self {
        ValueStream { signal, upstream }
    }

    /// Snapshot of the latest value.
    pub fn get(&self) -> T {
        self.signal.get()
    }

    /// Register a change listener; emits the current value immediately.
    pub fn subscribe(&self, on_change: impl FnMut(&T) + 'static) -> Subscription {
        self.signal.subscribe(on_change)
    }

    /// Derive a new stream by transforming every value of this one.
    pub fn map<U: Clone + 'static>(self, transform: impl Fn(&T) -> U + 'static) -> ValueStream<U> {
        let out = Signal::new(transform(&self.get()));
        let subscription = {
            let out = out.clone();
            self.signal.subscribe(move |value| out.set(transform(value)))
        };
        ValueStream::derived(out, vec![Box::new(subscription), Box::new(self)])
    }
}
