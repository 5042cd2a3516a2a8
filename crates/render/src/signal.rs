//! Frame-ready notification source.
//!
//! The host owns a `FrameSignal` and calls `notify` once per display refresh.
//! The overlay subscribes a render closure and keeps the returned
//! `Subscription` alive for as long as it wants frames; dropping it detaches.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

type Handler = Box<dyn FnMut()>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: BTreeMap<u64, Handler>,
    /// Ids dropped while their handler was checked out for dispatch.
    detached: Vec<u64>,
    dispatch_depth: u32,
}

/// Single-threaded "please render now" notification source.
#[derive(Clone, Default)]
pub struct FrameSignal {
    registry: Rc<RefCell<Registry>>,
}

impl FrameSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` to run on every notification until the
    /// subscription is dropped.
    pub fn subscribe(&self, handler: impl FnMut() + 'static) -> Subscription {
        let mut reg = self.registry.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.handlers.insert(id, Box::new(handler));
        tracing::debug!(id, "frame subscriber attached");
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Run every live handler once, in subscription order. Returns how many ran.
    ///
    /// A handler that detaches itself or another subscriber finishes its
    /// current call; detached handlers are not run again. Notifying from
    /// inside a handler runs nothing.
    pub fn notify(&self) -> usize {
        let mut handlers = {
            let mut reg = self.registry.borrow_mut();
            reg.dispatch_depth += 1;
            std::mem::take(&mut reg.handlers)
        };

        let mut ran = 0;
        for (id, handler) in handlers.iter_mut() {
            if self.registry.borrow().detached.contains(id) {
                continue;
            }
            handler();
            ran += 1;
        }

        let mut reg = self.registry.borrow_mut();
        reg.dispatch_depth -= 1;
        let detached = if reg.dispatch_depth == 0 {
            std::mem::take(&mut reg.detached)
        } else {
            reg.detached.clone()
        };
        for (id, handler) in handlers {
            if !detached.contains(&id) {
                reg.handlers.insert(id, handler);
            }
        }
        ran
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().handlers.len()
    }
}

/// Live registration on a `FrameSignal`. Dropping it unsubscribes.
#[must_use = "dropping a subscription detaches it immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Explicitly detach. Equivalent to dropping.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut reg = registry.borrow_mut();
        if reg.handlers.remove(&self.id).is_none() && reg.dispatch_depth > 0 {
            reg.detached.push(self.id);
        }
        tracing::debug!(id = self.id, "frame subscriber detached");
    }
}
