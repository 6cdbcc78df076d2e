//! Subscription lifecycle manager.
//!
//! The orchestration layer registers one (activate, deactivate) pair per
//! notification kind it wants wired to the node, then activates and
//! deactivates them as a group. The handle each activation returns is
//! opaque here; only the node gives it meaning.

use std::sync::Arc;

use tracing::info;

type ActivateFn<L> = Box<dyn Fn(&L) -> u64 + Send + Sync>;
type DeactivateFn = Box<dyn Fn(u64) + Send + Sync>;

struct Subscription<L> {
    name: String,
    activate: ActivateFn<L>,
    deactivate: DeactivateFn,
    handle: Option<u64>,
}

/// Activates and deactivates a named set of subscriptions against one
/// shared listener, in insertion order.
pub struct SubscriptionManager<L> {
    name: String,
    listener: Arc<L>,
    subscriptions: Vec<Subscription<L>>,
}

impl<L> SubscriptionManager<L> {
    pub fn new(name: impl Into<String>, listener: Arc<L>) -> Self {
        Self {
            name: name.into(),
            listener,
            subscriptions: Vec::new(),
        }
    }

    /// Register a subscription. `activate` runs against the shared
    /// listener and returns the node's subscription handle; `deactivate`
    /// receives that handle back.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        activate: impl Fn(&L) -> u64 + Send + Sync + 'static,
        deactivate: impl Fn(u64) + Send + Sync + 'static,
    ) -> &mut Self {
        self.subscriptions.push(Subscription {
            name: name.into(),
            activate: Box::new(activate),
            deactivate: Box::new(deactivate),
            handle: None,
        });
        self
    }

    /// Run every activation in insertion order, capturing each handle.
    /// Re-activation after [`deactivate_all`](Self::deactivate_all) simply
    /// runs all activations again.
    pub fn activate_all(&mut self) {
        for subscription in &mut self.subscriptions {
            let handle = (subscription.activate)(&self.listener);
            subscription.handle = Some(handle);
            info!(
                "Started listening for {} {} events with ID#{}",
                self.name, subscription.name, handle
            );
        }
    }

    /// Run every deactivation in insertion order, for subscriptions that
    /// hold a captured handle. Without a prior activation this is a no-op.
    pub fn deactivate_all(&mut self) {
        for subscription in &mut self.subscriptions {
            if let Some(handle) = subscription.handle.take() {
                (subscription.deactivate)(handle);
                info!(
                    "Stopped listening for {} {} events with ID#{}",
                    self.name, subscription.name, handle
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
