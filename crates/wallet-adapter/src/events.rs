//! Connect/disconnect observers with scoped registration.
//!
//! [`Observers::subscribe`] hands back a [`Subscription`]; the handler stays
//! registered exactly as long as that guard is alive.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use sol_tx::Pubkey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletEvent {
    Connect(Pubkey),
    Disconnect,
}

impl WalletEvent {
    pub fn kind(&self) -> WalletEventKind {
        match self {
            WalletEvent::Connect(_) => WalletEventKind::Connect,
            WalletEvent::Disconnect => WalletEventKind::Disconnect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletEventKind {
    Connect,
    Disconnect,
}

type Handler = Arc<dyn Fn(&WalletEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, WalletEventKind, Handler)>,
}

/// The set of handlers attached to one wallet.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    registry: Arc<Mutex<Registry>>,
}

impl Observers {
    pub(crate) fn subscribe(
        &self,
        kind: WalletEventKind,
        handler: impl Fn(&WalletEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.push((id, kind, Arc::new(handler)));

        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Run every handler registered for the event's kind.
    ///
    /// Handlers are called after the registry lock is released, so a handler
    /// may subscribe or drop subscriptions itself.
    pub(crate) fn emit(&self, event: &WalletEvent) {
        let matching: Vec<Handler> = {
            let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry
                .handlers
                .iter()
                .filter(|(_, kind, _)| *kind == event.kind())
                .map(|(_, _, handler)| handler.clone())
                .collect()
        };

        for handler in matching {
            handler(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .handlers
            .len()
    }
}

/// Keeps one observer attached; dropping it detaches the observer.
#[must_use = "dropping a Subscription detaches its observer immediately"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
}

impl Subscription {
    /// Detach now. Same as dropping the guard.
    pub fn unsubscribe(self) {}
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .handlers
                .retain(|(id, _, _)| *id != self.id);
        }
    }
}
