use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use url::Url;

use super::contract::Route;

pub trait ChangeObserver: Send + Sync {
    fn on_change(&self, uri: &Url);
}

impl<F> ChangeObserver for F
where
    F: Fn(&Url) + Send + Sync,
{
    fn on_change(&self, uri: &Url) {
        self(uri)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    route: Route,
    observer: Arc<dyn ChangeObserver>,
}

impl Subscription {
    /// A collection subscription also hears about every item in it.
    fn wants(&self, changed: Route) -> bool {
        match (self.route, changed) {
            (Route::Products, _) => true,
            (Route::ProductId(watched), Route::ProductId(id)) => watched == id,
            (Route::ProductId(_), Route::Products) => true,
        }
    }
}

#[derive(Default)]
pub struct ObserverRegistry {
    next_id: AtomicU64,
    subscriptions: Mutex<Vec<Subscription>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, route: Route, observer: Arc<dyn ChangeObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push(Subscription {
            id,
            route,
            observer,
        });
        id
    }

    pub fn unregister(&self, id: SubscriptionId) -> bool {
        let mut subscriptions = self.lock();
        let before = subscriptions.len();
        subscriptions.retain(|subscription| subscription.id != id);
        subscriptions.len() != before
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify_change(&self, changed: Route, uri: &Url) {
        // Observers are called outside the lock so they may re-register.
        let observers = self
            .lock()
            .iter()
            .filter(|subscription| subscription.wants(changed))
            .map(|subscription| Arc::clone(&subscription.observer))
            .collect::<Vec<_>>();

        tracing::debug!(%uri, observers = observers.len(), "notifying change");
        for observer in observers {
            observer.on_change(uri);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscription>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::util::contract::{content_uri, item_uri};

    fn counter() -> (Arc<AtomicUsize>, Arc<dyn ChangeObserver>) {
        let count = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&count);
        let observer: Arc<dyn ChangeObserver> = Arc::new(move |_: &Url| {
            observed.fetch_add(1, Ordering::SeqCst);
        });
        (count, observer)
    }

    #[test]
    fn collection_observers_hear_item_changes() {
        let registry = ObserverRegistry::new();
        let (all, observer) = counter();
        registry.register(Route::Products, observer);
        let (one, observer) = counter();
        registry.register(Route::ProductId(1), observer);

        registry.notify_change(Route::ProductId(1), &item_uri(1));
        registry.notify_change(Route::ProductId(2), &item_uri(2));
        registry.notify_change(Route::Products, &content_uri());

        assert_eq!(all.load(Ordering::SeqCst), 3);
        assert_eq!(one.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unregistered_observers_are_silent() {
        let registry = ObserverRegistry::new();
        let (count, observer) = counter();
        let id = registry.register(Route::Products, observer);

        assert!(registry.unregister(id));
        assert!(!registry.unregister(id));
        assert!(registry.is_empty());

        registry.notify_change(Route::Products, &content_uri());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
