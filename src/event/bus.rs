use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

/// Handle returned by [`Subject::subscribe`], used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Slot<T> {
    callback: Mutex<Box<dyn FnMut(&T) + Send>>,
    // Thread currently inside `callback`
    running_on: Mutex<Option<ThreadId>>,
}

type Listener<T> = Arc<Slot<T>>;

struct Inner<T> {
    value: Mutex<T>,
    // Bumped on every change while the value lock is held
    version: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Listener<T>)>>,
    next_id: AtomicU64,
}

/// A shared current value with synchronous change notification.
///
/// Cloning a `Subject` yields another handle to the same value. Subscribers are
/// called immediately with the latest value when they subscribe, and again after
/// every change.
///
/// Listeners run without any lock of the subject held, so they may read, write,
/// subscribe or unsubscribe. A write from inside a listener starts a nested
/// notification that skips listeners still running on the same thread, and the
/// outer pass stops there so nobody is handed the older value afterwards.
pub struct Subject<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("value", &*self.inner.value.lock())
            .field("listeners", &format!("<{} listeners>", self.inner.listeners.lock().len()))
            .finish()
    }
}

impl<T: Default + Clone> Default for Subject<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> Subject<T> {
    /// Creates a subject holding `value`
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(value),
                version: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current value
    pub fn get(&self) -> T {
        self.inner.value.lock().clone()
    }

    /// Borrow the current value without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.lock())
    }

    /// Replace the value and notify every subscriber
    pub fn set(&self, value: T) {
        let (snapshot, version) = {
            let mut current = self.inner.value.lock();
            *current = value;
            (current.clone(), self.inner.version.fetch_add(1, Ordering::AcqRel) + 1)
        };
        self.notify(&snapshot, version);
    }

    /// Mutate the value in place. Subscribers are notified only when `f` returns `true`.
    pub fn update(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let (snapshot, version) = {
            let mut current = self.inner.value.lock();
            if !f(&mut current) {
                return false;
            }
            (current.clone(), self.inner.version.fetch_add(1, Ordering::AcqRel) + 1)
        };
        self.notify(&snapshot, version);
        true
    }

    /// Register a listener. It is invoked right away with the latest value.
    pub fn subscribe(&self, mut listener: impl FnMut(&T) + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let latest = self.get();
        listener(&latest);
        let slot = Slot {
            callback: Mutex::new(Box::new(listener) as Box<dyn FnMut(&T) + Send>),
            running_on: Mutex::new(None),
        };
        self.inner.listeners.lock().push((id, Arc::new(slot)));
        id
    }

    /// Remove a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    fn notify(&self, value: &T, version: u64) {
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        let current = thread::current().id();
        for slot in listeners {
            if self.inner.version.load(Ordering::Acquire) != version {
                break;
            }
            // still running further up this thread's stack; it wrote this value
            if *slot.running_on.lock() == Some(current) {
                continue;
            }
            let mut callback = slot.callback.lock();
            *slot.running_on.lock() = Some(current);
            (*callback)(value);
            *slot.running_on.lock() = None;
        }
    }
}
