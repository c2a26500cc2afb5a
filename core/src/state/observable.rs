//! Single-value publish/subscribe holder.
//!
//! Holds one current value; every update replaces the whole value atomically
//! and wakes subscribers, who always read the full latest value (never a diff).

use tokio::sync::watch;

pub struct ObservableState<T> {
    tx: watch::Sender<T>,
}

impl<T> ObservableState<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> Subscription<T> {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Unconditionally replace the value, returning the previous one.
    pub fn set(&self, value: T) -> T {
        self.tx.send_replace(value)
    }

    /// Atomic compare-and-set: `f` sees the current value and returns the
    /// replacement, or `None` to leave it untouched. Returns the previous value
    /// when a replacement was applied. Subscribers are only woken when the
    /// value actually changed.
    pub fn update_if<F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let mut previous = None;
        self.tx.send_if_modified(|current| match f(current) {
            Some(next) => {
                let changed = next != *current;
                previous = Some(std::mem::replace(current, next));
                changed
            }
            None => false,
        });
        previous
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Cancelable view of an [`ObservableState`]. Dropping it (or calling
/// [`Subscription::cancel`]) unsubscribes.
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T> Subscription<T>
where
    T: Clone,
{
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next change. `None` once the holder is gone.
    pub async fn changed(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the value satisfies `pred` (checked against the current
    /// value first). `None` once the holder is gone.
    pub async fn wait_for<F>(&mut self, pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.rx.wait_for(pred).await.ok().map(|v| v.clone())
    }

    pub fn cancel(self) {}
}
