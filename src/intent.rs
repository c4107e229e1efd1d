//! Programmatic scene control intents
//!
//! A bounded, interrupt-safe queue carrying scene commands from outside
//! contexts (a web handler, another task) into the engine loop.
//! Synchronization uses critical sections over a fixed-size
//! `heapless::Deque`, so senders never block and may run in interrupt
//! context. The engine drains the queue at each service step.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

/// A request to change the active scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SceneIntent {
    /// Start the given scene, stopping the active one first.
    Start(usize),
    /// Stop the active scene, zeroing both channels.
    Stop,
}

/// The queue was full; the rejected intent is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentOverflow(pub SceneIntent);

impl core::fmt::Display for IntentOverflow {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "intent queue full")
    }
}

/// Bounded, thread-safe queue of pending [`SceneIntent`]s.
///
/// `SIZE` bounds the number of undrained intents; overflow is reported
/// to the sender, never to the engine.
pub struct IntentQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<SceneIntent, SIZE>>>,
}

impl<const SIZE: usize> IntentQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle. Multiple senders may coexist.
    pub const fn sender(&self) -> IntentSender<'_, SIZE> {
        IntentSender { queue: self }
    }

    /// Get a receiver handle for the engine to drain.
    pub const fn receiver(&self) -> IntentReceiver<'_, SIZE> {
        IntentReceiver { queue: self }
    }

    fn push(&self, intent: SceneIntent) -> Result<(), IntentOverflow> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(intent).map_err(IntentOverflow)
        })
    }

    fn take(&self) -> Option<SceneIntent> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }
}

impl<const SIZE: usize> Default for IntentQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sender handle for an [`IntentQueue`]. Cheap to copy and pass around.
#[derive(Clone, Copy)]
pub struct IntentSender<'a, const SIZE: usize> {
    queue: &'a IntentQueue<SIZE>,
}

impl<const SIZE: usize> IntentSender<'_, SIZE> {
    /// Enqueue an intent without blocking.
    pub fn try_send(&self, intent: SceneIntent) -> Result<(), IntentOverflow> {
        self.queue.push(intent)
    }
}

/// Receiver handle for an [`IntentQueue`].
#[derive(Clone, Copy)]
pub struct IntentReceiver<'a, const SIZE: usize> {
    queue: &'a IntentQueue<SIZE>,
}

impl<const SIZE: usize> IntentReceiver<'_, SIZE> {
    /// Dequeue the oldest pending intent, if any.
    pub fn take(&self) -> Option<SceneIntent> {
        self.queue.take()
    }
}
