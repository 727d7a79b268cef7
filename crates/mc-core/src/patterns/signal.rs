//! Signal / slot event fan-out.
//!
//! A [`Signal`] owns an ordered list of callbacks ("slots"). Emitting the
//! signal invokes every connected slot synchronously, in registration order,
//! with a shared reference to the event payload.
//!
//! Slots return [`Result`]; the first failing slot stops delivery and its
//! error is handed back to the emitter. Slots connected after an emission
//! only see later events.

use crate::errors::Result;

/// Opaque identifier of a connected slot, used to disconnect it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u64);

/// An event source delivering payloads of type `A` to connected slots.
///
/// # Example
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use mc_core::Signal;
///
/// let seen = Rc::new(Cell::new(0usize));
/// let mut signal: Signal<usize> = Signal::new();
/// let sink = Rc::clone(&seen);
/// signal.connect(move |i: &usize| {
///     sink.set(sink.get() + *i);
///     Ok(())
/// });
/// signal.emit(&3).unwrap();
/// signal.emit(&4).unwrap();
/// assert_eq!(seen.get(), 7);
/// ```
pub struct Signal<A: ?Sized = ()> {
    slots: Vec<(SlotId, Box<dyn FnMut(&A) -> Result<()>>)>,
    next_id: u64,
}

impl<A: ?Sized> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> std::fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("slots", &self.slots.len())
            .finish()
    }
}

impl<A: ?Sized> Signal<A> {
    /// Create a signal with no connected slots.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }

    /// Connect a slot. It is invoked after every slot connected before it.
    pub fn connect<F>(&mut self, slot: F) -> SlotId
    where
        F: FnMut(&A) -> Result<()> + 'static,
    {
        let id = SlotId(self.next_id);
        self.next_id += 1;
        self.slots.push((id, Box::new(slot)));
        id
    }

    /// Remove a previously connected slot. Returns `false` if it was not
    /// connected.
    pub fn disconnect(&mut self, id: SlotId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|(slot_id, _)| *slot_id != id);
        self.slots.len() != before
    }

    /// Remove every slot.
    pub fn disconnect_all(&mut self) {
        self.slots.clear();
    }

    /// Number of connected slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is connected.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Deliver `args` to every slot in registration order.
    ///
    /// Stops at the first slot returning an error.
    pub fn emit(&mut self, args: &A) -> Result<()> {
        for (_, slot) in self.slots.iter_mut() {
            slot(args)?;
        }
        Ok(())
    }
}
