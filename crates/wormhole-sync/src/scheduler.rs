use tokio::task::AbortHandle;

/// Identifies one scheduled task of a [`TaskSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Holds at most one live background task.
///
/// Scheduling a new task through [`TaskSlot::next`] aborts the previous one
/// and invalidates its ticket. Aborting is best effort: a task that is
/// already past its last await point still runs to completion, so every
/// task must check [`TaskSlot::is_current`] (or [`TaskSlot::finish`]) under
/// the same lock before it touches shared state.
#[derive(Debug, Default)]
pub struct TaskSlot {
    generation: u64,
    handle: Option<AbortHandle>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersedes the current task and returns the ticket for its successor.
    pub fn next(&mut self) -> Ticket {
        self.cancel();
        Ticket(self.generation)
    }

    /// Registers the task spawned for `ticket` so it can be aborted later.
    ///
    /// A handle for an already superseded ticket is aborted immediately.
    pub fn attach(&mut self, ticket: Ticket, handle: AbortHandle) {
        if self.is_current(ticket) {
            self.handle = Some(handle);
        } else {
            handle.abort();
        }
    }

    /// Aborts the current task, if any, and invalidates every issued ticket.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation == ticket.0
    }

    /// Marks the task for `ticket` as done.
    ///
    /// Returns `false` if the ticket was superseded, in which case the caller
    /// must discard its outcome.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.handle = None;
        true
    }

    /// Returns `true` while a task is attached and not yet finished.
    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
