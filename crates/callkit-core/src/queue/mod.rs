//! Deferred queue: zero-argument entries drained synchronously in FIFO order.

mod config;
mod entry;
mod state;

pub use config::{QueueBuilder, QueueConfig};
pub use entry::EntryId;
pub use state::QueuePhase;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, debug_span, trace, warn};

use self::entry::{Entry, Thunk};
use crate::error::CallError;
use crate::holder::CallableBox;
use crate::observability::QueueStats;
use crate::signature::ArgList;

/// Shared queue state.
///
/// Design:
/// - Single source of truth for pending entries and counters.
/// - Never borrowed while an entry runs, so entries may submit more work.
struct DeferredQueueState<E> {
    /// Pending entries, head runs next.
    entries: VecDeque<Entry<E>>,

    phase: QueuePhase,

    config: QueueConfig,

    /// Next entry ID to assign.
    next_entry_id: u64,

    stats: QueueStats,
}

impl<E> DeferredQueueState<E> {
    fn new(config: QueueConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.initial_capacity),
            phase: QueuePhase::Idle,
            config,
            next_entry_id: 1,
            stats: QueueStats::default(),
        }
    }

    fn allocate_entry_id(&mut self) -> EntryId {
        let id = EntryId::new(self.next_entry_id);
        self.next_entry_id += 1;
        id
    }

    fn push(&mut self, has_callback: bool, thunk: Thunk<E>) -> EntryId {
        let id = self.allocate_entry_id();
        self.entries.push_back(Entry::new(id, has_callback, thunk));
        self.stats.submitted += 1;
        id
    }
}

/// Returns the queue to `Idle` when a run ends, including by panic.
struct PhaseGuard<'a, E> {
    state: &'a RefCell<DeferredQueueState<E>>,
}

impl<E> Drop for PhaseGuard<'_, E> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.phase = QueuePhase::Idle;
        }
    }
}

/// FIFO queue of deferred work.
///
/// Cloning the queue yields another handle to the same entries, which is how
/// a running entry submits follow-up work:
///
/// ```ignore
/// let queue = DeferredQueue::new();
/// let handle = queue.clone();
/// queue.submit(move || {
///     handle.submit(|| println!("runs in the same pass"));
/// });
/// queue.run()?;
/// assert!(queue.is_empty());
/// ```
///
/// `E` is the error type of fallible entries. Queues that only take
/// infallible work use the default `Infallible`.
pub struct DeferredQueue<E = Infallible> {
    state: Rc<RefCell<DeferredQueueState<E>>>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }
}

impl<E: 'static> DeferredQueue<E> {
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(DeferredQueueState::new(config))),
        }
    }

    /// Append a fire-and-forget entry.
    pub fn submit<T>(&self, thunk: T) -> EntryId
    where
        T: FnOnce() + 'static,
    {
        self.push(
            false,
            Box::new(move || {
                thunk();
                Ok(())
            }),
        )
    }

    /// Append an entry whose result is handed to `callback` right after it runs.
    pub fn submit_with<R, T, C>(&self, thunk: T, callback: C) -> EntryId
    where
        T: FnOnce() -> R + 'static,
        C: FnOnce(R) + 'static,
    {
        self.push(
            true,
            Box::new(move || {
                callback(thunk());
                Ok(())
            }),
        )
    }

    /// Like [`submit_with`](Self::submit_with), with a callback shared between entries.
    pub fn submit_shared<R, T>(&self, thunk: T, callback: Rc<dyn Fn(R)>) -> EntryId
    where
        R: 'static,
        T: FnOnce() -> R + 'static,
    {
        self.submit_with(thunk, move |result| callback(result))
    }

    /// Append a fallible entry. An `Err` stops the run and is returned from [`run`](Self::run).
    pub fn try_submit<T>(&self, thunk: T) -> EntryId
    where
        T: FnOnce() -> Result<(), E> + 'static,
    {
        self.push(false, Box::new(thunk))
    }

    /// Fallible entry with a result callback. The callback is skipped when the entry fails.
    pub fn try_submit_with<R, T, C>(&self, thunk: T, callback: C) -> EntryId
    where
        T: FnOnce() -> Result<R, E> + 'static,
        C: FnOnce(R) + 'static,
    {
        self.push(
            true,
            Box::new(move || {
                callback(thunk()?);
                Ok(())
            }),
        )
    }

    /// Queue a call of `holder` with `args`, discarding its result.
    ///
    /// A signature mismatch is reported when the entry runs.
    pub fn submit_call<Args>(&self, holder: CallableBox, args: Args) -> EntryId
    where
        Args: ArgList,
        E: From<CallError>,
    {
        let mut holder = holder;
        self.try_submit(move || holder.invoke(args).map_err(E::from))
    }

    /// Queue a typed call of `holder` and hand the `R` it returns to `callback`.
    pub fn submit_call_with<R, Args, C>(&self, holder: CallableBox, args: Args, callback: C) -> EntryId
    where
        R: 'static,
        Args: ArgList,
        C: FnOnce(R) + 'static,
        E: From<CallError>,
    {
        let mut holder = holder;
        self.try_submit_with(
            move || holder.invoke_typed::<R, Args>(args).map_err(E::from),
            callback,
        )
    }

    /// Drain the queue in submission order.
    ///
    /// Entries submitted while the run is in progress (from an entry or a
    /// callback, through a cloned handle) join the tail and run in this same
    /// call. Returns the number of entries that completed.
    ///
    /// An entry that always resubmits itself keeps this loop going forever;
    /// bounding that is the caller's job.
    ///
    /// When an entry fails its error is returned unchanged and the entries
    /// behind it stay queued for a later `run`. Panics propagate the same way.
    /// Calling `run` from inside a running entry does nothing and returns `Ok(0)`.
    pub fn run(&self) -> Result<usize, E> {
        let name = {
            let mut state = self.state.borrow_mut();
            if state.phase.is_running() {
                debug!(queue = %state.config.name, "nested run ignored; the outer run drains the queue");
                return Ok(0);
            }
            state.phase = QueuePhase::Running;
            state.stats.runs += 1;
            state.config.name.clone()
        };
        let _span = debug_span!("deferred_queue.run", queue = %name).entered();
        let _guard = PhaseGuard { state: &*self.state };

        let mut executed = 0;
        loop {
            let next = self.state.borrow_mut().entries.pop_front();
            let Some(entry) = next else {
                break;
            };

            let id = entry.id;
            trace!(entry = %id, has_callback = entry.has_callback, "executing entry");
            match entry.execute() {
                Ok(()) => {
                    executed += 1;
                    self.state.borrow_mut().stats.executed += 1;
                }
                Err(err) => {
                    let mut state = self.state.borrow_mut();
                    state.stats.failed += 1;
                    warn!(entry = %id, pending = state.entries.len(), "entry failed, run stopped");
                    return Err(err);
                }
            }
        }

        debug!(executed, "queue drained");
        Ok(executed)
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    pub fn phase(&self) -> QueuePhase {
        self.state.borrow().phase
    }

    pub fn name(&self) -> String {
        self.state.borrow().config.name.clone()
    }

    pub fn stats(&self) -> QueueStats {
        let state = self.state.borrow();
        QueueStats {
            pending: state.entries.len(),
            ..state.stats.clone()
        }
    }

    fn push(&self, has_callback: bool, thunk: Thunk<E>) -> EntryId {
        let mut state = self.state.borrow_mut();
        let id = state.push(has_callback, thunk);
        trace!(
            queue = %state.config.name,
            entry = %id,
            has_callback,
            pending = state.entries.len(),
            "entry submitted"
        );
        id
    }
}

impl<E> Clone for DeferredQueue<E> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<E: 'static> Default for DeferredQueue<E> {
    fn default() -> Self {
        Self::with_config(QueueConfig::default())
    }
}

impl<E> fmt::Debug for DeferredQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("DeferredQueue")
            .field("name", &state.config.name)
            .field("phase", &state.phase)
            .field("pending", &state.entries.len())
            .finish()
    }
}
