//! Fixed-capacity task table
//!
//! Each slot keeps its own countdown. On every [`Scheduler::tick`] the time
//! elapsed since the slot was last observed is charged against the
//! remaining budget; when the budget runs out the task is due and the
//! budget reloads to the full period. Overshoot is discarded, so a late
//! tick delays every later invocation by the same amount.

use heapless::Vec;

/// Handle to a registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(u8);

impl TaskId {
    /// Table index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors from scheduler misuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerError {
    /// Period must be at least 1 ms
    InvalidPeriod,
    /// No free slot
    TableFull,
    /// TaskId does not name a registered task
    UnknownTask,
}

/// Keys of the tasks due in one tick, in table order
pub type DueTasks<K, const N: usize> = Vec<K, N>;

#[derive(Debug, Clone, Copy)]
struct Slot<K> {
    key: K,
    period_ms: u32,
    remaining_ms: u32,
    last_seen_ms: u32,
    armed: bool,
}

/// Periodic task scheduler
///
/// `K` is the caller's task key, typically a small enum the caller
/// dispatches on. Timestamps are wrapping `u32` milliseconds.
#[derive(Debug)]
pub struct Scheduler<K: Copy, const N: usize> {
    slots: Vec<Slot<K>, N>,
}

impl<K: Copy, const N: usize> Default for Scheduler<K, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy, const N: usize> Scheduler<K, N> {
    /// Create an empty scheduler
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no task is registered
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Register a task
    ///
    /// The task starts waiting; it runs only after [`Scheduler::arm`].
    pub fn register(&mut self, key: K, period_ms: u32) -> Result<TaskId, SchedulerError> {
        validate_period(period_ms)?;

        let index = self.slots.len();
        let id = u8::try_from(index).map_err(|_| SchedulerError::TableFull)?;
        self.slots
            .push(Slot {
                key,
                period_ms,
                remaining_ms: period_ms,
                last_seen_ms: 0,
                armed: false,
            })
            .map_err(|_| SchedulerError::TableFull)?;

        Ok(TaskId(id))
    }

    /// Activate a task
    ///
    /// The first invocation is due one full period after `now_ms`.
    pub fn arm(&mut self, id: TaskId, now_ms: u32) -> Result<(), SchedulerError> {
        let slot = self.slot_mut(id)?;
        slot.remaining_ms = slot.period_ms;
        slot.last_seen_ms = now_ms;
        slot.armed = true;
        Ok(())
    }

    /// Stop future invocations of a task
    pub fn disarm(&mut self, id: TaskId) -> Result<(), SchedulerError> {
        self.slot_mut(id)?.armed = false;
        Ok(())
    }

    /// Change a task's period
    ///
    /// The running countdown is left alone; the new period applies from
    /// the next reload.
    pub fn set_period(&mut self, id: TaskId, period_ms: u32) -> Result<(), SchedulerError> {
        validate_period(period_ms)?;
        self.slot_mut(id)?.period_ms = period_ms;
        Ok(())
    }

    /// Current period of a task
    pub fn period(&self, id: TaskId) -> Result<u32, SchedulerError> {
        self.slot(id).map(|slot| slot.period_ms)
    }

    /// Check if a task is armed
    pub fn is_armed(&self, id: TaskId) -> Result<bool, SchedulerError> {
        self.slot(id).map(|slot| slot.armed)
    }

    /// Key a task was registered with
    pub fn key(&self, id: TaskId) -> Result<K, SchedulerError> {
        self.slot(id).map(|slot| slot.key)
    }

    /// Advance the clock and collect due tasks
    ///
    /// Each armed task appears at most once, in table order.
    pub fn tick(&mut self, now_ms: u32) -> DueTasks<K, N> {
        let mut due = Vec::new();

        for slot in self.slots.iter_mut().filter(|slot| slot.armed) {
            let elapsed = now_ms.wrapping_sub(slot.last_seen_ms);
            slot.last_seen_ms = now_ms;

            if elapsed >= slot.remaining_ms {
                slot.remaining_ms = slot.period_ms;
                // Capacity matches the slot table
                let _ = due.push(slot.key);
            } else {
                slot.remaining_ms -= elapsed;
            }
        }

        due
    }

    fn slot(&self, id: TaskId) -> Result<&Slot<K>, SchedulerError> {
        self.slots.get(id.index()).ok_or(SchedulerError::UnknownTask)
    }

    fn slot_mut(&mut self, id: TaskId) -> Result<&mut Slot<K>, SchedulerError> {
        self.slots
            .get_mut(id.index())
            .ok_or(SchedulerError::UnknownTask)
    }
}

fn validate_period(period_ms: u32) -> Result<(), SchedulerError> {
    if period_ms == 0 {
        return Err(SchedulerError::InvalidPeriod);
    }
    Ok(())
}
