use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use derive_more::Display;

pub static CYCLE_LOG_CONTEXT: CycleLogContext = CycleLogContext::new();

// Cycles may overlap if the caller runs several engines at once.
// The context then shows whichever cycle started last, which is good enough for log lines.
#[derive(Display, Debug)]
#[display("slot: {slot:?}, records: {records:?}")]
pub struct CycleLogContext {
    slot: AtomicU64,
    records: AtomicUsize,
}

impl CycleLogContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: AtomicU64::new(0),
            records: AtomicUsize::new(0),
        }
    }

    pub fn start_cycle(&self, slot: u64, records: usize) {
        self.slot.store(slot, Ordering::Relaxed);
        self.records.store(records, Ordering::Relaxed);
    }

    #[must_use]
    pub fn slot(&self) -> u64 {
        self.slot.load(Ordering::Relaxed)
    }
}

impl Default for CycleLogContext {
    fn default() -> Self {
        Self::new()
    }
}

#[macro_export]
macro_rules! info_with_cycle {
    ($($arg:tt)*) => {
        ::tracing::info!("[{}] {}", $crate::CYCLE_LOG_CONTEXT, format_args!($($arg)*));
    };
}

#[macro_export]
macro_rules! debug_with_cycle {
    ($($arg:tt)*) => {
        ::tracing::debug!("[{}] {}", $crate::CYCLE_LOG_CONTEXT, format_args!($($arg)*));
    };
}

#[macro_export]
macro_rules! warn_with_cycle {
    ($($arg:tt)*) => {
        ::tracing::warn!("[{}] {}", $crate::CYCLE_LOG_CONTEXT, format_args!($($arg)*));
    };
}

#[macro_export]
macro_rules! error_with_cycle {
    ($($arg:tt)*) => {
        ::tracing::error!("[{}] {}", $crate::CYCLE_LOG_CONTEXT, format_args!($($arg)*));
    };
}

#[macro_export]
macro_rules! trace_with_cycle {
    ($($arg:tt)*) => {
        ::tracing::trace!("[{}] {}", $crate::CYCLE_LOG_CONTEXT, format_args!($($arg)*));
    };
}
