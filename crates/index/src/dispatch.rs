//! Fan-out of independent per-calendar-day tasks.
//!
//! The threshold table is built from 366 pure, independent estimations.
//! A [`DayDispatcher`] runs one task per calendar day label and returns the
//! outcomes indexed by label, whatever order the tasks finished in. A task
//! that panics is reported as a [`TaskFailure`] for its label only.

use std::panic::{AssertUnwindSafe, catch_unwind};

use hwmid_calendar::Doy;
use rayon::prelude::*;

use crate::error::HwmidError;

/// A calendar-day task that did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// Label whose task failed.
    pub doy: Doy,
    /// Description of the failure.
    pub reason: String,
}

/// Runs one task per calendar day label and collects the outcomes.
pub trait DayDispatcher: Sync {
    /// Runs `task` for every label 1..=366.
    ///
    /// The returned vector has exactly 366 entries; entry `i` holds the
    /// outcome for label `i + 1`.
    fn dispatch<T, F>(&self, task: F) -> Vec<Result<T, TaskFailure>>
    where
        T: Send,
        F: Fn(Doy) -> T + Sync + Send;
}

/// Runs one task, converting a panic into a [`TaskFailure`].
fn run_task<T, F>(doy: Doy, task: &F) -> Result<T, TaskFailure>
where
    F: Fn(Doy) -> T,
{
    catch_unwind(AssertUnwindSafe(|| task(doy))).map_err(|payload| {
        let reason = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "task panicked".to_string()
        };
        TaskFailure { doy, reason }
    })
}

/// Runs every task on the calling thread, in label order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialDispatcher;

impl DayDispatcher for SequentialDispatcher {
    fn dispatch<T, F>(&self, task: F) -> Vec<Result<T, TaskFailure>>
    where
        T: Send,
        F: Fn(Doy) -> T + Sync + Send,
    {
        Doy::all().map(|doy| run_task(doy, &task)).collect()
    }
}

/// Runs tasks on a rayon thread pool.
///
/// Without an explicit size the global rayon pool is used; with one, a
/// dedicated fixed-size pool is built once and reused for every dispatch.
#[derive(Debug)]
pub struct RayonDispatcher {
    pool: Option<rayon::ThreadPool>,
}

impl RayonDispatcher {
    /// Creates a dispatcher on the global rayon pool.
    pub fn global() -> Self {
        Self { pool: None }
    }

    /// Creates a dispatcher with a dedicated pool of `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns [`HwmidError::InvalidThreads`] if `threads` is zero, or
    /// [`HwmidError::Pool`] if the pool cannot be built.
    pub fn with_threads(threads: usize) -> Result<Self, HwmidError> {
        if threads == 0 {
            return Err(HwmidError::InvalidThreads { threads });
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("hwmid-day-{i}"))
            .build()
            .map_err(|e| HwmidError::Pool {
                reason: e.to_string(),
            })?;
        Ok(Self { pool: Some(pool) })
    }

    /// Creates a dispatcher from an optional pool size.
    ///
    /// # Errors
    ///
    /// See [`RayonDispatcher::with_threads`].
    pub fn from_threads(threads: Option<usize>) -> Result<Self, HwmidError> {
        match threads {
            Some(n) => Self::with_threads(n),
            None => Ok(Self::global()),
        }
    }

    /// Number of worker threads tasks will run on.
    pub fn n_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl Default for RayonDispatcher {
    fn default() -> Self {
        Self::global()
    }
}

impl DayDispatcher for RayonDispatcher {
    fn dispatch<T, F>(&self, task: F) -> Vec<Result<T, TaskFailure>>
    where
        T: Send,
        F: Fn(Doy) -> T + Sync + Send,
    {
        let labels: Vec<Doy> = Doy::all().collect();
        // Indexed collect keeps label order regardless of completion order.
        let run = || {
            labels
                .par_iter()
                .map(|&doy| run_task(doy, &task))
                .collect::<Vec<_>>()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_returns_label_order() {
        let out = SequentialDispatcher.dispatch(|d| d.get());
        assert_eq!(out.len(), 366);
        for (i, r) in out.iter().enumerate() {
            assert_eq!(r.as_ref().unwrap(), &(i as u16 + 1));
        }
    }

    #[test]
    fn rayon_returns_label_order() {
        let dispatcher = RayonDispatcher::with_threads(4).unwrap();
        assert_eq!(dispatcher.n_threads(), 4);
        let out = dispatcher.dispatch(|d| {
            // Uneven work so completion order differs from submission order.
            let spin = (367 - d.get() as u64) * 50;
            std::hint::black_box((0..spin).fold(0u64, |a, b| a.wrapping_add(b)));
            d.get()
        });
        let labels: Vec<u16> = out.into_iter().map(Result::unwrap).collect();
        assert_eq!(labels, (1..=366).collect::<Vec<_>>());
    }

    #[test]
    fn panicking_task_is_isolated() {
        for out in [
            SequentialDispatcher.dispatch(task_failing_on_100),
            RayonDispatcher::global().dispatch(task_failing_on_100),
        ] {
            let failures: Vec<&TaskFailure> = out.iter().filter_map(|r| r.as_ref().err()).collect();
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].doy.get(), 100);
            assert!(failures[0].reason.contains("boom"));
            assert_eq!(out.iter().filter(|r| r.is_ok()).count(), 365);
        }
    }

    fn task_failing_on_100(d: Doy) -> u16 {
        if d.get() == 100 {
            panic!("boom at {}", d.get());
        }
        d.get()
    }

    #[test]
    fn zero_threads_rejected() {
        assert!(matches!(
            RayonDispatcher::with_threads(0),
            Err(HwmidError::InvalidThreads { threads: 0 })
        ));
    }
}
