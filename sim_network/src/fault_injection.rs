//! Deterministic fault injection for testing
//!
//! This module lets tests make the simulated library fail or slow down in
//! a controlled way.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Faults fire a fixed number of times, never randomly
//! - **Composable**: A plan is a list of independent faults
//!
//! ## Example
//!
//! ```
//! use sim_network::fault_injection::{FaultPlan, NativeFault};
//! use std::time::Duration;
//!
//! let plan = FaultPlan::new()
//!     .with_fault(NativeFault::FailLibraryLoad { count: 1 })
//!     .with_fault(NativeFault::Latency { duration: Duration::from_millis(10) });
//! ```

use native_client::NativeError;
use std::time::Duration;

/// A fault to inject into the simulated library
#[derive(Debug, Clone)]
pub enum NativeFault {
    /// Fail the next N library loads
    FailLibraryLoad { count: usize },

    /// Fail the next N logging initializations
    FailInitLogging { count: usize },

    /// Sleep before every session call
    Latency { duration: Duration },

    /// Fail the next N session calls with the given error
    FailNextCalls { count: usize, error: NativeError },
}

/// A plan describing all faults to inject
#[derive(Debug, Clone, Default)]
pub struct FaultPlan {
    faults: Vec<NativeFault>,
}

impl FaultPlan {
    /// Creates a new empty fault plan
    pub fn new() -> Self {
        Self { faults: Vec::new() }
    }

    /// Adds a fault to the plan
    pub fn with_fault(mut self, fault: NativeFault) -> Self {
        self.faults.push(fault);
        self
    }

    /// Returns the faults in the plan
    pub fn faults(&self) -> &[NativeFault] {
        &self.faults
    }
}

/// Applies a fault plan
///
/// Keeps the remaining counts of the counted faults.
#[derive(Debug, Default)]
pub struct FaultInjector {
    failed_loads_remaining: usize,
    failed_inits_remaining: usize,
    latency: Option<Duration>,
    failed_calls: Vec<(usize, NativeError)>,
}

impl FaultInjector {
    /// Creates a new fault injector with the given plan
    pub fn new(plan: FaultPlan) -> Self {
        let mut injector = Self::default();

        for fault in plan.faults {
            match fault {
                NativeFault::FailLibraryLoad { count } => {
                    injector.failed_loads_remaining += count;
                }
                NativeFault::FailInitLogging { count } => {
                    injector.failed_inits_remaining += count;
                }
                NativeFault::Latency { duration } => {
                    injector.latency = Some(duration);
                }
                NativeFault::FailNextCalls { count, error } if count > 0 => {
                    injector.failed_calls.push((count, error));
                }
                NativeFault::FailNextCalls { .. } => {}
            }
        }

        injector
    }

    /// Returns true if this library load must fail
    pub fn should_fail_load(&mut self) -> bool {
        if self.failed_loads_remaining > 0 {
            self.failed_loads_remaining -= 1;
            return true;
        }
        false
    }

    /// Returns true if this logging initialization must fail
    pub fn should_fail_init(&mut self) -> bool {
        if self.failed_inits_remaining > 0 {
            self.failed_inits_remaining -= 1;
            return true;
        }
        false
    }

    /// Delay to apply to each session call
    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }

    /// Takes the error the next session call must fail with, if any
    pub fn next_call_failure(&mut self) -> Option<NativeError> {
        let (count, error) = self.failed_calls.first_mut()?;
        let error = error.clone();
        *count -= 1;
        if *count == 0 {
            self.failed_calls.remove(0);
        }
        Some(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_plan_injects_nothing() {
        let mut injector = FaultInjector::new(FaultPlan::new());
        assert!(!injector.should_fail_load());
        assert!(!injector.should_fail_init());
        assert!(injector.latency().is_none());
        assert!(injector.next_call_failure().is_none());
    }

    #[test]
    fn test_fail_library_load_counts_down() {
        let plan = FaultPlan::new().with_fault(NativeFault::FailLibraryLoad { count: 2 });
        let mut injector = FaultInjector::new(plan);

        assert!(injector.should_fail_load());
        assert!(injector.should_fail_load());
        assert!(!injector.should_fail_load());
    }

    #[test]
    fn test_call_failures_in_order() {
        let plan = FaultPlan::new()
            .with_fault(NativeFault::FailNextCalls {
                count: 1,
                error: NativeError::PermissionDenied,
            })
            .with_fault(NativeFault::FailNextCalls {
                count: 1,
                error: NativeError::DirectoryNotFound,
            });
        let mut injector = FaultInjector::new(plan);

        assert_eq!(injector.next_call_failure(), Some(NativeError::PermissionDenied));
        assert_eq!(injector.next_call_failure(), Some(NativeError::DirectoryNotFound));
        assert_eq!(injector.next_call_failure(), None);
    }
}
