//! Simulation settings

use crate::fault_injection::{FaultPlan, NativeFault};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables of the simulated network
///
/// Deserializable so the daemon can load it from its config file. Every
/// field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimNetworkConfig {
    /// Delay added to every session call, in milliseconds
    pub latency_ms: u64,
    /// Number of library loads that fail before one succeeds
    pub failed_library_loads: u32,
    /// Whether new directories are reported as versioned
    pub versioned_directories: bool,
}

impl SimNetworkConfig {
    /// Translates the settings into a fault plan
    pub fn fault_plan(&self) -> FaultPlan {
        let mut plan = FaultPlan::new();
        if self.failed_library_loads > 0 {
            plan = plan.with_fault(NativeFault::FailLibraryLoad {
                count: self.failed_library_loads as usize,
            });
        }
        if self.latency_ms > 0 {
            plan = plan.with_fault(NativeFault::Latency {
                duration: Duration::from_millis(self.latency_ms),
            });
        }
        plan
    }
}
