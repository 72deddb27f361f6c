//! Per-phase resource reporting for a pricing run.
//!
//! Each call to [`SystemMonitor::log_phase`] logs how long the phase took,
//! the process CPU and resident memory, and the highest memory seen so far.
//! Without the `cli` feature the monitor compiles to no-ops.

use std::time::Duration;

/// Resource usage observed at the end of one pipeline phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseStats {
    pub phase: String,
    pub phase_time: Duration,
    pub total_time: Duration,
    pub cpu_percent: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
}

#[cfg(feature = "cli")]
mod imp {
    use super::PhaseStats;
    use std::sync::Mutex;
    use std::time::Instant;
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

    const BYTES_PER_MB: u64 = 1024 * 1024;

    struct State {
        system: System,
        last_mark: Instant,
        peak_memory_mb: u64,
    }

    pub struct SystemMonitor {
        pid: Option<Pid>,
        started: Instant,
        state: Option<Mutex<State>>,
    }

    impl SystemMonitor {
        pub fn new(enabled: bool) -> Self {
            let started = Instant::now();
            if !enabled {
                return Self {
                    pid: None,
                    started,
                    state: None,
                };
            }

            let pid = sysinfo::get_current_pid()
                .map_err(|e| tracing::warn!("Process stats unavailable: {}", e))
                .ok();

            let mut system = System::new();
            system.refresh_memory();
            if let Some(pid) = pid {
                // Seed the CPU counters so the first phase has a baseline.
                system.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[pid]),
                    true,
                    ProcessRefreshKind::nothing().with_cpu().with_memory(),
                );
            }

            Self {
                pid,
                started,
                state: Some(Mutex::new(State {
                    system,
                    last_mark: started,
                    peak_memory_mb: 0,
                })),
            }
        }

        pub fn is_enabled(&self) -> bool {
            self.state.is_some()
        }

        /// Closes the current phase and returns its stats. `None` when the
        /// monitor is disabled or the process cannot be inspected.
        pub fn snapshot(&self, phase: &str) -> Option<PhaseStats> {
            let mut state = self.state.as_ref()?.lock().ok()?;
            let pid = self.pid?;

            state.system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::nothing().with_cpu().with_memory(),
            );
            let (cpu_percent, memory_mb) = {
                let process = state.system.process(pid)?;
                (process.cpu_usage(), process.memory() / BYTES_PER_MB)
            };

            let now = Instant::now();
            let phase_time = now.duration_since(state.last_mark);
            state.last_mark = now;
            state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);

            Some(PhaseStats {
                phase: phase.to_string(),
                phase_time,
                total_time: now.duration_since(self.started),
                cpu_percent,
                memory_mb,
                peak_memory_mb: state.peak_memory_mb,
            })
        }

        pub fn total_memory_mb(&self) -> Option<u64> {
            let state = self.state.as_ref()?.lock().ok()?;
            Some(state.system.total_memory() / BYTES_PER_MB)
        }
    }
}

#[cfg(not(feature = "cli"))]
mod imp {
    use super::PhaseStats;

    pub struct SystemMonitor;

    impl SystemMonitor {
        pub fn new(_enabled: bool) -> Self {
            Self
        }

        pub fn is_enabled(&self) -> bool {
            false
        }

        pub fn snapshot(&self, _phase: &str) -> Option<PhaseStats> {
            None
        }

        pub fn total_memory_mb(&self) -> Option<u64> {
            None
        }
    }
}

pub use imp::SystemMonitor;

impl SystemMonitor {
    pub fn log_phase(&self, phase: &str) -> Option<PhaseStats> {
        let stats = self.snapshot(phase)?;
        tracing::info!(
            phase = %stats.phase,
            "📊 {} took {:?} | CPU {:.1}% | Memory {}MB (peak {}MB)",
            stats.phase,
            stats.phase_time,
            stats.cpu_percent,
            stats.memory_mb,
            stats.peak_memory_mb
        );
        Some(stats)
    }

    pub fn log_summary(&self, last: Option<&PhaseStats>) {
        let Some(last) = last else {
            return;
        };
        match self.total_memory_mb() {
            Some(total) if total > 0 => tracing::info!(
                "📊 Run finished in {:?}, peak memory {}MB of {}MB",
                last.total_time,
                last.peak_memory_mb,
                total
            ),
            _ => tracing::info!(
                "📊 Run finished in {:?}, peak memory {}MB",
                last.total_time,
                last.peak_memory_mb
            ),
        }
    }
}

impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
