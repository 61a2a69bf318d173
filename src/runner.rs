use crate::adapter::SubBenchmark;
use crate::alloc::{AllocationSnapshot, CountingAllocator};
use crate::config::HarnessConfig;
use crate::handler::ResponseRecorder;
use std::fmt;
use std::hint::black_box;
use std::panic;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Workload shape of a single sub-benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    pub workers: usize,
    pub iterations: u64,
    pub batch: u64,
}

impl From<&HarnessConfig> for RunnerConfig {
    fn from(config: &HarnessConfig) -> Self {
        Self {
            workers: config.workers,
            iterations: config.iterations,
            batch: config.batch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Pending,
    Running,
    Complete,
}

/// Measurements of one sub-benchmark run.
#[derive(Debug, Clone, PartialEq)]
pub struct SubBenchmarkReport {
    pub label: String,
    pub iterations: u64,
    pub elapsed: Duration,
    pub ops_per_sec: f64,
    /// `None` unless the runner was given the installed [`CountingAllocator`].
    pub allocs_per_op: Option<f64>,
    pub bytes_per_op: Option<f64>,
}

impl SubBenchmarkReport {
    pub fn ns_per_op(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.elapsed.as_nanos() as f64 / self.iterations as f64
    }
}

impl fmt::Display for SubBenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{:.1} ns/op",
            self.label,
            self.iterations,
            self.ns_per_op()
        )?;
        if let (Some(bytes), Some(allocs)) = (self.bytes_per_op, self.allocs_per_op) {
            write!(f, "\t{bytes:.0} B/op\t{allocs:.0} allocs/op")?;
        }
        Ok(())
    }
}

/// Iterations left to execute, claimed by workers in batches.
#[derive(Debug)]
struct IterationBudget {
    remaining: AtomicU64,
}

impl IterationBudget {
    fn new(iterations: u64) -> Self {
        Self {
            remaining: AtomicU64::new(iterations),
        }
    }

    /// Takes up to `batch` iterations; zero once the budget is spent.
    fn claim(&self, batch: u64) -> u64 {
        self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |remaining| {
                (remaining > 0).then(|| remaining - remaining.min(batch))
            })
            .map_or(0, |previous| previous.min(batch))
    }
}

/// Executes sub-benchmarks on a fixed number of scoped worker threads.
///
/// Workers share the handler and the request read-only. Each iteration gets a
/// fresh [`ResponseRecorder`] that is dropped right after the call. A panic in
/// any worker is re-raised on the calling thread.
#[derive(Debug, Clone)]
pub struct Runner {
    config: RunnerConfig,
    allocator: Option<&'static CountingAllocator>,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            allocator: None,
        }
    }

    /// Reports per-operation allocations read from `allocator`, which must be
    /// the process's `#[global_allocator]`.
    pub fn with_allocator(mut self, allocator: &'static CountingAllocator) -> Self {
        self.allocator = Some(allocator);
        self
    }

    pub fn run(&self, sub: &SubBenchmark) -> SubBenchmarkReport {
        let workers = self.config.workers.max(1);
        let batch = self.config.batch.max(1);
        debug!(label = %sub.label, phase = ?Phase::Pending, workers, "sub-benchmark queued");

        let budget = IterationBudget::new(self.config.iterations);
        let before = self.allocations();
        let started = Instant::now();
        debug!(label = %sub.label, phase = ?Phase::Running, "sub-benchmark started");

        let iterations: u64 = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| scope.spawn(|| serve_until_spent(sub, &budget, batch)))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .sum()
        });

        let elapsed = started.elapsed();
        let allocated = self
            .allocations()
            .zip(before)
            .map(|(after, before)| after.since(before));

        let report = SubBenchmarkReport {
            label: sub.label.clone(),
            iterations,
            elapsed,
            ops_per_sec: per_second(iterations, elapsed),
            allocs_per_op: allocated.map(|counts| per_op(counts.allocations, iterations)),
            bytes_per_op: allocated.map(|counts| per_op(counts.bytes, iterations)),
        };

        info!(
            label = %report.label,
            phase = ?Phase::Complete,
            iterations = report.iterations,
            elapsed_ms = report.elapsed.as_millis() as u64,
            ops_per_sec = report.ops_per_sec,
            allocs_per_op = report.allocs_per_op,
            "sub-benchmark complete"
        );
        report
    }

    /// Runs every sub-benchmark in registration order.
    pub fn run_all(&self, subs: &[SubBenchmark]) -> Vec<SubBenchmarkReport> {
        subs.iter().map(|sub| self.run(sub)).collect()
    }

    fn allocations(&self) -> Option<AllocationSnapshot> {
        self.allocator.map(CountingAllocator::snapshot)
    }
}

fn serve_until_spent(sub: &SubBenchmark, budget: &IterationBudget, batch: u64) -> u64 {
    let mut served = 0;
    loop {
        let claimed = budget.claim(batch);
        if claimed == 0 {
            return served;
        }
        for _ in 0..claimed {
            let mut recorder = ResponseRecorder::new();
            sub.handler.serve(&mut recorder, &sub.request);
            black_box(&recorder);
        }
        served += claimed;
    }
}

fn per_second(iterations: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        iterations as f64 / secs
    } else {
        0.0
    }
}

fn per_op(total: u64, iterations: u64) -> f64 {
    if iterations == 0 {
        0.0
    } else {
        total as f64 / iterations as f64
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod runner_test;
