//! Timed comparison of strategies against the sequential baseline.


use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::config::ExperimentConfig;
use crate::engine::{BlurEngine, BlurParams, Strategy, StrategyKind};
use crate::error::Result;
use crate::partition::PartitionKind;
use crate::picture::Picture;

/// Timing and correctness of one (strategy, partition) pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunReport {
    pub strategy: StrategyKind,
    /// `None` for the sequential baseline, which does not partition.
    pub partition: Option<PartitionKind>,
    pub regions: usize,
    pub pool_size: usize,
    pub runs: usize,
    pub min_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
    /// Pixels of the last output that differ from the baseline.
    pub mismatched_pixels: usize,
}

impl RunReport {
    pub fn matches_baseline(&self) -> bool {
        self.mismatched_pixels == 0
    }

    /// Stable label such as `task_stack_sector` or `sequential`.
    pub fn label(&self) -> String {
        match self.partition {
            Some(partition) => format!("{}_{}", self.strategy, partition),
            None => self.strategy.to_string(),
        }
    }
}

/// A pair that was planned but not run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedRun {
    pub strategy: StrategyKind,
    pub partition: PartitionKind,
    pub regions: usize,
    pub reason: String,
}

/// A pair whose pass returned an error. The experiment carries on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FailedRun {
    pub strategy: StrategyKind,
    pub partition: Option<PartitionKind>,
    pub regions: usize,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub width: usize,
    pub height: usize,
    pub repeats: usize,
    pub runs: Vec<RunReport>,
    pub skipped: Vec<SkippedRun>,
    pub failed: Vec<FailedRun>,
}

impl ExperimentReport {
    pub fn all_match_baseline(&self) -> bool {
        self.runs.iter().all(RunReport::matches_baseline)
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn find(&self, strategy: StrategyKind, partition: Option<PartitionKind>) -> Option<&RunReport> {
        self.runs
            .iter()
            .find(|run| run.strategy == strategy && run.partition == partition)
    }
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}x{} picture, {} runs per strategy",
            self.width, self.height, self.repeats
        )?;
        writeln!(
            f,
            "{:<28} {:>9} {:>6} {:>11} {:>11} {:>11}  result",
            "strategy", "regions", "pool", "min ms", "mean ms", "max ms"
        )?;
        for run in &self.runs {
            let result = if run.matches_baseline() {
                "ok".to_string()
            } else {
                format!("{} pixels differ", run.mismatched_pixels)
            };
            writeln!(
                f,
                "{:<28} {:>9} {:>6} {:>11.3} {:>11.3} {:>11.3}  {}",
                run.label(),
                run.regions,
                run.pool_size,
                run.min_ms,
                run.mean_ms,
                run.max_ms,
                result
            )?;
        }
        for skipped in &self.skipped {
            writeln!(
                f,
                "{:<28} {:>9} skipped: {}",
                format!("{}_{}", skipped.strategy, skipped.partition),
                skipped.regions,
                skipped.reason
            )?;
        }
        for failed in &self.failed {
            let label = match failed.partition {
                Some(partition) => format!("{}_{}", failed.strategy, partition),
                None => failed.strategy.to_string(),
            };
            writeln!(
                f,
                "{:<28} {:>9} failed: {}",
                label, failed.regions, failed.error
            )?;
        }
        Ok(())
    }
}

/// Runs the configured strategies and partitions over one input picture.
#[derive(Debug)]
pub struct Experiment {
    config: ExperimentConfig,
    engine: BlurEngine,
}

impl Experiment {
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine: BlurEngine::new(),
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn run(&self, input: &Picture) -> Result<ExperimentReport> {
        self.run_with(input, |_, _| Ok(()))
    }

    /// Like [`Experiment::run`], handing the last output of every pair to
    /// `sink` when `save_outputs` is enabled.
    pub fn run_with<F>(&self, input: &Picture, sink: F) -> Result<ExperimentReport>
    where
        F: FnMut(&RunReport, &Picture) -> Result<()>,
    {
        self.run_strategies(input, |kind| self.engine.strategy(kind), sink)
    }

    /// Drives the experiment with strategies resolved through `lookup`.
    ///
    /// A pass that fails is recorded in [`ExperimentReport::failed`] and the
    /// remaining pairs still run. Baseline and sink errors abort.
    pub(crate) fn run_strategies<'s, L, F>(
        &self,
        input: &Picture,
        lookup: L,
        mut sink: F,
    ) -> Result<ExperimentReport>
    where
        L: Fn(StrategyKind) -> &'s dyn Strategy,
        F: FnMut(&RunReport, &Picture) -> Result<()>,
    {
        let baseline_params = self.config.params(PartitionKind::Row);
        let baseline = self
            .engine
            .run(StrategyKind::Sequential, input.clone(), &baseline_params)?;

        let mut report = ExperimentReport {
            width: input.width(),
            height: input.height(),
            repeats: self.config.repeats,
            runs: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        };

        for &kind in &self.config.strategies {
            let strategy = lookup(kind);
            if kind == StrategyKind::Sequential {
                let measured = self.measure_or_record(
                    strategy,
                    None,
                    &baseline_params,
                    (input, &baseline),
                    &mut report.failed,
                );
                if let Some((run, output)) = measured {
                    self.finish_run(run, &output, &mut report, &mut sink)?;
                }
                continue;
            }

            for &partition in &self.config.partitions {
                let params = self.config.params(partition);
                let regions = strategy.plan(&params, input.width(), input.height()).len();

                if kind == StrategyKind::ThreadPerRegion
                    && regions > self.config.thread_per_region_limit
                {
                    let reason = format!(
                        "{regions} regions exceed the thread-per-region limit of {}",
                        self.config.thread_per_region_limit
                    );
                    tracing::warn!(strategy = %kind, %partition, "Skipping: {}", reason);
                    report.skipped.push(SkippedRun {
                        strategy: kind,
                        partition,
                        regions,
                        reason,
                    });
                    continue;
                }

                let measured = self.measure_or_record(
                    strategy,
                    Some(partition),
                    &params,
                    (input, &baseline),
                    &mut report.failed,
                );
                if let Some((run, output)) = measured {
                    self.finish_run(run, &output, &mut report, &mut sink)?;
                }
            }
        }

        Ok(report)
    }

    /// Measures one pair, or files its error in `failed` and returns `None`.
    fn measure_or_record(
        &self,
        strategy: &dyn Strategy,
        partition: Option<PartitionKind>,
        params: &BlurParams,
        (input, baseline): (&Picture, &Picture),
        failed: &mut Vec<FailedRun>,
    ) -> Option<(RunReport, Picture)> {
        match self.measure(strategy, partition, params, input, baseline) {
            Ok(measured) => Some(measured),
            Err(err) => {
                let run = FailedRun {
                    strategy: strategy.kind(),
                    partition,
                    regions: strategy.plan(params, input.width(), input.height()).len(),
                    error: err.to_string(),
                };
                tracing::warn!(
                    strategy = %run.strategy,
                    regions = run.regions,
                    "Pass failed, continuing: {}",
                    run.error
                );
                failed.push(run);
                None
            }
        }
    }

    fn measure(
        &self,
        strategy: &dyn Strategy,
        partition: Option<PartitionKind>,
        params: &BlurParams,
        input: &Picture,
        baseline: &Picture,
    ) -> Result<(RunReport, Picture)> {
        let kind = strategy.kind();
        let regions = strategy.plan(params, input.width(), input.height()).len();

        let mut durations = Vec::with_capacity(self.config.repeats);
        let mut output = input.clone();
        for _ in 0..self.config.repeats {
            output.clone_from(input);
            let started = Instant::now();
            strategy.run_in_place(&mut output, params)?;
            durations.push(started.elapsed());
        }

        let (min_ms, mean_ms, max_ms) = summarize(&durations);
        let run = RunReport {
            strategy: kind,
            partition,
            regions,
            pool_size: uses_pool(kind)
                .then(|| params.effective_pool_size())
                .unwrap_or(0),
            runs: durations.len(),
            min_ms,
            mean_ms,
            max_ms,
            mismatched_pixels: output.diff_count(baseline),
        };
        Ok((run, output))
    }

    fn finish_run<F>(
        &self,
        run: RunReport,
        output: &Picture,
        report: &mut ExperimentReport,
        sink: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&RunReport, &Picture) -> Result<()>,
    {
        if run.matches_baseline() {
            tracing::info!(
                run = %run.label(),
                mean_ms = run.mean_ms,
                regions = run.regions,
                "Run complete"
            );
        } else {
            tracing::warn!(
                run = %run.label(),
                mismatched = run.mismatched_pixels,
                "Output differs from sequential baseline"
            );
        }

        if self.config.save_outputs {
            sink(&run, output)?;
        }
        report.runs.push(run);
        Ok(())
    }
}

fn uses_pool(strategy: StrategyKind) -> bool {
    matches!(strategy, StrategyKind::TaskStack | StrategyKind::ManagedPool)
}

/// `(min, mean, max)` in milliseconds; zeros for no samples.
fn summarize(durations: &[Duration]) -> (f64, f64, f64) {
    if durations.is_empty() {
        return (0.0, 0.0, 0.0);
    }

    let to_ms = |d: &Duration| d.as_secs_f64() * 1000.0;
    let min = durations.iter().map(to_ms).fold(f64::INFINITY, f64::min);
    let max = durations.iter().map(to_ms).fold(0.0, f64::max);
    let mean = durations.iter().map(to_ms).sum::<f64>() / durations.len() as f64;
    (min, mean, max)
}
