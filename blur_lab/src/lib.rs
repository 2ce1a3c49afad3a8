//! blur_lab - a 3x3 box blur run under competing concurrency strategies.
//!
//! Each pass snapshots the picture, cuts its interior into disjoint regions
//! and executes them with one of several strategies:
//! - a sequential baseline,
//! - one OS thread per region,
//! - a fixed set of workers draining a mutex-guarded task stack,
//! - a reusable managed thread pool.
//!
//! Every strategy produces output byte-identical to the baseline.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use blur_lab::{BlurEngine, BlurParams, PartitionKind, Picture, StrategyKind};
//!
//! let picture = Picture::load("input.png")?;
//! let engine = BlurEngine::new();
//! let params = BlurParams::new(PartitionKind::Sector).with_sectors(16).with_pool_size(8);
//! let blurred = engine.run(StrategyKind::TaskStack, picture, &params)?;
//! blurred.save("blurred.png")?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod experiment;
pub mod kernel;
pub mod partition;
pub mod picture;
pub mod region;
pub mod snapshot;

pub use config::ExperimentConfig;
pub use engine::{BlurEngine, BlurParams, Strategy, StrategyKind};
pub use error::{BlurError, Result};
pub use experiment::{Experiment, ExperimentReport, FailedRun, RunReport, SkippedRun};
pub use partition::PartitionKind;
pub use picture::{Picture, Pixel};
pub use region::Region;
pub use snapshot::Snapshot;
