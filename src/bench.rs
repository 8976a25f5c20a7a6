//! `tictoc bench` — repeated pipeline runs with structured JSON output.
//!
//! Runs the instrumented pipeline for a fixed iteration count, then emits a
//! JSON report with the per-block statistics of every subject, plus the
//! rendered text report on stderr.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::path::PathBuf;
use tictoc_core::{BlockStat, TimerGroup};

use crate::config::BenchConfig;
use crate::pipeline::Pipeline;

#[derive(Debug, Serialize)]
pub struct BenchReport {
    /// UTC timestamp of report generation (RFC 3339).
    pub generated_at: String,
    pub iterations: u64,
    pub sample_points: usize,
    pub subjects: Vec<SubjectReport>,
}

#[derive(Debug, Serialize)]
pub struct SubjectReport {
    pub label: String,
    pub blocks: Vec<BlockReport>,
}

#[derive(Debug, Serialize)]
pub struct BlockReport {
    pub name: String,
    pub level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub count: u64,
    pub total_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std_ms: Option<f64>,
}

impl From<&BlockStat> for BlockReport {
    fn from(stat: &BlockStat) -> Self {
        Self {
            name: stat.name.clone(),
            level: stat.level,
            parent: stat.parent.clone(),
            count: stat.count,
            total_ms: stat.total_ms,
            mean_ms: stat.mean_ms(),
            std_ms: stat.std_ms(),
        }
    }
}

pub fn run(config: &BenchConfig, iterations: Option<u64>, output: Option<PathBuf>) -> Result<()> {
    let iterations = iterations.unwrap_or(config.iterations);
    if iterations == 0 {
        anyhow::bail!("iterations must be at least 1");
    }

    eprintln!(
        "tictoc bench — {} iteration(s), {} sample points...",
        iterations, config.sample_points
    );

    let mut pipeline = Pipeline::new(config.sample_points);
    let mut group = TimerGroup::new(config.enabled);
    let pipeline_registry = group.attach("Pipeline", &mut pipeline);
    let resampler_registry = group.attach("Resampler", &mut pipeline.resampler);

    for _ in 0..iterations {
        pipeline.run_once();
    }

    let report = BenchReport {
        generated_at: Utc::now().to_rfc3339(),
        iterations,
        sample_points: config.sample_points,
        subjects: vec![
            SubjectReport {
                label: "Pipeline".into(),
                blocks: pipeline_registry.snapshot().iter().map(Into::into).collect(),
            },
            SubjectReport {
                label: "Resampler".into(),
                blocks: resampler_registry.snapshot().iter().map(Into::into).collect(),
            },
        ],
    };

    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => {
            std::fs::write(&path, &json)?;
            eprintln!("Report written to {}", path.display());
        }
        None => {
            println!("{}", json);
        }
    }

    // Human-readable summary to stderr
    eprintln!();
    eprintln!("=== BENCH SUMMARY ({} iterations) ===", iterations);
    eprintln!("{}", group.render()?);

    Ok(())
}
