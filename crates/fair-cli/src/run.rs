use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use fair_core::{FairReport, FairScorer, FixedTrials};
use fair_registry::{
    build_metadata_source, build_reachability_probe, file_stem, ReachabilityConfig,
    RegistryConfig,
};
use fair_render::{render_heatmap, HeatmapOptions, ScoreGrid};

use crate::cli::{Command, OutputFormat, PlotArgs, ScoreArgs};
use crate::progress::TracingProgress;
use crate::report::{render_json, render_text};

pub async fn run(command: Command) -> Result<()> {
    match command {
        Command::Score(args) => score_command(args).await,
        Command::Plot(args) => plot_command(&args),
    }
}

/// `FAIR_<id>_<YYYYMMDD-HHMMSS>.png` in the working directory.
pub fn plot_file_name(identifier: &str, at: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "FAIR_{}_{}.png",
        file_stem(identifier),
        at.format("%Y%m%d-%H%M%S")
    ))
}

/// Environment config with command-line overrides applied on top.
pub fn resolve_config(args: &ScoreArgs) -> (RegistryConfig, ReachabilityConfig) {
    let mut registry = RegistryConfig::from_env();
    if let Some(url) = &args.registry_url {
        registry.base_url.clone_from(url);
    }
    if let Some(secs) = args.timeout.filter(|s| *s > 0) {
        registry.timeout = Duration::from_secs(secs);
    }
    if args.no_cache {
        registry.cache_dir = None;
    } else if let Some(dir) = &args.cache_dir {
        registry.cache_dir = Some(dir.clone());
    }

    let mut reach = ReachabilityConfig::from_env();
    if let Some(secs) = args.probe_timeout.filter(|s| *s > 0) {
        reach.timeout = Duration::from_secs(secs);
    }
    (registry, reach)
}

pub async fn score_command(args: ScoreArgs) -> Result<()> {
    let (registry, reach) = resolve_config(&args);
    tracing::debug!(
        registry = %registry.base_url,
        cache = ?registry.cache_dir,
        probe_timeout = ?reach.timeout,
        "resolved configuration"
    );

    let options = reach.rule_options();
    let source = build_metadata_source(registry).context("invalid registry configuration")?;
    let probe = build_reachability_probe(reach).context("failed to build link checker")?;

    let mut builder = FairScorer::builder(source, probe)
        .progress(Arc::new(TracingProgress))
        .options(options);
    if let Some(trials) = args.trials {
        builder = builder.planner(Arc::new(FixedTrials(usize::from(trials))));
    }
    let report = builder.build().score(&args.identifier).await;

    write_report(&report, args.format)?;

    if !args.no_plot {
        let path = args
            .plot
            .clone()
            .unwrap_or_else(|| plot_file_name(&args.identifier, Local::now()));
        let grid = ScoreGrid::new(report.vector.to_matrix()).context("scores out of range")?;
        let saved = render_heatmap(&grid, Some(&path), HeatmapOptions { scale: args.scale })
            .with_context(|| format!("failed to write heatmap {}", path.display()))?;
        tracing::info!(path = %saved.display(), "heatmap written");
    }
    Ok(())
}

fn write_report(report: &FairReport, format: OutputFormat) -> Result<()> {
    let body = match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => {
            let mut json = render_json(report).context("failed to serialize report")?;
            json.push('\n');
            json
        }
    };
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(body.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

pub fn plot_command(args: &PlotArgs) -> Result<()> {
    let grid = ScoreGrid::from_flat(&args.values)?;
    let path = render_heatmap(
        &grid,
        args.output.as_deref(),
        HeatmapOptions { scale: args.scale },
    )?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn score_args(argv: &[&str]) -> ScoreArgs {
        let mut full = vec!["fair-score", "score"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).expect("parse").command {
            Command::Score(args) => args,
            Command::Plot(_) => panic!("expected score command"),
        }
    }

    #[test]
    fn plot_name_is_sanitized_and_timestamped() {
        let at = Local
            .with_ymd_and_hms(2025, 3, 9, 14, 5, 0)
            .single()
            .expect("unambiguous time");
        assert_eq!(
            plot_file_name("HBM666.NDQZ.365", at),
            PathBuf::from("FAIR_HBM666.NDQZ.365_20250309-140500.png")
        );
        assert_eq!(
            plot_file_name("a/b", at),
            PathBuf::from("FAIR_a_b_20250309-140500.png")
        );
    }

    #[test]
    fn flags_override_environment() {
        let args = score_args(&[
            "X",
            "--registry-url",
            "http://127.0.0.1:9/entities",
            "--no-cache",
            "--timeout",
            "7",
            "--probe-timeout",
            "2",
        ]);
        let (registry, reach) = resolve_config(&args);
        assert_eq!(registry.base_url, "http://127.0.0.1:9/entities");
        assert!(registry.cache_dir.is_none());
        assert_eq!(registry.timeout, Duration::from_secs(7));
        assert_eq!(reach.timeout, Duration::from_secs(2));
    }

    #[test]
    fn cache_dir_flag_replaces_default() {
        let args = score_args(&["X", "--cache-dir", "records"]);
        let (registry, _) = resolve_config(&args);
        assert_eq!(registry.cache_dir, Some(PathBuf::from("records")));
    }

    #[test]
    fn plot_rejects_values_above_one() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("bad.png");
        let args = PlotArgs {
            values: vec![0.5, 1.2, 0.0, 0.0],
            output: Some(target.clone()),
            scale: 100,
        };
        let err = plot_command(&args).expect_err("out of range");
        assert!(err.to_string().contains("less than or equal to 1"));
        assert!(!target.exists());
    }
}
