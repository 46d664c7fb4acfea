use anyhow::{Context, Result};

use attn_census::io::write_curve_csv;
use attn_census::{CurveStatus, smooth};

use crate::cli::CurveArgs;
use crate::config::build_curve_config;
use crate::display::{Context as DisplayContext, Progress, print_curve_summary};
use crate::io::{create_output, load_snapshot};
use crate::util::text::count;

const TOTAL_STEPS: u8 = 3;

pub fn run_curve(args: CurveArgs, ctx: DisplayContext) -> Result<()> {
    let settings = build_curve_config(&args)?;
    let curve_settings = &settings.curve;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Loading snapshot");
    let aggregates = load_snapshot(&args.input)?;
    progress.complete_step(
        "Loading snapshot",
        &[format!(
            "{} raw attention edges",
            count(aggregates.raw.len() as u64)
        )],
    );

    progress.step("Smoothing attention by distance");
    let pair = curve_settings.pair;
    let curve = smooth(&aggregates.raw, pair.source, pair.target, curve_settings.window)
        .with_context(|| format!("Failed to smooth {} distance curve", pair))?;
    let histogram = curve
        .histogram(curve_settings.bins)
        .context("Failed to bin distances")?;

    let smooth_substeps = match curve.status {
        CurveStatus::Smoothed { .. } if !curve.has_values() => vec![format!(
            "{} samples leave no full window of {} on both sides; curve left undefined",
            count(curve.len() as u64),
            count(curve.window as u64)
        )],
        CurveStatus::Smoothed { defined } => vec![
            format!("Select {} {} edges", count(curve.len() as u64), pair),
            format!(
                "Centered mean over {} samples ({} defined)",
                count(curve.window as u64),
                count(defined as u64)
            ),
        ],
        CurveStatus::InsufficientData { samples, window } => vec![format!(
            "Only {} samples for window {}; curve left undefined",
            count(samples as u64),
            count(window as u64)
        )],
    };
    progress.complete_step("Smoothing attention by distance", &smooth_substeps);

    if ctx.interactive {
        print_curve_summary(&curve, &histogram);
    }

    progress.step("Writing curve");
    let target = args
        .output
        .as_ref()
        .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
    let writer = create_output(args.output.as_deref())?;
    write_curve_csv(&curve, writer).with_context(|| format!("Failed to write curve to {}", target))?;
    progress.complete_step("Writing curve", &[format!("CSV to {}", target)]);

    progress.finish();

    Ok(())
}
