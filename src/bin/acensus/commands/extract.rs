use anyhow::{Context, Result, bail};

use attn_census::Aggregator;
use attn_census::io::{BatchReader, write_snapshot};

use crate::cli::ExtractArgs;
use crate::config::load_settings;
use crate::display::{
    Context as DisplayContext, Progress, print_atom_counts, print_matrix, print_run_summary,
};
use crate::io::{create_file, open_batches, stdin_is_tty};
use crate::util::text::count;

const TOTAL_STEPS: u8 = 2;

pub fn run_extract(args: ExtractArgs, ctx: DisplayContext) -> Result<()> {
    if args.input.is_none() && stdin_is_tty() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: acensus extract -i <BATCHES> -o <SNAPSHOT> or pipe batches via stdin."
        );
    }

    let source = open_batches(args.input.as_deref())?;
    let settings = load_settings(&args.common)?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Aggregating batches");
    let mut aggregator = Aggregator::new();
    let mut reader = BatchReader::new(source);
    while let Some(batch) = reader.next() {
        let line = reader.line();
        let batch = batch.context("Failed to read batch stream")?;
        aggregator
            .ingest(&batch)
            .with_context(|| format!("Invalid batch at line {}", line))?;

        if aggregator.batch_count() % 64 == 0 {
            progress.update(
                "Aggregating batches",
                &format!("{} batches", count(aggregator.batch_count() as u64)),
            );
        }
    }

    let batches = aggregator.batch_count();
    let aggregates = aggregator.finish();
    progress.complete_step(
        "Aggregating batches",
        &[
            format!("Fold {} batches", count(batches as u64)),
            format!(
                "Collect {} attention edges",
                count(aggregates.edge_count() as u64)
            ),
            "Row-normalize reference bonds".to_string(),
        ],
    );

    if batches == 0 {
        log::warn!("batch stream contained no batches; writing an empty snapshot");
    }

    if ctx.interactive {
        print_run_summary(Some(batches), &aggregates);
        print_atom_counts(&aggregates.atom_counts);
        if settings.matrix.normalize_attention {
            print_matrix(
                "Attention (row-normalized)",
                &aggregates.interaction.row_normalized(),
            );
        } else {
            print_matrix("Mean Attention", &aggregates.interaction);
        }
    }

    progress.step("Writing snapshot");
    let writer = create_file(&args.output)?;
    write_snapshot(&aggregates, writer)
        .with_context(|| format!("Failed to write snapshot: {}", args.output.display()))?;
    progress.complete_step(
        "Writing snapshot",
        &[format!("Encode {}", args.output.display())],
    );

    progress.finish();

    Ok(())
}
