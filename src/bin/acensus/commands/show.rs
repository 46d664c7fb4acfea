use std::path::Path;

use anyhow::{Context, Result};

use attn_census::ElementMatrix;
use attn_census::io::write_matrix_csv;

use crate::cli::ShowArgs;
use crate::config::load_settings;
use crate::display::{Context as DisplayContext, print_atom_counts, print_matrix, print_run_summary};
use crate::io::{create_file, load_snapshot};

const BOND_PROBABILITY_CSV: &str = "bond_probabilities.csv";
const ATTENTION_CSV: &str = "attention.csv";

pub fn run_show(args: ShowArgs, ctx: DisplayContext) -> Result<()> {
    let settings = load_settings(&args.common)?;
    let aggregates = load_snapshot(&args.input)?;

    let normalize = args.normalize_attention || settings.matrix.normalize_attention;
    let attention = if normalize {
        aggregates.interaction.row_normalized()
    } else {
        aggregates.interaction.clone()
    };
    let attention_title = if normalize {
        "Attention (row-normalized)"
    } else {
        "Mean Attention"
    };

    if ctx.interactive {
        print_run_summary(None, &aggregates);
    }

    // Matrices are the command's output, so they print even with --quiet.
    print_matrix("Bond Probability P(target | source)", &aggregates.bond_probability);
    print_matrix(attention_title, &attention);
    print_atom_counts(&aggregates.atom_counts);

    if let Some(dir) = &args.matrix_csv {
        write_matrix_file(&dir.join(BOND_PROBABILITY_CSV), &aggregates.bond_probability)?;
        write_matrix_file(&dir.join(ATTENTION_CSV), &attention)?;
        log::info!("wrote matrix CSVs to {}", dir.display());
    }

    Ok(())
}

fn write_matrix_file(path: &Path, matrix: &ElementMatrix) -> Result<()> {
    let writer = create_file(path)?;
    write_matrix_csv(matrix, writer)
        .with_context(|| format!("Failed to write matrix CSV: {}", path.display()))
}
