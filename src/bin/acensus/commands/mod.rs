mod curve;
mod extract;
mod show;

use curve::run_curve;
use extract::run_extract;
use show::run_show;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Extract(args) => run_extract(args, ctx),
        Command::Show(args) => run_show(args, ctx),
        Command::Curve(args) => run_curve(args, ctx),
    }
}
