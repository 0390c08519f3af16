mod commands;
mod terminal;

use std::process::ExitCode;
use std::time::Instant;

use checklb_core::pipeline::Pipeline;
use commands::CommandLine;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose)?;

    let cfg = commands.config();
    let pipeline = Pipeline::new(cfg);
    print::starting(pipeline.config(), commands.targets.len());

    let start_time = Instant::now();
    let summary = pipeline
        .run(commands.targets, print::TerminalReporter)
        .await;
    print::summary(&summary, start_time.elapsed());

    if summary.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
