use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use tracing_subscriber::EnvFilter;
use ux_healthcheck::{read_bulk, CategoryKey, Error, Report, CATALOG};

#[derive(Parser)]
struct Args {
    path: String,
}

fn main() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let reader = BufReader::new(File::open(&args.path)?);
    for row in read_bulk(&CATALOG, reader) {
        match row {
            Ok((id, answers)) => {
                let report = Report::build(&CATALOG, &answers);
                let scores: Vec<String> = CategoryKey::ALL
                    .iter()
                    .map(|&key| format!("{}={}", key, report.scores.get(key)))
                    .collect();
                println!(
                    "id = {}, scores = [{}], total = {}, tier = {}, focus = {}",
                    id,
                    scores.join(", "),
                    report.total,
                    report.tier.name(),
                    report.plan.category
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "row skipped");
            }
        }
    }
    Ok(())
}
