use beamfold::config::Config;
use beamfold::error::{Error, Result};
use beamfold::run::run_all;

pub fn run(config: &Config, datasets: &[String], fail_fast: bool, json: bool) -> Result<u8> {
    if datasets.is_empty() {
        return Err(Error::config(
            "no datasets given: pass --dataset or set paths.datasets",
        ));
    }

    let summary = run_all(config, datasets, fail_fast)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(summary.exit_code());
    }

    println!("Fold generation");
    println!("===============");
    for outcome in &summary.succeeded {
        println!(
            "  ok      {}/{}  {}",
            outcome.dataset, outcome.fold, outcome.sizes
        );
    }
    for failure in &summary.failed {
        let fold = failure
            .fold
            .map(|f| f.to_string())
            .unwrap_or_else(|| String::from("-"));
        println!("  failed  {}/{}  {}", failure.dataset, fold, failure.message);
    }
    println!(
        "\n{} succeeded, {} failed{}",
        summary.succeeded.len(),
        summary.failed.len(),
        if summary.stopped_early {
            " (stopped early)"
        } else {
            ""
        }
    );

    Ok(summary.exit_code())
}
