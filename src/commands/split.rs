use beamfold::config::Config;
use beamfold::error::{Result, EXIT_SUCCESS};
use beamfold::models::{Fold, SplitKind};

pub fn split(config: &Config, dataset: &str, fold: u32, json: bool) -> Result<u8> {
    let fold = Fold::new(fold)?;
    let layout = config.layout(dataset)?;
    let outcome = config.splitter()?.split_unit(&layout, fold)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("Dataset {dataset}, fold {fold}");
    println!("  Input: {}", outcome.input.display());
    for (kind, path) in SplitKind::all().into_iter().zip(outcome.split_paths()) {
        println!(
            "  {:<5} {:>7} -> {}",
            kind.as_str(),
            outcome.sizes.get(kind),
            path.display()
        );
    }
    Ok(EXIT_SUCCESS)
}
