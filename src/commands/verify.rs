use beamfold::config::Config;
use beamfold::error::{Result, EXIT_SUCCESS};
use beamfold::models::Fold;
use beamfold::verify::{verify_fold, FoldReport};

pub fn verify(config: &Config, dataset: &str, fold: Option<u32>, json: bool) -> Result<u8> {
    let layout = config.layout(dataset)?;
    let splitter = config.splitter()?;

    let folds: Vec<Fold> = match fold {
        Some(id) => vec![Fold::new(id)?],
        None => Fold::range(config.folds.count).collect(),
    };

    let reports = folds
        .into_iter()
        .map(|fold| verify_fold(&splitter, &layout, fold))
        .collect::<Result<Vec<FoldReport>>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    for report in reports {
        report.into_result()?;
    }
    Ok(EXIT_SUCCESS)
}

fn print_report(report: &FoldReport) {
    let status = if report.is_valid() { "ok" } else { "FAILED" };
    println!(
        "Dataset {}, fold {}: {status} ({} input records, expected {})",
        report.dataset, report.fold, report.input_records, report.expected
    );
    if report.malformed_records > 0 {
        println!(
            "  note: {} input record(s) are not 'source<TAB>target'",
            report.malformed_records
        );
    }
    for split in &report.splits {
        let records = split
            .records
            .map(|n| n.to_string())
            .unwrap_or_else(|| String::from("missing"));
        let digest = split.digest.as_deref().unwrap_or("-");
        println!(
            "  {:<5} {:>7}  sha256 {}",
            split.split.as_str(),
            records,
            &digest[..digest.len().min(16)]
        );
    }
    for violation in &report.violations {
        println!("  violation: {violation}");
    }
}
