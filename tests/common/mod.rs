//! Common test utilities

use std::fs;
use std::path::Path;

use beamfold::layout::DatasetLayout;

/// Link lines `http://wdc.example/airport/{i}\thttp://www.wikidata.org/entity/Q{i}\n` for `i` in `0..n`
pub fn link_lines(n: usize) -> String {
    (0..n)
        .map(|i| format!("http://wdc.example/airport/{i}\thttp://www.wikidata.org/entity/Q{i}\n"))
        .collect()
}

/// Create `{root}/{dataset}/ent_links` with `contents`
pub fn seed_dataset(root: &Path, dataset: &str, contents: &str) -> DatasetLayout {
    let layout = DatasetLayout::new(root, dataset, "ent_links").unwrap();
    fs::create_dir_all(layout.dataset_dir()).unwrap();
    fs::write(layout.input_path(), contents).unwrap();
    layout
}

/// Lines of a file, terminators included
#[allow(dead_code)]
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .split_inclusive('\n')
        .map(String::from)
        .collect()
}
