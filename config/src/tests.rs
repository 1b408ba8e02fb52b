use crate::{loader::ConfigLoader, pipeline::PipelineConfig, validate_config};
use std::io::Write;

#[test]
fn loader_falls_back_to_defaults_when_no_file_given() {
    let (config, sources) = ConfigLoader::default().load(None).unwrap();
    assert_eq!(config.similarity_threshold, 0.75);
    assert_eq!(sources.len(), 2);
}

#[test]
fn loader_applies_toml_overlay() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "similarity_threshold = 0.9").unwrap();
    writeln!(file, "worker_batch_size = 10").unwrap();

    let (config, _sources) = ConfigLoader::default().load(Some(file.path())).unwrap();
    assert_eq!(config.similarity_threshold, 0.9);
    assert_eq!(config.worker_batch_size, 10);
}

#[test]
fn defaults_pass_validation() {
    assert!(validate_config(&PipelineConfig::default()).is_ok());
}
