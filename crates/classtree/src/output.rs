//! Rendered artifacts and their destination
//!
//! Both documents are rendered in memory first. Writing checks the
//! destination, stages each document in a temporary file inside the
//! destination directory and only moves them into place once both are
//! complete. If the second move fails the first is removed again, so a
//! failed run never leaves a partial artifact behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, span, warn, Level};

use crate::core::{ModelError, OutputConfig};
use crate::model::{InstanceNode, SchemaDescriptor};

/// The two products of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub tree: InstanceNode,
    pub descriptors: Vec<SchemaDescriptor>,
    pub instance_document: String,
    pub schema_document: String,
}

/// Final locations of written artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub instance: PathBuf,
    pub schema: PathBuf,
}

impl Artifacts {
    /// Write both documents to the configured destination
    pub fn write_to(&self, output: &OutputConfig) -> Result<ArtifactPaths, ModelError> {
        let write_span = span!(Level::INFO, "write_artifacts", dir = %output.dir().display());
        let _enter = write_span.enter();

        output.validate()?;

        let dir = output.dir();
        fs::create_dir_all(dir).map_err(|source| output_error(dir, source))?;

        let paths = ArtifactPaths {
            instance: output.instance_path(),
            schema: output.schema_path(),
        };

        let instance = stage(dir, &paths.instance, &self.instance_document)?;
        let schema = stage(dir, &paths.schema, &self.schema_document)?;
        debug!("Artifacts staged");

        persist(instance, &paths.instance)?;
        if let Err(err) = persist(schema, &paths.schema) {
            roll_back(&paths.instance);
            return Err(err);
        }

        info!(
            instance = %paths.instance.display(),
            schema = %paths.schema.display(),
            "Artifacts written"
        );
        Ok(paths)
    }
}

fn stage(dir: &Path, target: &Path, contents: &str) -> Result<NamedTempFile, ModelError> {
    let mut file = NamedTempFile::new_in(dir).map_err(|source| output_error(target, source))?;
    file.write_all(contents.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| output_error(target, source))?;
    Ok(file)
}

fn persist(file: NamedTempFile, target: &Path) -> Result<(), ModelError> {
    file.persist(target)
        .map(|_| ())
        .map_err(|err| output_error(target, err.error))
}

fn roll_back(written: &Path) {
    match fs::remove_file(written) {
        Ok(()) => debug!(path = %written.display(), "Rolled back written artifact"),
        Err(err) => warn!(
            path = %written.display(),
            error = %err,
            "Failed to roll back written artifact"
        ),
    }
}

fn output_error(path: &Path, source: std::io::Error) -> ModelError {
    ModelError::Output {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn artifacts() -> Artifacts {
        Artifacts {
            tree: InstanceNode::new("Root"),
            descriptors: Vec::new(),
            instance_document: "<Root>\n</Root>\n".to_string(),
            schema_document: "[]\n".to_string(),
        }
    }

    #[test]
    fn test_write_creates_directory() {
        let temp = tempdir().unwrap();
        let output = OutputConfig::new(temp.path().join("nested").join("out"));

        let paths = artifacts().write_to(&output).unwrap();

        assert_eq!(paths.instance, output.instance_path());
        assert_eq!(fs::read_to_string(&paths.instance).unwrap(), "<Root>\n</Root>\n");
        assert_eq!(fs::read_to_string(&paths.schema).unwrap(), "[]\n");
    }

    #[test]
    fn test_write_replaces_existing_files() {
        let temp = tempdir().unwrap();
        let output = OutputConfig::new(temp.path()).with_schema_file("schema.json");
        fs::write(output.schema_path(), "stale").unwrap();

        artifacts().write_to(&output).unwrap();

        assert_eq!(fs::read_to_string(output.schema_path()).unwrap(), "[]\n");
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let temp = tempdir().unwrap();
        let output = OutputConfig::new(temp.path());
        artifacts().write_to(&output).unwrap();

        let mut names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(names, vec!["config.xml", "meta.json"]);
    }

    #[test]
    fn test_unwritable_destination() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let err = artifacts().write_to(&OutputConfig::new(&blocker)).unwrap_err();
        assert!(matches!(err, ModelError::Output { .. }));
    }

    #[test]
    fn test_nested_file_name_rejected_before_writing() {
        let temp = tempdir().unwrap();
        let output = OutputConfig::new(temp.path()).with_schema_file("missing/meta.json");

        let err = artifacts().write_to(&output).unwrap_err();

        assert!(matches!(err, ModelError::InvalidOutputFile { .. }));
        assert!(!output.instance_path().exists());
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_shared_file_name_rejected() {
        let temp = tempdir().unwrap();
        let output = OutputConfig::new(temp.path()).with_schema_file("config.xml");

        let err = artifacts().write_to(&output).unwrap_err();

        assert!(matches!(err, ModelError::InvalidOutputFile { .. }));
        assert!(!output.instance_path().exists());
    }

    #[test]
    fn test_failed_schema_write_removes_instance() {
        let temp = tempdir().unwrap();
        let output = OutputConfig::new(temp.path());
        fs::create_dir(output.schema_path()).unwrap();

        let err = artifacts().write_to(&output).unwrap_err();

        match err {
            ModelError::Output { path, .. } => assert_eq!(path, output.schema_path()),
            other => panic!("Expected output error, got {other:?}"),
        }
        assert!(!output.instance_path().exists());
        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["meta.json"]);
    }
}
