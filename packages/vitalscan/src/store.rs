use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const HEALTH_MODEL_FILE: &str = "health_model.bin";
pub const SCALER_FILE: &str = "scaler.json";
pub const IMAGE_MODEL_FILE: &str = "image_model.bin";

///
/// Cached model artifacts under a single directory.
/// Files are written once and reused, nothing is invalidated.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ModelStore { root: root.into() }
    }

    /// Creates the directory if it does not exist.
    pub fn open(root: impl Into<PathBuf>) -> io::Result<Self> {
        let store = ModelStore::new(root);
        fs::create_dir_all(&store.root)?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn health_model_path(&self) -> PathBuf {
        self.root.join(HEALTH_MODEL_FILE)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.root.join(SCALER_FILE)
    }

    pub fn image_model_path(&self) -> PathBuf {
        self.root.join(IMAGE_MODEL_FILE)
    }

    /// The health model is only reused when its scaler is cached too.
    pub fn has_health_model(&self) -> bool {
        self.health_model_path().exists() && self.scaler_path().exists()
    }

    pub fn has_image_model(&self) -> bool {
        self.image_model_path().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("a").join("models");

        let store = ModelStore::open(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(store.scaler_path(), root.join("scaler.json"));
        assert!(!store.has_health_model());
        assert!(!store.has_image_model());
    }

    #[test]
    fn health_model_needs_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::open(dir.path()).unwrap();

        fs::write(store.health_model_path(), b"weights").unwrap();
        assert!(!store.has_health_model());

        fs::write(store.scaler_path(), b"{}").unwrap();
        assert!(store.has_health_model());
    }
}
