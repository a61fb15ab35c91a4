use crate::error::ModelError;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes model weights in a compact binary encoding.
pub fn save_weights<T: Serialize>(path: impl AsRef<Path>, weights: &T) -> Result<(), ModelError> {
    let mut writer = BufWriter::new(File::create(path)?);
    bincode::serialize_into(&mut writer, weights)?;
    writer.flush()?;
    Ok(())
}

pub fn load_weights<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ModelError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(bincode::deserialize_from(reader)?)
}
