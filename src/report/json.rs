//! JSON report export

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Pretty-prints with 2-space indentation, keeping key order and non-ASCII text
pub fn render<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Exports any serializable value as a JSON file
pub fn export<T: Serialize + ?Sized>(data: &T, output_path: &Path) -> Result<()> {
    std::fs::write(output_path, render(data)?)?;
    info!("Data saved to {}", output_path.display());
    Ok(())
}

/// Loads a JSON document as a generic mapping
pub fn load(input_path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(input_path)?;
    Ok(serde_json::from_str(&content)?)
}
