//! Sample batch files.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// One batch of samples as read from JSON.
///
/// ```json
/// { "positions": [[12.0, 38.5, -9.2], [30.0, 40.1, -8.0]], "values": [14.2, 13.8] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SampleBatch {
    /// `[depth, lat, lon]` per sample.
    pub positions: Vec<[f64; 3]>,

    /// Optional scalar value per sample.
    #[serde(default)]
    pub values: Option<Vec<f64>>,
}

impl SampleBatch {
    /// Parse a batch from a JSON string.
    pub fn from_json(s: &str) -> Result<Self> {
        let batch: SampleBatch =
            serde_json::from_str(s).context("Failed to parse sample batch JSON")?;
        batch.validate()?;
        Ok(batch)
    }

    /// Read a batch from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read samples file {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Invalid samples file {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if let Some(values) = &self.values {
            if values.len() != self.positions.len() {
                bail!(
                    "samples have {} positions but {} values",
                    self.positions.len(),
                    values.len()
                );
            }
        }
        Ok(())
    }

    /// Values as a slice, if present.
    pub fn values(&self) -> Option<&[f64]> {
        self.values.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::temp_file_with;

    #[test]
    fn test_parse_positions_only() {
        let batch = SampleBatch::from_json(r#"{"positions": [[1.0, 2.0, 3.0]]}"#).unwrap();
        assert_eq!(batch.positions, vec![[1.0, 2.0, 3.0]]);
        assert!(batch.values().is_none());
    }

    #[test]
    fn test_parse_with_values() {
        let batch = SampleBatch::from_json(
            r#"{"positions": [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], "values": [0.5, 1.5]}"#,
        )
        .unwrap();
        assert_eq!(batch.values(), Some(&[0.5, 1.5][..]));
    }

    #[test]
    fn test_value_count_mismatch() {
        let err = SampleBatch::from_json(r#"{"positions": [[1.0, 2.0, 3.0]], "values": []}"#)
            .unwrap_err();
        assert!(err.to_string().contains("1 positions but 0 values"));
    }

    #[test]
    fn test_bad_position_width() {
        assert!(SampleBatch::from_json(r#"{"positions": [[1.0, 2.0]]}"#).is_err());
    }

    #[test]
    fn test_from_file() {
        let file = temp_file_with(r#"{"positions": [], "values": []}"#, ".json");
        let batch = SampleBatch::from_file(file.path()).unwrap();
        assert!(batch.positions.is_empty());

        let err = SampleBatch::from_file("/nonexistent/samples.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read samples file"));
    }
}
