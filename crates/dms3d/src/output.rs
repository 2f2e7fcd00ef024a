use std::fs;
use std::io::{stdout, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

/// Serializes records as a pretty JSON array.
pub fn to_json<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes records to `path`, or to stdout if there is none.
pub fn write_json<T: Serialize>(records: &[T], path: Option<&Path>) -> Result<()> {
    let json = to_json(records)?;
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            info!("Wrote {} records to {}.", records.len(), path.display());
        }
        None => {
            let mut out = stdout().lock();
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use d3_reports::BasePairRecord;
    use d3_reports::PairType;

    #[test]
    fn test_write_json_file() {
        let record = BasePairRecord {
            structure_name: "construct_1".to_string(),
            motif_id: "GG_CC".to_string(),
            pair_type: PairType::NonWatsonCrick,
            residue_index_1: 5,
            residue_index_2: 6,
            base_pair_code: "GG".to_string(),
            parameters: Default::default(),
        };
        let dir = std::env::temp_dir().join(format!("dms3d_out_{}", std::process::id()));
        let path = dir.join("nested/all_bp_details.json");
        write_json(&[record.clone()], Some(path.as_path())).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        let back: Vec<BasePairRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, vec![record]);
        assert!(text.contains("\"r_type\": \"NON-WC\""));
    }
}
