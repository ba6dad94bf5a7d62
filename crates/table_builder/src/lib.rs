//! Table Builder Library
//!
//! Pipe-delimited outcome/time tables → validated `TableBundle`
//! → MessagePack → LZ4 → SHA-256 checksum

pub mod rows;

use anyhow::{Context, Result};
use gridiron_core::models::{DefenseScheme, OffenseScheme};
use gridiron_core::table::TableBundle;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub use rows::{
    load_outcome_table, load_teams, load_time_table, read_outcome_table, read_teams,
    read_time_table, ParseStats, TeamIndex,
};

const ALL_OFFENSES: [OffenseScheme; 5] = [
    OffenseScheme::Spread,
    OffenseScheme::Pro,
    OffenseScheme::Flexbone,
    OffenseScheme::Air,
    OffenseScheme::Pistol,
];

const ALL_DEFENSES: [DefenseScheme; 5] = [
    DefenseScheme::ThreeFour,
    DefenseScheme::FourThree,
    DefenseScheme::FiveTwo,
    DefenseScheme::FourFour,
    DefenseScheme::ThreeThreeFive,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub schema_version: String,
    /// SHA-256 of the cache file, hex
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
    /// MessagePack size before compression
    pub original_size: u64,
    pub compressed_size: u64,
    pub compression_ratio: f64,
    pub outcome_tables: usize,
    pub time_rows: usize,
    /// Playbook combinations no outcome table covers
    pub missing_tables: Vec<String>,
}

/// Load both tables from their row files and check them
pub fn load_bundle(outcomes: &Path, times: &Path) -> Result<TableBundle> {
    let (outcomes, _) = load_outcome_table(outcomes)?;
    let (times, _) = load_time_table(times)?;
    Ok(TableBundle { outcomes, times })
}

/// Table keys a game between any two playbooks could need but the bundle lacks
pub fn missing_tables(bundle: &TableBundle) -> Vec<String> {
    bundle.outcomes.missing_tables(&ALL_OFFENSES, &ALL_DEFENSES)
}

/// Build a validated cache from outcome and time row files
pub fn build_table_cache(
    outcomes: &Path,
    times: &Path,
    output: &Path,
    schema_version: &str,
) -> Result<CacheMetadata> {
    let bundle = load_bundle(outcomes, times)?;
    let missing = missing_tables(&bundle);
    if !missing.is_empty() {
        log::warn!("{} outcome tables missing, first: {}", missing.len(), missing[0]);
    }

    let msgpack = rmp_serde::to_vec_named(&bundle).context("Failed to serialize to MessagePack")?;
    let original_size = msgpack.len() as u64;

    let compressed = lz4_flex::compress_prepend_size(&msgpack);
    let compressed_size = compressed.len() as u64;

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = format!("{:x}", hasher.finalize());

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output, &compressed)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;
    log::info!("Wrote table cache {} ({} bytes)", output.display(), compressed_size);

    Ok(CacheMetadata {
        schema_version: schema_version.to_string(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        original_size,
        compressed_size,
        compression_ratio: compressed_size as f64 / original_size.max(1) as f64,
        outcome_tables: bundle.outcomes.table_count(),
        time_rows: bundle.times.len(),
        missing_tables: missing,
    })
}

pub fn verify_cache(cache_file: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(cache_file)
        .with_context(|| format!("Failed to read cache file: {}", cache_file.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let actual = format!("{:x}", hasher.finalize());

    Ok(actual == expected_checksum)
}

/// Decode a cache back into tables. Range tables are re-validated on the way in.
pub fn load_table_cache(cache_file: &Path) -> Result<TableBundle> {
    let compressed = fs::read(cache_file)
        .with_context(|| format!("Failed to read cache file: {}", cache_file.display()))?;

    let msgpack =
        lz4_flex::decompress_size_prepended(&compressed).context("Failed to decompress LZ4")?;

    let bundle: TableBundle =
        rmp_serde::from_slice(&msgpack).context("Failed to deserialize MessagePack")?;

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridiron_core::models::{PlayResult, PlayType};
    use gridiron_core::table::TimeProvider;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn write_rows(rows: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(rows.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_build_verify_load() -> Result<()> {
        let outcomes = write_rows(
            "run|pro|4-3|0-100|0-750|gain|4\n\
             run|pro|4-3|0-100|751-1500|gain|-1\n\
             punt|||0-100|0-1500|kick|40\n",
        )?;
        let times = write_rows("run|gain|0|6\npunt|kick|40|9\n")?;
        let dir = TempDir::new()?;
        let output = dir.path().join("cache").join("tables.msgpack.lz4");

        let meta = build_table_cache(outcomes.path(), times.path(), &output, "v1")?;
        assert_eq!(meta.schema_version, "v1");
        assert_eq!(meta.outcome_tables, 2);
        assert_eq!(meta.time_rows, 2);
        assert!(meta.missing_tables.contains(&"fieldGoal".to_string()));
        assert!(verify_cache(&output, &meta.checksum)?);
        assert!(!verify_cache(&output, "00")?);

        let loaded = load_table_cache(&output)?;
        assert_eq!(loaded, load_bundle(outcomes.path(), times.path())?);
        assert_eq!(loaded.times.play_seconds(PlayType::Punt, PlayResult::Kick, Some(38)), Some(9));
        Ok(())
    }

    #[test]
    fn test_invalid_rows_never_reach_cache() -> Result<()> {
        let outcomes = write_rows("run|pro|4-3|0-100|0-700|gain|4\n")?;
        let times = write_rows("run|gain|0|6\n")?;
        let dir = TempDir::new()?;
        let output = dir.path().join("tables.msgpack.lz4");

        assert!(build_table_cache(outcomes.path(), times.path(), &output, "v1").is_err());
        assert!(!output.exists());
        Ok(())
    }

    #[test]
    fn test_corrupt_cache_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let output = dir.path().join("garbage.lz4");
        fs::write(&output, b"\x05\x00\x00\x00garbage")?;
        assert!(load_table_cache(&output).is_err());
        Ok(())
    }
}
