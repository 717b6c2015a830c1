use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::record::VehicleRecord;

/// Looks up a single listing row by slug. `Ok(None)` means no such listing;
/// `Err` means the store itself failed.
pub trait ListingSource {
    fn fetch_listing(&self, slug: &str) -> Result<Option<VehicleRecord>>;
}

/// Listing rows exported as a JSON array of objects (the joined
/// ad/car/make/model/generation columns, one object per ad).
#[derive(Debug, Clone)]
pub struct JsonListingSource {
    path: PathBuf,
}

impl JsonListingSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ListingSource for JsonListingSource {
    fn fetch_listing(&self, slug: &str) -> Result<Option<VehicleRecord>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read listings: {}", self.path.display()))?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse listings: {}", self.path.display()))?;
        debug!("listing source: {} row(s) in {}", rows.len(), self.path.display());
        for row in rows {
            if row.get("slug").and_then(|value| value.as_str()) != Some(slug) {
                continue;
            }
            let record: VehicleRecord = serde_json::from_value(row)
                .with_context(|| format!("malformed listing row for slug '{}'", slug))?;
            return Ok(Some(record));
        }
        Ok(None)
    }
}

/// In-memory rows, handy for embedding callers and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryListingSource {
    rows: Vec<VehicleRecord>,
}

impl MemoryListingSource {
    pub fn new(rows: Vec<VehicleRecord>) -> Self {
        Self { rows }
    }
}

impl ListingSource for MemoryListingSource {
    fn fetch_listing(&self, slug: &str) -> Result<Option<VehicleRecord>> {
        Ok(self.rows.iter().find(|row| row.slug == slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn finds_row_by_slug() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("listings.json");
        fs::write(
            &path,
            r#"[
                {"slug": "other", "year": 2001},
                {"slug": "toyota-camry-123", "year": 2015, "make_name": "Toyota", "body_id": 3}
            ]"#,
        )
        .expect("write listings");
        let source = JsonListingSource::new(&path);
        let record = source
            .fetch_listing("toyota-camry-123")
            .expect("fetch")
            .expect("row");
        assert_eq!(record.year, Some(2015));
        assert_eq!(record.make_name.as_deref(), Some("Toyota"));
        assert!(source.fetch_listing("missing").expect("fetch").is_none());
    }

    #[test]
    fn unreadable_store_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let source = JsonListingSource::new(dir.path().join("absent.json"));
        assert!(source.fetch_listing("any").is_err());

        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").expect("write");
        assert!(JsonListingSource::new(&path).fetch_listing("any").is_err());
    }

    #[test]
    fn memory_source_matches_exact_slug() {
        let source = MemoryListingSource::new(vec![VehicleRecord::new("a-1")]);
        assert!(source.fetch_listing("a-1").expect("fetch").is_some());
        assert!(source.fetch_listing("a").expect("fetch").is_none());
    }
}
