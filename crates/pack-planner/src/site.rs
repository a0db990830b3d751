//! Loading of the exported site-data directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pack_core::model::{CatalogItem, EnrichedPack};
use pack_core::{Catalog, CatalogError};
use thiserror::Error;
use tracing::{Level, event};

pub const PACKS_FILE: &str = "packs.json";
pub const OVERALL_RANKING_FILE: &str = "pack_ranking_overall.json";
pub const CATEGORY_RANKING_FILE: &str = "pack_ranking_by_category.json";
pub const ITEMS_FILE: &str = "items.json";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no packs found at {path:?}; export the site data first")]
    MissingPacks { path: PathBuf },
    #[error("failed to read {path:?}: {source}")]
    Read {
        #[source]
        source: io::Error,
        path: PathBuf,
    },
    #[error("invalid site data in {dir:?}: {source}")]
    Catalog {
        dir: PathBuf,
        #[source]
        source: CatalogError,
    },
}

/// The parsed contents of one site-data directory.
#[derive(Debug, Clone)]
pub struct SiteData {
    pub dir: PathBuf,
    pub catalog: Catalog,
}

impl SiteData {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, SiteError> {
        let dir = dir.as_ref().to_path_buf();

        let packs_path = dir.join(PACKS_FILE);
        let packs = match fs::read_to_string(&packs_path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SiteError::MissingPacks { path: packs_path });
            }
            Err(source) => {
                return Err(SiteError::Read {
                    source,
                    path: packs_path,
                });
            }
        };

        let overall = read_optional(&dir.join(OVERALL_RANKING_FILE))?;
        let by_category = read_optional(&dir.join(CATEGORY_RANKING_FILE))?;
        let items = read_optional(&dir.join(ITEMS_FILE))?;

        let catalog = Catalog::from_json(
            &packs,
            overall.as_deref(),
            by_category.as_deref(),
            items.as_deref(),
        )
        .map_err(|source| SiteError::Catalog {
            dir: dir.clone(),
            source,
        })?;

        event!(
            target: "pack_planner::site",
            Level::INFO,
            dir = %dir.display(),
            packs = catalog.packs.len(),
            ranked = catalog.overall.len(),
            categories = catalog.by_category.len(),
            items = catalog.items.len(),
        );

        Ok(Self { dir, catalog })
    }

    pub fn packs(&self) -> Vec<EnrichedPack> {
        self.catalog.enriched()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.catalog.items
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, SiteError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            event!(
                target: "pack_planner::site",
                Level::WARN,
                path = %path.display(),
                "optional site file missing"
            );
            Ok(None)
        }
        Err(source) => Err(SiteError::Read {
            source,
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_packs_file_is_reported() {
        let dir = tempdir().expect("temp dir");
        let err = SiteData::load(dir.path()).expect_err("no packs");
        assert!(matches!(err, SiteError::MissingPacks { .. }));
    }

    #[test]
    fn optional_files_may_be_absent() {
        let dir = tempdir().expect("temp dir");
        fs::write(
            dir.path().join(PACKS_FILE),
            r#"{"packs": [{"id": "a", "name": "A", "price": 5, "value": 20}]}"#,
        )
        .expect("write packs");

        let site = SiteData::load(dir.path()).expect("site loads");
        let packs = site.packs();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].rank_overall, None);
        assert!(site.items().is_empty());
    }

    #[test]
    fn malformed_ranking_is_a_catalog_error() {
        let dir = tempdir().expect("temp dir");
        fs::write(dir.path().join(PACKS_FILE), r#"{"packs": []}"#).expect("write packs");
        fs::write(dir.path().join(OVERALL_RANKING_FILE), "{oops").expect("write ranking");
        let err = SiteData::load(dir.path()).expect_err("bad ranking");
        assert!(matches!(err, SiteError::Catalog { .. }));
    }
}
