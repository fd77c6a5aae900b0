//! Country repository backed by an organisation unit metadata export

use crate::model::Country;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read metadata file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse metadata file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("organisation unit not found: {0}")]
    NotFound(String),
}

/// Read access to countries and their sub-units
pub trait CountryRepository: Send + Sync {
    /// Countries with the given ids, flat and in request order. Unknown ids are skipped.
    fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Country>, RepositoryError>;

    /// Trees rooted at `root_ids`, or at every level 1 unit when empty
    fn get_roots(&self, root_ids: &[String]) -> Result<Vec<Country>, RepositoryError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Metadata export format
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataExport {
    #[serde(default)]
    organisation_units: Vec<OrgUnitRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnitRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    pub level: u32,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub parent: Option<ParentRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentRef {
    pub id: String,
}

/// Organisation units indexed by id and by parent
#[derive(Debug, Default)]
struct OrgUnitIndex {
    units: HashMap<String, OrgUnitRecord>,
    children: HashMap<String, Vec<String>>,
}

impl OrgUnitIndex {
    fn build(records: Vec<OrgUnitRecord>) -> Self {
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for record in &records {
            if let Some(parent) = &record.parent {
                children.entry(parent.id.clone()).or_default().push(record.id.clone());
            }
        }

        let units: HashMap<String, OrgUnitRecord> =
            records.into_iter().map(|r| (r.id.clone(), r)).collect();

        for ids in children.values_mut() {
            ids.sort_by(|a, b| {
                let name = |id: &String| units.get(id).map(|u| u.name.clone()).unwrap_or_default();
                name(a).cmp(&name(b))
            });
        }

        Self { units, children }
    }

    fn flat(&self, record: &OrgUnitRecord) -> Country {
        Country {
            id: record.id.clone(),
            name: record.name.clone(),
            code: record.code.clone(),
            level: record.level,
            last_updated: record.last_updated.clone(),
            children: Vec::new(),
        }
    }

    fn tree(&self, record: &OrgUnitRecord) -> Country {
        let children = self
            .children
            .get(&record.id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.units.get(id))
            // guards against cyclic parent links
            .filter(|child| child.level > record.level)
            .map(|child| self.tree(child))
            .collect();

        Country {
            children,
            ..self.flat(record)
        }
    }

    fn get_by_ids(&self, ids: &[String]) -> Vec<Country> {
        ids.iter()
            .filter_map(|id| match self.units.get(id) {
                Some(record) => Some(self.flat(record)),
                None => {
                    log::warn!("unknown organisation unit {}", id);
                    None
                }
            })
            .collect()
    }

    fn get_roots(&self, root_ids: &[String]) -> Result<Vec<Country>, RepositoryError> {
        if root_ids.is_empty() {
            let mut roots: Vec<&OrgUnitRecord> =
                self.units.values().filter(|u| u.level == 1).collect();
            roots.sort_by(|a, b| a.name.cmp(&b.name));
            return Ok(roots.into_iter().map(|r| self.tree(r)).collect());
        }

        root_ids
            .iter()
            .map(|id| {
                self.units
                    .get(id)
                    .map(|record| self.tree(record))
                    .ok_or_else(|| RepositoryError::NotFound(id.clone()))
            })
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Implementations
// ═══════════════════════════════════════════════════════════════════════════════

/// Repository reading a metadata export file on every query
pub struct JsonCountryRepository {
    path: PathBuf,
}

impl JsonCountryRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load_index(&self) -> Result<OrgUnitIndex, RepositoryError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| RepositoryError::Io {
            path: self.path.clone(),
            source,
        })?;

        let export: MetadataExport =
            serde_json::from_str(&contents).map_err(|source| RepositoryError::Parse {
                path: self.path.clone(),
                source,
            })?;

        log::debug!(
            "loaded {} organisation units from {}",
            export.organisation_units.len(),
            self.path.display()
        );
        Ok(OrgUnitIndex::build(export.organisation_units))
    }
}

impl CountryRepository for JsonCountryRepository {
    fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Country>, RepositoryError> {
        Ok(self.load_index()?.get_by_ids(ids))
    }

    fn get_roots(&self, root_ids: &[String]) -> Result<Vec<Country>, RepositoryError> {
        self.load_index()?.get_roots(root_ids)
    }
}

/// Repository over records held in memory
#[derive(Debug, Default)]
pub struct InMemoryCountryRepository {
    index: OrgUnitIndex,
}

impl InMemoryCountryRepository {
    pub fn new(records: Vec<OrgUnitRecord>) -> Self {
        Self {
            index: OrgUnitIndex::build(records),
        }
    }
}

impl CountryRepository for InMemoryCountryRepository {
    fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Country>, RepositoryError> {
        Ok(self.index.get_by_ids(ids))
    }

    fn get_roots(&self, root_ids: &[String]) -> Result<Vec<Country>, RepositoryError> {
        self.index.get_roots(root_ids)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(id: &str, name: &str, level: u32, parent: Option<&str>) -> OrgUnitRecord {
        OrgUnitRecord {
            id: id.to_string(),
            name: name.to_string(),
            code: None,
            level,
            last_updated: None,
            parent: parent.map(|p| ParentRef { id: p.to_string() }),
        }
    }

    pub(crate) fn sample_repository() -> InMemoryCountryRepository {
        InMemoryCountryRepository::new(vec![
            record("mw", "Malawi", 1, None),
            record("ke", "Kenya", 1, None),
            record("mw-s", "Southern", 2, Some("mw")),
            record("mw-n", "Northern", 2, Some("mw")),
            record("mw-n-1", "Mzimba", 3, Some("mw-n")),
        ])
    }

    #[test]
    fn test_get_by_ids_keeps_request_order_and_skips_unknown() {
        let repo = sample_repository();
        let ids = vec!["mw-n".to_string(), "zz".to_string(), "ke".to_string()];

        let names: Vec<String> = repo
            .get_by_ids(&ids)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Northern", "Kenya"]);
    }

    #[test]
    fn test_default_roots_are_level_one_trees() {
        let repo = sample_repository();
        let roots = repo.get_roots(&[]).unwrap();

        let names: Vec<&str> = roots.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Kenya", "Malawi"]);

        let malawi = &roots[1];
        let regions: Vec<&str> = malawi.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(regions, vec!["Northern", "Southern"]);
        assert_eq!(malawi.children[0].children[0].id, "mw-n-1");
    }

    #[test]
    fn test_unknown_root_is_an_error() {
        let repo = sample_repository();
        let result = repo.get_roots(&["nope".to_string()]);
        assert!(matches!(result, Err(RepositoryError::NotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_json_repository_reads_export() {
        let path = std::env::temp_dir().join(format!("dq-tui-export-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{"organisationUnits": [
                {"id": "mw", "name": "Malawi", "level": 1, "code": "MW", "lastUpdated": "2023-01-02T03:04:05.000"},
                {"id": "mw-n", "name": "Northern", "level": 2, "parent": {"id": "mw"}}
            ]}"#,
        )
        .unwrap();

        let repo = JsonCountryRepository::new(&path);
        let roots = repo.get_roots(&["mw".to_string()]).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(roots[0].code.as_deref(), Some("MW"));
        assert_eq!(roots[0].children[0].name, "Northern");
    }

    #[test]
    fn test_json_repository_missing_file() {
        let repo = JsonCountryRepository::new("/definitely/not/here.json");
        assert!(matches!(repo.get_by_ids(&["x".to_string()]), Err(RepositoryError::Io { .. })));
    }
}
