use chrono::{DateTime, Duration, NaiveDateTime, SubsecRound, TimeZone, Utc};
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::models::{NewSnippet, Snippet, SnippetPatch, SnippetRecord};
use crate::error::{Error, Result};

const ID_FORMAT: &str = "%Y%m%d%H%M%S";
const ID_LEN: usize = 20;

/// Snippets keyed by ID, persisted as one TOML file.
///
/// Every operation reads the whole file and every mutation writes it back
/// whole. There is no locking: two processes mutating the same file race
/// and the last writer wins.
pub struct Store {
    path: PathBuf,
    last_id: Option<DateTime<Utc>>,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io_error("snippet directory", parent.to_path_buf(), e))?;
        }
        Ok(Store {
            path,
            last_id: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add(&mut self, fields: NewSnippet) -> Result<String> {
        let snippet = Snippet::new(fields)?;
        let mut snippets = self.load();

        if let Some(alias) = snippet.alias() {
            ensure_alias_free(&snippets, alias, None)?;
        }

        let id = self.next_id(&snippets);
        snippets.insert(id.clone(), snippet);
        self.save(&snippets)?;
        info!("Added snippet {}", id);
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<Snippet> {
        self.load().shift_remove(id)
    }

    /// All snippets in file order.
    pub fn list(&self) -> Vec<(String, Snippet)> {
        self.load().into_iter().collect()
    }

    /// Case-insensitive substring search over command, description, tags and
    /// alias, in file order.
    pub fn search(&self, query: &str) -> Vec<(String, Snippet)> {
        let query = query.to_lowercase();
        self.load()
            .into_iter()
            .filter(|(_, snippet)| snippet.matches(&query))
            .collect()
    }

    /// Applies `patch` to the snippet with `id`. Returns `Ok(false)` when no
    /// such snippet exists.
    pub fn update(&mut self, id: &str, patch: SnippetPatch) -> Result<bool> {
        let mut snippets = self.load();
        let Some(existing) = snippets.get(id) else {
            return Ok(false);
        };

        let updated = existing.patched(patch, Utc::now())?;
        if let Some(alias) = updated.alias() {
            ensure_alias_free(&snippets, alias, Some(id))?;
        }

        snippets.insert(id.to_string(), updated);
        self.save(&snippets)?;
        info!("Updated snippet {}", id);
        Ok(true)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let mut snippets = self.load();
        if snippets.shift_remove(id).is_none() {
            return Ok(false);
        }
        self.save(&snippets)?;
        info!("Deleted snippet {}", id);
        Ok(true)
    }

    pub fn get_snippets_with_aliases(&self) -> Vec<(String, Snippet)> {
        self.load()
            .into_iter()
            .filter(|(_, snippet)| snippet.alias().is_some())
            .collect()
    }

    pub fn find_by_alias(&self, alias: &str) -> Option<(String, Snippet)> {
        self.load()
            .into_iter()
            .find(|(_, snippet)| snippet.alias() == Some(alias))
    }

    /// Reads the whole collection. A missing file is an empty store; an
    /// unreadable or corrupt file is logged and also treated as empty.
    /// Records that fail validation are skipped.
    fn load(&self) -> IndexMap<String, Snippet> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snippet file at {}", self.path.display());
                return IndexMap::new();
            }
            Err(e) => {
                warn!("Cannot read snippet file {}: {}", self.path.display(), e);
                return IndexMap::new();
            }
        };

        let raw: IndexMap<String, toml::Value> = match toml::from_str(&content) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Cannot parse snippet file {}, treating it as empty: {}",
                    self.path.display(),
                    e
                );
                return IndexMap::new();
            }
        };

        let now = Utc::now();
        let mut snippets = IndexMap::with_capacity(raw.len());
        for (id, value) in raw {
            let snippet = value
                .try_into::<SnippetRecord>()
                .map_err(|e| e.to_string())
                .and_then(|record| Snippet::from_record(record, now).map_err(|e| e.to_string()));
            match snippet {
                Ok(snippet) => {
                    snippets.insert(id, snippet);
                }
                Err(e) => warn!("Skipping invalid snippet {}: {}", id, e),
            }
        }
        snippets
    }

    /// Writes the whole collection to a sibling temp file, then renames it
    /// over the store file.
    fn save(&self, snippets: &IndexMap<String, Snippet>) -> Result<()> {
        let records: IndexMap<&str, SnippetRecord> = snippets
            .iter()
            .map(|(id, snippet)| (id.as_str(), snippet.to_record()))
            .collect();
        let content = toml::to_string_pretty(&records).map_err(|e| Error::Serialize {
            path: self.path.clone(),
            original: e,
        })?;

        let mut temp_name = self.path.file_name().unwrap_or_default().to_os_string();
        temp_name.push(".tmp");
        let temp_path = self.path.with_file_name(temp_name);

        {
            let mut file = fs::File::create(&temp_path)
                .map_err(|e| Error::io_error("temporary snippet", temp_path.clone(), e))?;
            file.write_all(content.as_bytes())
                .map_err(|e| Error::io_error("temporary snippet", temp_path.clone(), e))?;
            file.sync_all()
                .map_err(|e| Error::io_error("temporary snippet", temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| Error::io_error("snippet", self.path.clone(), e))?;
        debug!("Wrote {} snippets to {}", snippets.len(), self.path.display());
        Ok(())
    }

    /// Microsecond timestamp IDs, `YYYYMMDDHHMMSSffffff`.
    ///
    /// Each new ID is strictly greater than every ID already in the
    /// collection and every ID this store issued, so IDs stay unique and sort
    /// in creation order even within one clock tick.
    fn next_id(&mut self, snippets: &IndexMap<String, Snippet>) -> String {
        let floor = snippets
            .keys()
            .filter_map(|id| parse_id(id))
            .chain(self.last_id)
            .max();

        let mut candidate = Utc::now().trunc_subsecs(6);
        if let Some(floor) = floor {
            if candidate <= floor {
                candidate = floor + Duration::microseconds(1);
            }
        }

        let mut id = format_id(candidate);
        while snippets.contains_key(&id) {
            candidate += Duration::microseconds(1);
            id = format_id(candidate);
        }

        self.last_id = Some(candidate);
        id
    }
}

fn ensure_alias_free(
    snippets: &IndexMap<String, Snippet>,
    alias: &str,
    own_id: Option<&str>,
) -> Result<()> {
    let owner = snippets
        .iter()
        .find(|(id, snippet)| Some(id.as_str()) != own_id && snippet.alias() == Some(alias));
    match owner {
        Some((id, _)) => Err(Error::AliasInUse {
            alias: alias.to_string(),
            id: id.clone(),
        }),
        None => Ok(()),
    }
}

fn format_id(at: DateTime<Utc>) -> String {
    format!("{}{:06}", at.format(ID_FORMAT), at.timestamp_subsec_micros())
}

fn parse_id(id: &str) -> Option<DateTime<Utc>> {
    if id.len() != ID_LEN || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (seconds, micros) = id.split_at(ID_LEN - 6);
    let naive = NaiveDateTime::parse_from_str(seconds, ID_FORMAT).ok()?;
    let micros: i64 = micros.parse().ok()?;
    Some(Utc.from_utc_datetime(&naive) + Duration::microseconds(micros))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_format_round_trip() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 8, 5, 7).unwrap() + Duration::microseconds(42);
        let id = format_id(at);
        assert_eq!(id, "20240309080507000042");
        assert_eq!(parse_id(&id), Some(at));
    }

    #[test]
    fn test_parse_id_rejects_foreign_keys() {
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("2024030908050700004x"), None);
        assert_eq!(parse_id("20241399080507000042"), None);
    }

    #[test]
    fn test_next_id_is_after_existing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::new(dir.path().join("snippets.toml")).unwrap();

        let mut snippets = IndexMap::new();
        let future = "29991231235959999999".to_string();
        snippets.insert(
            future.clone(),
            Snippet::new(NewSnippet::new("echo later")).unwrap(),
        );

        let first = store.next_id(&snippets);
        assert!(first > future);
        let second = store.next_id(&snippets);
        assert!(second > first);
    }
}
