//! Layout and menu files on disk

use regex::Regex;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use super::layout::{Field, FileDetails, normalize_layout_keys};
use crate::config::MetadataConfig;
use crate::core::error::MetadataError;

/// Reads layout YAML files from `{layout_dir}/{entity}/` and the menu file
#[derive(Debug, Clone)]
pub struct LayoutRepository {
    layout_dir: PathBuf,
    menu_file: PathBuf,
}

impl LayoutRepository {
    pub fn new(layout_dir: impl Into<PathBuf>, menu_file: impl Into<PathBuf>) -> Self {
        Self {
            layout_dir: layout_dir.into(),
            menu_file: menu_file.into(),
        }
    }

    pub fn from_config(config: &MetadataConfig) -> Self {
        Self::new(&config.layout_dir, &config.menu_file)
    }

    /// The menu file rendered as JSON
    pub async fn menu(&self) -> Result<Value, MetadataError> {
        let content = read(&self.menu_file).await?;
        parse_yaml(&self.menu_file, &content)
    }

    /// One layout of `entity`; `.yaml` is appended to names without it
    pub async fn layout(&self, entity: &str, file_name: Option<&str>) -> Result<Vec<Field>, MetadataError> {
        let entity = checked_name(entity)?;
        let file_name = file_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(MetadataError::BlankFileName)?;
        let file_name = checked_name(file_name)?;
        let file_name = if file_name.contains(".yaml") {
            file_name.to_string()
        } else {
            format!("{file_name}.yaml")
        };

        let path = self.layout_dir.join(entity).join(file_name);
        let content = read(&path).await?;
        let mut raw = parse_yaml(&path, &content)?;
        if raw.is_null() {
            return Ok(Vec::new());
        }
        normalize_layout_keys(&mut raw);
        serde_json::from_value(raw).map_err(|e| MetadataError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Every file under the entity's layout directory, sorted by name
    pub async fn layouts(&self, entity: &str) -> Result<Vec<FileDetails>, MetadataError> {
        let entity = checked_name(entity)?;
        let dir = self.layout_dir.join(entity);
        if !tokio::fs::metadata(&dir).await.is_ok_and(|m| m.is_dir()) {
            return Err(MetadataError::DirectoryNotFound {
                path: dir.display().to_string(),
            });
        }

        let mut files = Vec::new();
        let mut pending = vec![dir];
        while let Some(current) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&current).await.map_err(|e| io_error(&current, e))?;
            while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&current, e))? {
                let file_type = entry.file_type().await.map_err(|e| io_error(&entry.path(), e))?;
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else {
                    files.push(FileDetails::from_file_name(&entry.file_name().to_string_lossy()));
                }
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(entity, count = files.len(), "listed layouts");
        Ok(files)
    }
}

/// Reject names that could escape the layout directory
fn checked_name(name: &str) -> Result<&str, MetadataError> {
    static NAME: OnceLock<Regex> = OnceLock::new();
    let regex = NAME.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\- ]*$").expect("metadata name pattern is valid")
    });

    let name = name.trim();
    if name.contains("..") || !regex.is_match(name) {
        return Err(MetadataError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(name)
}

async fn read(path: &Path) -> Result<String, MetadataError> {
    tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => MetadataError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => io_error(path, e),
    })
}

fn io_error(path: &Path, err: std::io::Error) -> MetadataError {
    MetadataError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

fn parse_yaml(path: &Path, content: &str) -> Result<Value, MetadataError> {
    serde_yaml::from_str(content).map_err(|e| MetadataError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_name() {
        assert_eq!(checked_name(" books ").unwrap(), "books");
        assert!(checked_name("list.yaml").is_ok());
        assert!(checked_name("../secrets").is_err());
        assert!(checked_name("a/b").is_err());
        assert!(checked_name("a\\b").is_err());
        assert!(checked_name(".hidden").is_err());
        assert!(checked_name("").is_err());
    }

    #[tokio::test]
    async fn test_layout_appends_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("books")).unwrap();
        std::fs::write(
            dir.path().join("books/list.yaml"),
            "- FieldName: Title\n  DataType: string\n",
        )
        .unwrap();

        let repo = LayoutRepository::new(dir.path(), dir.path().join("Menu.yaml"));
        let layout = repo.layout("books", Some("list")).await.unwrap();
        assert_eq!(layout, vec![Field::new("string", "Title")]);
        assert_eq!(repo.layout("books", Some("list.yaml")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_file_name() {
        let repo = LayoutRepository::new("./missing", "./missing.yaml");
        assert!(matches!(
            repo.layout("books", Some("  ")).await,
            Err(MetadataError::BlankFileName)
        ));
        assert!(matches!(
            repo.layout("books", None).await,
            Err(MetadataError::BlankFileName)
        ));
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LayoutRepository::new(dir.path(), dir.path().join("Menu.yaml"));
        assert!(matches!(
            repo.layouts("books").await,
            Err(MetadataError::DirectoryNotFound { .. })
        ));
        assert!(matches!(
            repo.menu().await,
            Err(MetadataError::FileNotFound { .. })
        ));
    }
}
