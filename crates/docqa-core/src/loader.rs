use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::Document;

/// File extensions read as plain text. Anything else needs a converter.
pub const TEXT_EXTENSIONS: [&str; 3] = ["txt", "md", "markdown"];

/// Documents loaded from a directory, plus the files that could not be.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub documents: Vec<Document>,
    pub failures: Vec<(PathBuf, Error)>,
}

#[derive(Debug, Default)]
pub struct DocumentLoader {
    limit: Option<usize>,
}

impl DocumentLoader {
    pub fn new() -> Self { Self::default() }

    /// Only load the first `limit` files (sorted by path).
    pub fn with_limit(limit: usize) -> Self { Self { limit: Some(limit) } }

    pub fn load_directory(&self, data_dir: &Path) -> Result<LoadReport> {
        if !data_dir.is_dir() {
            return Err(Error::Operation(format!("{} is not a directory", data_dir.display())));
        }
        let mut files = self.list_files(data_dir);
        if let Some(limit) = self.limit {
            if files.len() > limit {
                files.truncate(limit);
                info!(limit, "limited to first files");
            }
        }
        let mut report = LoadReport::default();
        for (file_index, file_path) in files.iter().enumerate() {
            debug!(file = %file_path.display(), "loading {}/{}", file_index + 1, files.len());
            match self.load_file(file_path) {
                Ok(doc) => report.documents.push(doc),
                Err(e) => {
                    warn!(file = %file_path.display(), error = %e, "skipping file");
                    report.failures.push((file_path.clone(), e));
                }
            }
        }
        info!(documents = report.documents.len(), failures = report.failures.len(), "loaded {}", data_dir.display());
        Ok(report)
    }

    /// Load one text file. The document id is the file stem, the filename
    /// is the file name. Line endings are normalized to `\n`.
    pub fn load_file(&self, file_path: &Path) -> Result<Document> {
        if !is_text_file(file_path) {
            return Err(Error::UnsupportedFormat(file_path.display().to_string()));
        }
        let content = self.read_file_content(file_path)?;
        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| Error::Operation(format!("no file name in {}", file_path.display())))?;
        let id = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.clone());
        Ok(Document::new(id, filename, normalize_text(&content)))
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        files
    }
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

fn normalize_text(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}
