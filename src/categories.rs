use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::files;

/// Directorio de categorías: cada fichero `*.json` (también en subcarpetas)
/// es una categoría. Mantiene una lista de nombres relativos cacheada que se
/// refresca en cada mutación.
pub struct CategoryStore {
    root: PathBuf,
    cache: Option<Vec<String>>,
}

impl CategoryStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root, cache: None }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Nombres relativos de todas las categorías, ordenados.
    pub fn list(&mut self) -> Vec<String> {
        if self.cache.is_none() {
            self.refresh();
        }
        self.cache
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .filter(|name| name.ends_with(".json"))
            .cloned()
            .collect()
    }

    pub fn refresh(&mut self) -> Vec<String> {
        let mut names = Vec::new();
        collect_json_files(&self.root, &self.root, &mut names);
        names.sort();
        names.dedup();
        self.cache = Some(names.clone());
        names
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Crea una categoría vacía `folder/name.json` (folder opcional).
    pub fn create(&mut self, folder: &str, name: &str) -> Result<PathBuf, String> {
        if !folder.is_empty() && !valid_name(folder) {
            return Err("Invalid folder name. Please avoid special characters.".into());
        }
        if !valid_name(name) {
            return Err("Invalid file name. Please avoid special characters.".into());
        }

        let file_name = ensure_json_ext(name);
        let path = if folder.is_empty() {
            self.root.join(&file_name)
        } else {
            self.root.join(folder).join(&file_name)
        };
        if !files::save_json(&path, &Value::Array(Vec::new())) {
            return Err(format!("Could not create category file: {}", path.display()));
        }
        self.refresh();
        Ok(path)
    }

    /// Renombra una categoría dentro de su carpeta. `overwrite` controla si
    /// se permite pisar un fichero existente.
    pub fn rename(&mut self, old_rel: &str, new_name: &str, overwrite: bool) -> Result<PathBuf, String> {
        if !valid_name(new_name) {
            return Err("Invalid file name. Please avoid special characters.".into());
        }

        let old_path = self.root.join(old_rel);
        let stem = Path::new(new_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(new_name);
        let new_file = format!("{stem}.json");
        let new_path = old_path
            .parent()
            .map(|dir| dir.join(&new_file))
            .unwrap_or_else(|| self.root.join(&new_file));

        if new_path.exists() && !overwrite {
            return Err(format!("File '{new_file}' already exists."));
        }
        fs::rename(&old_path, &new_path).map_err(|e| format!("Error renaming file: {e}"))?;
        self.refresh();
        Ok(new_path)
    }

    pub fn delete(&mut self, rel: &str) -> Result<(), String> {
        let path = self.root.join(rel);
        fs::remove_file(&path).map_err(|e| format!("Error deleting file: {e}"))?;
        self.refresh();
        Ok(())
    }

    /// Registra un fichero recién escrito sin re-escanear todo el árbol.
    pub fn add(&mut self, path: &Path) {
        let Some(cache) = self.cache.as_mut() else {
            return;
        };
        let rel = relative_name(&self.root, path);
        if !cache.contains(&rel) {
            cache.push(rel);
            cache.sort();
        }
    }
}

/// Lista los ficheros CSV (nombre simple, sin recursión) de un directorio.
pub fn csv_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.ends_with(".csv"))
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

pub fn valid_name(s: &str) -> bool {
    !s.trim().is_empty()
        && !s.chars().any(|c| matches!(c, '<' | '>' | ':' | '"' | '|' | '?' | '*'))
}

fn ensure_json_ext(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);
        format!("{stem}.json")
    }
}

fn collect_json_files(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_json_files(root, &path, out);
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            out.push(relative_name(root, &path));
        }
    }
}

fn relative_name(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
