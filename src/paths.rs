use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "quizdeck";

/// Rutas de datos de la aplicación:
///  - Linux:   $XDG_DATA_HOME/quizdeck o ~/.local/share/quizdeck
///  - macOS:   ~/Library/Application Support/quizdeck
///  - Windows: %LOCALAPPDATA%\quizdeck
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub categories_dir: PathBuf,
    pub csv_dir: PathBuf,
    pub scores_file: PathBuf,
}

impl AppPaths {
    pub fn resolve() -> Self {
        Self::under(default_data_dir())
    }

    pub fn under(data_dir: PathBuf) -> Self {
        let categories_dir = data_dir.join("categories");
        let csv_dir = data_dir.join("csv");
        let scores_file = data_dir.join("scores.json");
        Self { data_dir, categories_dir, csv_dir, scores_file }
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        fs::create_dir_all(&self.categories_dir)?;
        fs::create_dir_all(&self.csv_dir)?;
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Migra con cuidado restos de instalaciones viejas:
    /// `scores.json` en $HOME o en el directorio actual, y `./categories/*.json`.
    /// Nunca pisa ficheros ya existentes y nunca rompe el arranque.
    pub fn migrate_legacy(&self) {
        let mut legacy_scores = vec![PathBuf::from("scores.json")];
        if let Some(home) = home_dir() {
            legacy_scores.insert(0, home.join("scores.json"));
        }
        for src in legacy_scores {
            if src.exists() && !self.scores_file.exists() {
                if let Err(e) = fs::rename(&src, &self.scores_file) {
                    log::warn!("could not migrate {}: {}", src.display(), e);
                }
            }
        }

        let legacy_categories = Path::new("categories");
        if legacy_categories.is_dir() {
            let entries = match fs::read_dir(legacy_categories) {
                Ok(entries) => entries,
                Err(_) => return,
            };
            for entry in entries.flatten() {
                let src = entry.path();
                if src.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let Some(name) = src.file_name() else { continue };
                let target = self.categories_dir.join(name);
                if !target.exists() {
                    if let Err(e) = fs::rename(&src, &target) {
                        log::warn!("could not migrate {}: {}", src.display(), e);
                    }
                }
            }
        }
    }
}

fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        env::var_os("LOCALAPPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    } else if cfg!(target_os = "macos") {
        home_dir()
            .map(|h| h.join("Library").join("Application Support"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    } else {
        env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| home_dir().map(|h| h.join(".local").join("share")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }
}

fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(target_os = "windows") { "USERPROFILE" } else { "HOME" };
    env::var_os(var).map(PathBuf::from)
}
