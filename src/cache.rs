use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::files;

// Cada cuántas lecturas se purgan entradas de ficheros desaparecidos.
const PRUNE_INTERVAL: u32 = 100;

struct CacheEntry {
    mtime: SystemTime,
    data: Vec<Value>,
}

/// Caché de bancos de preguntas por ruta absoluta + mtime.
///
/// La entrada se invalida sola cuando el fichero cambia en disco, así que
/// guardar con `files::save_json` y volver a pedir la ruta ya devuelve los
/// datos nuevos. Es propiedad de la capa de E/S y se inyecta donde haga
/// falta; no hay estado global.
pub struct QuestionCache {
    entries: HashMap<PathBuf, CacheEntry>,
    lookups: u32,
}

impl QuestionCache {
    pub fn new() -> Self {
        Self { entries: HashMap::new(), lookups: 0 }
    }

    /// Devuelve el contenido del fichero, desde caché si el mtime no cambió.
    /// Un fichero ilegible o inexistente devuelve lista vacía.
    pub fn get(&mut self, path: &Path) -> Vec<Value> {
        self.lookups += 1;
        if self.lookups >= PRUNE_INTERVAL {
            self.prune();
            self.lookups = 0;
        }

        let abs = absolute(path);
        let mtime = match fs::metadata(&abs).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            Err(_) => return Vec::new(),
        };

        if let Some(entry) = self.entries.get(&abs) {
            if entry.mtime == mtime {
                return entry.data.clone();
            }
        }

        let data = files::load_json(&abs);
        log::debug!("question cache refreshed for {}", abs.display());
        self.entries.insert(abs, CacheEntry { mtime, data: data.clone() });
        data
    }

    /// Descarta las entradas cuyo fichero ya no existe.
    pub fn prune(&mut self) {
        self.entries.retain(|path, _| path.exists());
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.entries.contains_key(&absolute(path))
    }
}

impl Default for QuestionCache {
    fn default() -> Self {
        Self::new()
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
