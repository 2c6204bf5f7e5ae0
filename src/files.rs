use serde_json::Value;
use std::fs;
use std::path::Path;

/// Carga un array JSON desde disco. Cualquier error deja una lista vacía;
/// para el detalle del error usa `load_json_result`.
pub fn load_json(path: &Path) -> Vec<Value> {
    load_json_result(path).0
}

/// Carga un array JSON desde disco devolviendo `(datos, error)`.
///
/// Un JSON válido que no sea un array se normaliza a lista vacía sin error,
/// para que el resto de la app no tenga que distinguir formas raras.
pub fn load_json_result(path: &Path) -> (Vec<Value>, Option<String>) {
    if !path.exists() {
        return (Vec::new(), Some(format!("File not found: {}", path.display())));
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            let msg = format!("Error reading {}: {}", path.display(), e);
            println!("⚠️ {msg}");
            return (Vec::new(), Some(msg));
        }
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Array(items)) => (items, None),
        Ok(other) => {
            log::warn!(
                "{} holds a JSON {} instead of an array; treating as empty",
                path.display(),
                json_kind(&other)
            );
            (Vec::new(), None)
        }
        Err(e) => {
            let msg = format!("Invalid JSON in {}: {}", path.display(), e);
            println!("⚠️ {msg}");
            (Vec::new(), Some(msg))
        }
    }
}

/// Escribe `data` como JSON legible (UTF-8, no-ASCII sin escapar), creando
/// los directorios padre si hace falta. Devuelve false tras reportar el
/// fallo; nunca lanza.
pub fn save_json(path: &Path, data: &Value) -> bool {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            if let Err(e) = fs::create_dir_all(dir) {
                println!("⚠️ Error saving file {}: {}", path.display(), e);
                return false;
            }
        }
    }

    let text = match serde_json::to_string_pretty(data) {
        Ok(text) => text,
        Err(e) => {
            println!("⚠️ Error serializing data to JSON for {}: {}", path.display(), e);
            return false;
        }
    };

    if let Err(e) = fs::write(path, text) {
        println!("⚠️ Error saving file {}: {}", path.display(), e);
        return false;
    }
    true
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
