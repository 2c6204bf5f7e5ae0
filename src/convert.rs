use csv::StringRecord;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("JSON is empty")]
    EmptyJson,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Dialecto tabular, decidido UNA vez por fichero mirando la cabecera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvDialect {
    Normal,
    /// Estructuras anidadas repartidas en columnas `a/b/c`
    /// (`wrong_answers/0`, `pairs/left/1`, `pairs/answers/a`, ...).
    Flattened,
}

impl CsvDialect {
    pub fn detect(headers: &StringRecord) -> Self {
        if headers.iter().any(|h| h.contains('/')) {
            CsvDialect::Flattened
        } else {
            CsvDialect::Normal
        }
    }
}

// Orden fijo de columnas de exportación; `pairs` lleva el subobjeto completo
// serializado para que el viaje de vuelta no pierda nada.
const COLUMNS: [&str; 8] = [
    "type",
    "question",
    "correct",
    "wrong_answers",
    "left",
    "right",
    "answers",
    "pairs",
];

/// Convierte un CSV de preguntas en un array JSON.
///
/// Las celdas con sintaxis rota se recuperan con la mejor interpretación
/// posible (o colección vacía); una fila mala jamás aborta el fichero.
pub fn csv_to_json(csv_file: &Path, json_file: &Path) -> Result<(), ConvertError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(csv_file)?;
    let headers = reader.headers()?.clone();
    let dialect = CsvDialect::detect(&headers);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::warn!("skipping unreadable CSV row: {e}");
                continue;
            }
        };
        let row = match dialect {
            CsvDialect::Normal => parse_normal_row(&headers, &record),
            CsvDialect::Flattened => parse_flattened_row(&headers, &record),
        };
        rows.push(Value::Object(finalize_row(row)));
    }

    let text = serde_json::to_string_pretty(&Value::Array(rows))?;
    fs::write(json_file, text)?;
    Ok(())
}

/// Exporta un array JSON de preguntas a CSV con el orden de columnas fijo.
/// Un array vacío es el único error estructural propio: sin filas no hay
/// esquema que emitir.
pub fn json_to_csv(json_file: &Path, csv_file: &Path) -> Result<(), ConvertError> {
    let text = fs::read_to_string(json_file)?;
    let rows: Vec<Value> = serde_json::from_str(&text)?;
    if rows.is_empty() {
        return Err(ConvertError::EmptyJson);
    }

    let mut writer = csv::Writer::from_path(csv_file)?;
    writer.write_record(COLUMNS)?;

    let empty = Map::new();
    for row in &rows {
        let obj = row.as_object().unwrap_or(&empty);
        let pairs = obj.get("pairs").and_then(Value::as_object);
        let mut record: Vec<String> = Vec::with_capacity(COLUMNS.len());
        for &col in COLUMNS.iter() {
            let cell = match col {
                "wrong_answers" => join_values(obj.get(col), ","),
                "left" | "right" => match pairs.and_then(|p| p.get(col)) {
                    Some(v) => join_values(Some(v), "|"),
                    None => join_values(obj.get(col), "|"),
                },
                "answers" => pairs
                    .and_then(|p| p.get(col))
                    .or_else(|| obj.get(col))
                    .map(render_mapping)
                    .unwrap_or_default(),
                "pairs" => pairs
                    .map(|p| serde_json::to_string(&Value::Object(p.clone())).unwrap_or_default())
                    .unwrap_or_default(),
                _ => obj.get(col).map(value_to_cell).unwrap_or_default(),
            };
            record.push(cell);
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_normal_row(headers: &StringRecord, record: &StringRecord) -> Map<String, Value> {
    let mut row = Map::new();
    for (idx, key) in headers.iter().enumerate() {
        let cell = record.get(idx).unwrap_or("").trim();
        let value = match key {
            "wrong_answers" => Value::Array(
                parse_wrong_answers(cell).into_iter().map(Value::String).collect(),
            ),
            "left" | "right" => {
                Value::Array(split_pipe(cell).into_iter().map(Value::String).collect())
            }
            "answers" => Value::Object(parse_answers(cell)),
            "pairs" => parse_pairs_cell(cell),
            _ => Value::String(cell.to_string()),
        };
        row.insert(key.to_string(), value);
    }

    // Filas más largas que la cabecera: el desborde se pliega en answers
    // (todo con `:`) o en wrong_answers (nada con `:`).
    let extras: Vec<&str> = record
        .iter()
        .skip(headers.len())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !extras.is_empty() {
        fold_extras(&mut row, &extras);
    }
    row
}

fn parse_flattened_row(headers: &StringRecord, record: &StringRecord) -> Map<String, Value> {
    let mut scalars: Map<String, Value> = Map::new();
    let mut wrong_answers = Vec::new();
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut answers = Map::new();

    for (idx, key) in headers.iter().enumerate() {
        let cell = record.get(idx).unwrap_or("").trim();
        if key.starts_with("wrong_answers/") {
            if !cell.is_empty() {
                wrong_answers.push(Value::String(cell.to_string()));
            }
        } else if key.starts_with("pairs/left/") {
            if !cell.is_empty() {
                left.push(Value::String(cell.to_string()));
            }
        } else if key.starts_with("pairs/right/") {
            if !cell.is_empty() {
                right.push(Value::String(cell.to_string()));
            }
        } else if key.starts_with("pairs/answers/") {
            let sub_key = key.rsplit('/').next().unwrap_or(key);
            if !cell.is_empty() {
                answers.insert(sub_key.to_string(), Value::String(cell.to_string()));
            }
        } else if matches!(key, "type" | "question" | "correct") {
            if !cell.is_empty() {
                scalars.insert(key.to_string(), Value::String(cell.to_string()));
            }
        }
    }

    let mut row = Map::new();
    for key in ["type", "question", "correct"] {
        if let Some(v) = scalars.remove(key) {
            row.insert(key.to_string(), v);
        }
    }
    row.insert("wrong_answers".to_string(), Value::Array(wrong_answers));

    let pairs = if left.is_empty() && right.is_empty() && answers.is_empty() {
        Value::Object(Map::new())
    } else {
        let mut p = Map::new();
        p.insert("left".to_string(), Value::Array(left));
        p.insert("right".to_string(), Value::Array(right));
        p.insert("answers".to_string(), Value::Object(answers));
        Value::Object(p)
    };
    row.insert("pairs".to_string(), pairs);
    row
}

fn finalize_row(mut row: Map<String, Value>) -> Map<String, Value> {
    let is_match = row.get("type").and_then(Value::as_str) == Some("match");
    if is_match {
        let existing = row
            .get("pairs")
            .and_then(Value::as_object)
            .filter(|p| pairs_usable(p))
            .cloned();
        let pairs = match existing {
            Some(p) => normalize_pairs(&p),
            None => {
                let mut p = Map::new();
                p.insert(
                    "left".to_string(),
                    row.get("left").cloned().unwrap_or_else(|| Value::Array(vec![])),
                );
                p.insert(
                    "right".to_string(),
                    row.get("right").cloned().unwrap_or_else(|| Value::Array(vec![])),
                );
                p.insert(
                    "answers".to_string(),
                    row.get("answers").cloned().unwrap_or_else(|| Value::Object(Map::new())),
                );
                p
            }
        };
        row.insert("pairs".to_string(), Value::Object(pairs));
        for key in ["left", "right", "answers", "correct", "wrong_answers"] {
            row.remove(key);
        }
    } else {
        for key in ["pairs", "left", "right", "answers"] {
            row.remove(key);
        }
        if !row.contains_key("wrong_answers") {
            row.insert("wrong_answers".to_string(), Value::Array(vec![]));
        }
    }
    row
}

fn pairs_usable(p: &Map<String, Value>) -> bool {
    let filled = |key: &str| match p.get(key) {
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(m)) => !m.is_empty(),
        _ => false,
    };
    filled("left") || filled("right") || filled("answers")
}

fn normalize_pairs(p: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert(
        "left".to_string(),
        p.get("left").filter(|v| v.is_array()).cloned().unwrap_or_else(|| Value::Array(vec![])),
    );
    out.insert(
        "right".to_string(),
        p.get("right").filter(|v| v.is_array()).cloned().unwrap_or_else(|| Value::Array(vec![])),
    );
    out.insert(
        "answers".to_string(),
        p.get("answers")
            .filter(|v| v.is_object())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())),
    );
    out
}

fn parse_wrong_answers(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    if let Some(items) = parse_list_literal(cell) {
        return items;
    }
    // Plan B: quitar comillas envolventes y partir por comas.
    cell.trim_matches('"')
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Intenta leer la sintaxis de lista estilo Python: `['3', '5']` o
/// `["a", "b"]`. Devuelve `None` si la celda no tiene esa forma.
fn parse_list_literal(cell: &str) -> Option<Vec<String>> {
    let trimmed = cell.trim();
    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for c in inner.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => quote = Some(c),
                ',' => items.push(std::mem::take(&mut current)),
                _ => current.push(c),
            },
        }
    }
    if quote.is_some() {
        return None;
    }
    items.push(current);

    Some(
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn split_pipe(cell: &str) -> Vec<String> {
    cell.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_answers(cell: &str) -> Map<String, Value> {
    let mut out = Map::new();
    if cell.is_empty() {
        return out;
    }
    for pair in cell.split(',') {
        if let Some((k, v)) = pair.split_once(':') {
            out.insert(k.trim().to_string(), Value::String(v.trim().to_string()));
        }
    }
    out
}

fn parse_pairs_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(cell) {
        Ok(v @ Value::Object(_)) => v,
        _ => Value::String(cell.to_string()),
    }
}

fn fold_extras(row: &mut Map<String, Value>, extras: &[&str]) {
    let with_colon = extras.iter().filter(|e| e.contains(':')).count();
    if with_colon == extras.len() {
        if let Some(Value::Object(answers)) = row.get_mut("answers") {
            for extra in extras {
                if let Some((k, v)) = extra.split_once(':') {
                    answers.insert(k.trim().to_string(), Value::String(v.trim().to_string()));
                }
            }
        }
    } else if with_colon == 0 {
        if let Some(Value::Array(wrong)) = row.get_mut("wrong_answers") {
            for extra in extras {
                wrong.push(Value::String(extra.to_string()));
            }
        }
    }
}

fn join_values(v: Option<&Value>, sep: &str) -> String {
    match v {
        Some(Value::Array(items)) => {
            items.iter().map(value_to_cell).collect::<Vec<_>>().join(sep)
        }
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn render_mapping(v: &Value) -> String {
    match v {
        Value::Object(map) => map
            .iter()
            .map(|(k, val)| format!("{k}:{}", value_to_cell(val)))
            .collect::<Vec<_>>()
            .join(","),
        Value::String(s) => s.clone(),
        _ => String::new(),
    }
}

fn value_to_cell(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn tempdir() -> tempfile::TempDir {
        tempfile::TempDir::new().expect("tempdir")
    }

    fn read_json(path: &Path) -> Vec<Value> {
        let text = fs::read_to_string(path).expect("read json");
        serde_json::from_str(&text).expect("parse json")
    }

    #[test]
    fn simple_types_survive_a_round_trip() {
        let dir = tempdir();
        let json_in = dir.path().join("in.json");
        let csv_mid = dir.path().join("mid.csv");
        let json_out = dir.path().join("out.json");

        let original = json!([
            {"type": "multiple", "question": "Capital of France?", "correct": "Paris",
             "wrong_answers": ["Rome", "Berlin", "Madrid"]},
            {"type": "truefalse", "question": "The Sun is a star.", "correct": "True",
             "wrong_answers": ["False"]},
            {"type": "fillin", "question": "Capital of Japan is ____.", "correct": "Tokyo",
             "wrong_answers": []}
        ]);
        fs::write(&json_in, serde_json::to_string_pretty(&original).expect("ser")).expect("write");

        json_to_csv(&json_in, &csv_mid).expect("json -> csv");
        csv_to_json(&csv_mid, &json_out).expect("csv -> json");

        let result = read_json(&json_out);
        let original = original.as_array().expect("array");
        assert_eq!(result.len(), original.len());
        for (orig, back) in original.iter().zip(&result) {
            assert_eq!(orig["type"], back["type"]);
            assert_eq!(orig["question"], back["question"]);
            assert_eq!(orig["correct"], back["correct"]);
            let set = |v: &Value| -> BTreeSet<String> {
                v["wrong_answers"]
                    .as_array()
                    .map(|a| a.iter().filter_map(|x| x.as_str().map(String::from)).collect())
                    .unwrap_or_default()
            };
            assert_eq!(set(orig), set(back));
        }
    }

    #[test]
    fn match_pairs_survive_exactly() {
        let dir = tempdir();
        let json_in = dir.path().join("in.json");
        let csv_mid = dir.path().join("mid.csv");
        let json_out = dir.path().join("out.json");

        let pairs = json!({
            "left": ["A", "B"],
            "right": ["1", "2"],
            "answers": {"a": "1", "b": "2"}
        });
        let original = json!([{"type": "match", "question": "Match!", "pairs": pairs}]);
        fs::write(&json_in, original.to_string()).expect("write");

        json_to_csv(&json_in, &csv_mid).expect("json -> csv");
        csv_to_json(&csv_mid, &json_out).expect("csv -> json");

        let result = read_json(&json_out);
        assert_eq!(result[0]["pairs"], pairs);
        // Las claves planas no vuelven a aparecer en preguntas match.
        let obj = result[0].as_object().expect("object");
        for flat in ["left", "right", "answers", "correct", "wrong_answers"] {
            assert!(!obj.contains_key(flat), "unexpected key {flat}");
        }
    }

    #[test]
    fn flattened_headers_are_detected_and_equivalent() {
        let dir = tempdir();
        let flat_csv = dir.path().join("flat.csv");
        let normal_csv = dir.path().join("normal.csv");
        let flat_json = dir.path().join("flat.json");
        let normal_json = dir.path().join("normal.json");

        fs::write(
            &flat_csv,
            "type,question,pairs/left/0,pairs/left/1,pairs/right/0,pairs/right/1,pairs/answers/a,pairs/answers/b\n\
             match,Match!,A,B,1,2,1,2\n",
        )
        .expect("write");
        fs::write(
            &normal_csv,
            "type,question,correct,wrong_answers,left,right,answers\n\
             match,Match!,,,A|B,1|2,\"a:1,b:2\"\n",
        )
        .expect("write");

        csv_to_json(&flat_csv, &flat_json).expect("flattened");
        csv_to_json(&normal_csv, &normal_json).expect("normal");

        let flat = read_json(&flat_json);
        let normal = read_json(&normal_json);
        assert_eq!(flat[0]["pairs"], normal[0]["pairs"]);
    }

    #[test]
    fn empty_json_refuses_to_export() {
        let dir = tempdir();
        let json_in = dir.path().join("empty.json");
        fs::write(&json_in, "[]").expect("write");

        let err = json_to_csv(&json_in, &dir.path().join("out.csv")).unwrap_err();
        assert!(err.to_string().contains("JSON is empty"));
    }

    #[test]
    fn header_only_csv_yields_empty_array() {
        let dir = tempdir();
        let csv_in = dir.path().join("empty.csv");
        fs::write(&csv_in, "type,question,correct,wrong_answers,left,right,answers\n")
            .expect("write");

        let json_out = dir.path().join("out.json");
        csv_to_json(&csv_in, &json_out).expect("convert");
        assert!(read_json(&json_out).is_empty());
    }

    #[test]
    fn wrong_answers_accepts_list_literal_and_falls_back_to_commas() {
        assert_eq!(parse_wrong_answers("['3','5']"), vec!["3", "5"]);
        assert_eq!(parse_wrong_answers("[\"a\", \"b\"]"), vec!["a", "b"]);
        assert_eq!(parse_wrong_answers("Rome,Berlin, Madrid"), vec!["Rome", "Berlin", "Madrid"]);
        assert_eq!(parse_wrong_answers("\"Rome,Berlin\""), vec!["Rome", "Berlin"]);
        assert!(parse_wrong_answers("").is_empty());
        // Literal roto: ni pánico ni aborto, se reparte por comas.
        assert_eq!(parse_wrong_answers("['sin cerrar"), vec!["['sin cerrar"]);
    }

    #[test]
    fn non_match_rows_drop_pair_keys_and_default_wrong_answers() {
        let dir = tempdir();
        let csv_in = dir.path().join("in.csv");
        fs::write(
            &csv_in,
            "type,question,correct,wrong_answers,left,right,answers\n\
             fillin,Q,Tokyo,,,,\n",
        )
        .expect("write");

        let json_out = dir.path().join("out.json");
        csv_to_json(&csv_in, &json_out).expect("convert");
        let rows = read_json(&json_out);
        let obj = rows[0].as_object().expect("object");
        assert_eq!(obj["wrong_answers"], json!([]));
        for key in ["pairs", "left", "right", "answers"] {
            assert!(!obj.contains_key(key));
        }
    }

    #[test]
    fn overflow_cells_fold_into_wrong_answers() {
        let dir = tempdir();
        let csv_in = dir.path().join("in.csv");
        // La fila tiene más celdas que la cabecera: Berlin y Madrid sobran.
        fs::write(
            &csv_in,
            "type,question,correct,wrong_answers\n\
             multiple,Q,Paris,Rome,Berlin,Madrid\n",
        )
        .expect("write");

        let json_out = dir.path().join("out.json");
        csv_to_json(&csv_in, &json_out).expect("convert");
        let rows = read_json(&json_out);
        assert_eq!(rows[0]["wrong_answers"], json!(["Rome", "Berlin", "Madrid"]));
    }

    #[test]
    fn non_ascii_text_is_not_escaped() {
        let dir = tempdir();
        let csv_in = dir.path().join("in.csv");
        fs::write(
            &csv_in,
            "type,question,correct,wrong_answers\nfillin,Glavni grad BiH?,Sarajevo (čaršija),\n",
        )
        .expect("write");

        let json_out = dir.path().join("out.json");
        csv_to_json(&csv_in, &json_out).expect("convert");
        let text = fs::read_to_string(&json_out).expect("read");
        assert!(text.contains("čaršija"));
        assert!(!text.contains("\\u"));
    }
}
