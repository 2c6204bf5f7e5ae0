use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Tipos de pregunta aceptados.
pub const VALID_TYPES: [&str; 4] = ["multiple", "truefalse", "fillin", "match"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Json,
}

/// Valida formato y contenido de un CSV de preguntas.
/// Lista vacía = fichero válido.
pub fn validate_csv_file(csv_file: &Path) -> Vec<String> {
    let mut errors = Vec::new();

    let mut reader = match csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(csv_file)
    {
        Ok(reader) => reader,
        Err(e) => {
            errors.push(format!("Error reading CSV file: {e}"));
            return errors;
        }
    };

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            errors.push(format!("Error reading CSV file: {e}"));
            return errors;
        }
    };
    if headers.is_empty() {
        errors.push("CSV file is empty or has no headers".to_string());
        return errors;
    }

    // Las cabeceras aplanadas (`pairs/left/0`, ...) se validan tras convertir;
    // aquí sólo el dialecto normal tiene esquema por columnas.
    if headers.iter().any(|h| h.contains('/')) {
        return errors;
    }

    for required in ["type", "question"] {
        if !headers.iter().any(|h| h == required) {
            errors.push(format!("Missing required headers: {required}"));
        }
    }

    for (i, record) in reader.records().enumerate() {
        let row_num = i + 2; // tras la cabecera
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                errors.push(format!("Row {row_num}: unreadable ({e})"));
                continue;
            }
        };
        let row: HashMap<&str, &str> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, c)| (h, c.trim()))
            .collect();
        errors.extend(validate_csv_row(&row, row_num));
    }

    errors
}

fn validate_csv_row(row: &HashMap<&str, &str>, row_num: usize) -> Vec<String> {
    let mut errors = Vec::new();
    let get = |key: &str| row.get(key).copied().unwrap_or("");

    let qtype = get("type").to_lowercase();
    if qtype.is_empty() {
        errors.push(format!("Row {row_num}: 'type' field is required"));
        return errors;
    }
    if get("question").is_empty() {
        errors.push(format!("Row {row_num}: 'question' field is required"));
    }
    if !VALID_TYPES.contains(&qtype.as_str()) {
        errors.push(format!(
            "Row {row_num}: Invalid question type '{qtype}'. Valid types: {}",
            VALID_TYPES.join(", ")
        ));
        return errors;
    }

    match qtype.as_str() {
        "multiple" => {
            if get("correct").is_empty() {
                errors.push(format!("Row {row_num}: 'correct' field is required for multiple choice"));
            }
            if get("wrong_answers").is_empty() {
                errors.push(format!(
                    "Row {row_num}: 'wrong_answers' field is required for multiple choice"
                ));
            }
        }
        "truefalse" => {
            let correct = get("correct").to_lowercase();
            if correct != "true" && correct != "false" {
                errors.push(format!(
                    "Row {row_num}: 'correct' must be 'True' or 'False' for true/false questions"
                ));
            }
            if get("wrong_answers").is_empty() {
                errors.push(format!(
                    "Row {row_num}: 'wrong_answers' field is required for true/false questions"
                ));
            }
        }
        "fillin" => {
            if get("correct").is_empty() {
                errors.push(format!("Row {row_num}: 'correct' field is required for fill-in questions"));
            }
        }
        "match" => {
            let (left, right, answers) = (get("left"), get("right"), get("answers"));
            if left.is_empty() || right.is_empty() || answers.is_empty() {
                errors.push(format!(
                    "Row {row_num}: 'left', 'right', and 'answers' fields are required for matching questions"
                ));
            } else if !answers.split(',').all(|pair| pair.contains(':')) {
                errors.push(format!(
                    "Row {row_num}: 'answers' must be in format 'a:1,b:2' for matching questions"
                ));
            }
        }
        _ => {}
    }

    errors
}

/// Valida formato y contenido de un JSON de preguntas.
pub fn validate_json_file(json_file: &Path) -> Vec<String> {
    let mut errors = Vec::new();

    let text = match fs::read_to_string(json_file) {
        Ok(text) => text,
        Err(e) => {
            errors.push(format!("Error reading JSON file: {e}"));
            return errors;
        }
    };
    let data: Value = match serde_json::from_str(&text) {
        Ok(data) => data,
        Err(e) => {
            errors.push(format!("Invalid JSON syntax: {e}"));
            return errors;
        }
    };
    let Some(items) = data.as_array() else {
        errors.push("JSON file must contain a list of questions".to_string());
        return errors;
    };

    for (i, question) in items.iter().enumerate() {
        errors.extend(validate_json_question(question, i + 1));
    }
    errors
}

fn validate_json_question(question: &Value, q_num: usize) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(obj) = question.as_object() else {
        errors.push(format!("Question {q_num}: must be an object"));
        return errors;
    };

    // El formato legado `q`/`a` se acepta sin más comprobaciones.
    let has_legacy = obj.contains_key("q") && obj.contains_key("a");
    let has_new = obj.contains_key("type") && obj.contains_key("question");
    if has_legacy {
        return errors;
    }
    if !has_new {
        errors.push(format!(
            "Question {q_num}: Missing required fields. Need either 'q'/'a' (legacy) or 'type'/'question' (new format)"
        ));
        return errors;
    }

    let qtype = obj
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_lowercase();
    if !VALID_TYPES.contains(&qtype.as_str()) {
        errors.push(format!(
            "Question {q_num}: Invalid question type '{qtype}'. Valid types: {}",
            VALID_TYPES.join(", ")
        ));
        return errors;
    }

    match qtype.as_str() {
        "multiple" | "truefalse" => {
            if !obj.contains_key("correct") {
                errors.push(format!("Question {q_num}: Missing 'correct' field for {qtype}"));
            } else if qtype == "truefalse" {
                let correct = obj
                    .get("correct")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_lowercase();
                if correct != "true" && correct != "false" {
                    errors.push(format!(
                        "Question {q_num}: 'correct' must be 'True' or 'False' for true/false questions"
                    ));
                }
            }
            match obj.get("wrong_answers") {
                None => errors.push(format!("Question {q_num}: Missing 'wrong_answers' field for {qtype}")),
                Some(v) if !v.is_array() => {
                    errors.push(format!("Question {q_num}: 'wrong_answers' must be a list"));
                }
                _ => {}
            }
        }
        "fillin" => {
            if !obj.contains_key("correct") {
                errors.push(format!("Question {q_num}: Missing 'correct' field for fill-in questions"));
            }
        }
        "match" => match obj.get("pairs") {
            None => errors.push(format!("Question {q_num}: Missing 'pairs' field for matching questions")),
            Some(pairs) => match pairs.as_object() {
                None => errors.push(format!("Question {q_num}: 'pairs' must be a dictionary")),
                Some(pairs) => {
                    for key in ["left", "right", "answers"] {
                        if !pairs.contains_key(key) {
                            errors.push(format!("Question {q_num}: Missing pairs fields: {key}"));
                        }
                    }
                    if pairs.get("left").is_some_and(|v| !v.is_array()) {
                        errors.push(format!("Question {q_num}: 'pairs.left' must be a list"));
                    }
                    if pairs.get("right").is_some_and(|v| !v.is_array()) {
                        errors.push(format!("Question {q_num}: 'pairs.right' must be a list"));
                    }
                    if pairs.get("answers").is_some_and(|v| !v.is_object()) {
                        errors.push(format!("Question {q_num}: 'pairs.answers' must be a dictionary"));
                    }
                }
            },
        },
        _ => {}
    }

    errors
}

pub fn show_validation_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    println!("🚨 Validation Errors Found:");
    for error in errors {
        println!("  • {error}");
    }
    println!("\n💡 Tips:");
    println!("  • For CSV: Check that all required columns are present");
    println!("  • For JSON: Ensure proper syntax and required fields");
    println!("  • Legacy JSON format (q, a) is also supported");
    println!("  • Matching questions need left|right format and a:1,b:2 answers");
    println!("  • Multiple choice needs at least one wrong answer");
}

/// Comprobación rápida para la UI: valida e imprime los errores si los hay.
pub fn is_file_valid(path: &Path, kind: FileKind) -> bool {
    let errors = match kind {
        FileKind::Csv => validate_csv_file(path),
        FileKind::Json => validate_json_file(path),
    };
    if errors.is_empty() {
        true
    } else {
        show_validation_errors(&errors);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn good_csv_passes() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("bank.csv");
        fs::write(
            &path,
            "type,question,correct,wrong_answers,left,right,answers\n\
             multiple,Capital?,Paris,\"Rome,Berlin\",,,\n\
             truefalse,The Sun is a star.,True,False,,,\n\
             match,Match!,,,A|B,1|2,\"a:1,b:2\"\n",
        )
        .expect("write");
        assert!(validate_csv_file(&path).is_empty());
    }

    #[test]
    fn csv_row_errors_name_the_row() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("bank.csv");
        fs::write(
            &path,
            "type,question,correct,wrong_answers,left,right,answers\n\
             truefalse,Statement,Maybe,False,,,\n\
             match,Match!,,,A|B,1|2,a-1\n",
        )
        .expect("write");
        let errors = validate_csv_file(&path);
        assert!(errors.iter().any(|e| e.starts_with("Row 2:") && e.contains("'True' or 'False'")));
        assert!(errors.iter().any(|e| e.starts_with("Row 3:") && e.contains("a:1,b:2")));
    }

    #[test]
    fn json_accepts_legacy_q_a_records() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("legacy.json");
        fs::write(&path, r#"[{"q": "2+2", "a": "4"}]"#).expect("write");
        assert!(validate_json_file(&path).is_empty());
    }

    #[test]
    fn json_flags_missing_fields_and_bad_types() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"[
                {"type": "multiple", "question": "Q"},
                {"type": "riddle", "question": "Q"},
                {"type": "match", "question": "Q", "pairs": {"left": "oops"}}
            ]"#,
        )
        .expect("write");
        let errors = validate_json_file(&path);
        assert!(errors.iter().any(|e| e.contains("Question 1") && e.contains("'correct'")));
        assert!(errors.iter().any(|e| e.contains("Question 2") && e.contains("Invalid question type")));
        assert!(errors.iter().any(|e| e.contains("Question 3") && e.contains("'pairs.left' must be a list")));
    }

    #[test]
    fn non_list_json_is_rejected() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("obj.json");
        fs::write(&path, r#"{"not": "a list"}"#).expect("write");
        let errors = validate_json_file(&path);
        assert!(errors[0].contains("must contain a list"));
    }
}
