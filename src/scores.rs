use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::engine::InputSource;
use crate::files;

const PAGE_SIZE: usize = 25;
const PREVIEW_LIMIT: usize = 50;

/// Resumen persistido de una sesión completada.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub correct: u32,
    pub wrong: u32,
    pub unanswered: u32,
    pub total: u32,
    pub duration_s: u64,
    pub timestamp: String,
}

impl ScoreRecord {
    /// Normaliza una entrada cruda a claves inglesas. Los ficheros viejos
    /// usan nombres alternativos; cada campo tiene su cadena fija de
    /// alternativas y un valor por defecto (0 o `"-"`).
    pub fn from_value(v: &Value) -> ScoreRecord {
        let correct = pick_number(v, &["correct", "tačnih", "tacnih", "correct_count"]);
        let wrong = pick_number(v, &["wrong", "pogrešnih", "pogresnih", "wrong_count"]);
        let unanswered = pick_number(v, &["unanswered", "neodgovorenih", "unanswered_count"]);
        let total = pick_opt_number(v, &["total", "ukupno", "total_questions"])
            .unwrap_or(correct + wrong + unanswered);
        let duration_s = pick_opt_number(v, &["duration_s", "trajanje_s"]).unwrap_or(0);
        let timestamp = pick_string(v, &["timestamp", "vrijeme"]).unwrap_or_else(|| "-".into());

        ScoreRecord {
            correct: correct as u32,
            wrong: wrong as u32,
            unanswered: unanswered as u32,
            total: total as u32,
            duration_s,
            timestamp,
        }
    }
}

fn pick_number(v: &Value, keys: &[&str]) -> u64 {
    pick_opt_number(v, keys).unwrap_or(0)
}

fn pick_opt_number(v: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| v.get(k).and_then(Value::as_u64))
}

fn pick_string(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| v.get(k).and_then(Value::as_str).map(str::to_string))
}

/// Carga la lista de resultados ya normalizada. Leer no muta nada: dos
/// cargas consecutivas devuelven exactamente lo mismo.
pub fn load_scores(score_file: &Path) -> Vec<ScoreRecord> {
    files::load_json(score_file).iter().map(ScoreRecord::from_value).collect()
}

/// Añade un resultado: carga toda la lista cruda, empuja el registro nuevo y
/// reescribe el fichero entero. Las entradas viejas se conservan tal cual
/// estaban en disco (claves legadas incluidas).
pub fn append_score(score_file: &Path, record: &ScoreRecord) -> bool {
    let mut raw = files::load_json(score_file);
    let value = match serde_json::to_value(record) {
        Ok(value) => value,
        Err(e) => {
            println!("⚠️ Error serializing score record: {e}");
            return false;
        }
    };
    raw.push(value);
    files::save_json(score_file, &Value::Array(raw))
}

/// Borra TODOS los resultados previa confirmación explícita.
pub fn reset_scores(score_file: &Path, input: &mut dyn InputSource) {
    if input.confirm("⚠️ Are you sure you want to delete ALL results?") {
        files::save_json(score_file, &Value::Array(Vec::new()));
        println!("❌ All results cleared.");
    } else {
        println!("↩ Reset canceled.");
    }
}

/// Muestra el historial de resultados, paginado. Con más de 50 entradas
/// enseña primero las últimas 50 y ofrece ver todo.
pub fn view_scores(score_file: &Path, input: &mut dyn InputSource) {
    let scores = load_scores(score_file);
    if scores.is_empty() {
        println!("⚠️ No saved results.");
        return;
    }

    if scores.len() > PREVIEW_LIMIT {
        println!("Showing last {PREVIEW_LIMIT} of {} results.", scores.len());
        let tail_start = scores.len() - PREVIEW_LIMIT;
        show_scores_paginated(&scores[tail_start..], tail_start, input);
        if let Some(ans) = input.read_line("Show all results? (y/N)") {
            if matches!(ans.trim().to_lowercase().as_str(), "y" | "yes") {
                show_scores_paginated(&scores, 0, input);
            }
        }
    } else {
        show_scores_paginated(&scores, 0, input);
    }
}

fn show_scores_paginated(scores: &[ScoreRecord], numbering_offset: usize, input: &mut dyn InputSource) {
    let total = scores.len();
    let total_pages = total.div_ceil(PAGE_SIZE);
    let mut page = 0;
    loop {
        let start = page * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(total);
        println!("\n📈 Statistics [{}-{} of {}]", start + 1, end, total);
        println!(
            "{:>5}  {:>8}  {:>6}  {:>10}  {:>6}  {:>12}  {}",
            "#", "Correct", "Wrong", "Unanswered", "Total", "Duration", "Date"
        );
        for (i, s) in scores[start..end].iter().enumerate() {
            println!(
                "{:>5}  {:>8}  {:>6}  {:>10}  {:>6}  {:>12}  {}",
                numbering_offset + start + i + 1,
                s.correct,
                s.wrong,
                s.unanswered,
                s.total,
                format_duration(s.duration_s),
                s.timestamp
            );
        }

        let mut choices: Vec<&str> = Vec::new();
        if page > 0 {
            choices.push("⟨ Previous");
        }
        if page + 1 < total_pages {
            choices.push("Next ⟩");
        }
        choices.push("↩ Back");
        if choices.len() == 1 {
            break;
        }

        match crate::ui::select(input, "Navigation", &choices) {
            Some(idx) => match choices[idx] {
                "⟨ Previous" => page -= 1,
                "Next ⟩" => page += 1,
                _ => break,
            },
            None => break,
        }
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds >= 60 {
        format!("{} min {} s", seconds / 60, seconds % 60)
    } else {
        format!("{seconds} s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_keys_normalize_through_the_fallback_chain() {
        let legacy = json!({
            "tačnih": 7,
            "pogrešnih": 2,
            "neodgovorenih": 1,
            "ukupno": 10,
            "trajanje_s": 95,
            "vrijeme": "2023-01-01 10:00:00"
        });
        let record = ScoreRecord::from_value(&legacy);
        assert_eq!(record.correct, 7);
        assert_eq!(record.wrong, 2);
        assert_eq!(record.unanswered, 1);
        assert_eq!(record.total, 10);
        assert_eq!(record.duration_s, 95);
        assert_eq!(record.timestamp, "2023-01-01 10:00:00");
    }

    #[test]
    fn missing_fields_default_to_zero_and_dash() {
        let record = ScoreRecord::from_value(&json!({"correct": 3, "wrong": 1}));
        assert_eq!(record.correct, 3);
        assert_eq!(record.unanswered, 0);
        // Sin `total` explícito: suma de los contadores presentes.
        assert_eq!(record.total, 4);
        assert_eq!(record.duration_s, 0);
        assert_eq!(record.timestamp, "-");
    }

    #[test]
    fn append_preserves_legacy_entries_verbatim() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("scores.json");
        files::save_json(&path, &json!([{"tačnih": 5, "pogrešnih": 0}]));

        let record = ScoreRecord {
            correct: 1,
            wrong: 2,
            unanswered: 0,
            total: 3,
            duration_s: 42,
            timestamp: "2024-05-01 12:00:00".into(),
        };
        assert!(append_score(&path, &record));

        let raw = files::load_json(&path);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0]["tačnih"], 5);
        assert_eq!(raw[1]["correct"], 1);
    }

    #[test]
    fn loading_twice_is_idempotent() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("scores.json");
        files::save_json(
            &path,
            &json!([
                {"correct": 1, "wrong": 0, "unanswered": 0, "total": 1,
                 "duration_s": 10, "timestamp": "2024-01-01 00:00:00"},
                {"tačnih": 2, "pogrešnih": 1}
            ]),
        );

        let first = load_scores(&path);
        let second = load_scores(&path);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn reset_clears_only_after_confirmation() {
        use crate::engine::input::ScriptedInput;

        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("scores.json");
        files::save_json(&path, &json!([{"correct": 1}]));

        let mut declined = ScriptedInput::new(&[Some("n")]);
        reset_scores(&path, &mut declined);
        assert_eq!(files::load_json(&path).len(), 1);

        let mut confirmed = ScriptedInput::new(&[Some("y")]);
        reset_scores(&path, &mut confirmed);
        assert!(files::load_json(&path).is_empty());
    }
}
