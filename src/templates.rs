use serde_json::json;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Crea un CSV de ejemplo con los cuatro tipos de pregunta en el dialecto
/// normal. Devuelve la ruta completa del fichero creado.
pub fn create_csv_template(csv_dir: &Path, filename: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(csv_dir)?;
    let path = csv_dir.join(filename);

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["type", "question", "correct", "wrong_answers", "left", "right", "answers"])?;
    writer.write_record([
        "multiple",
        "What is the capital of France?",
        "Paris",
        "Rome,Berlin,Madrid",
        "",
        "",
        "",
    ])?;
    writer.write_record(["truefalse", "The Sun is a star.", "True", "False", "", "", ""])?;
    writer.write_record(["fillin", "The capital of Japan is ______.", "Tokyo", "", "", "", ""])?;
    writer.write_record([
        "match",
        "Match technologies",
        "",
        "",
        "Python|HTML",
        "Programming language|Markup language",
        "a:1,b:2",
    ])?;
    writer.flush()?;

    Ok(path)
}

/// Crea un banco JSON de ejemplo bajo `categories/templates/`.
pub fn create_json_template(categories_dir: &Path, filename: &str) -> io::Result<PathBuf> {
    let folder = categories_dir.join("templates");
    fs::create_dir_all(&folder)?;
    let path = folder.join(filename);

    let template = json!([
        {
            "type": "multiple",
            "question": "What is the capital of France?",
            "correct": "Paris",
            "wrong_answers": ["Rome", "Berlin", "Madrid"],
        },
        {
            "type": "truefalse",
            "question": "The Sun is a star.",
            "correct": "True",
            "wrong_answers": ["False"],
        },
        {
            "type": "fillin",
            "question": "The capital of Japan is ______.",
            "correct": "Tokyo",
            "wrong_answers": [],
        },
        {
            "type": "match",
            "question": "Match technologies",
            "pairs": {
                "left": ["Python", "HTML"],
                "right": ["Programming language", "Markup language"],
                "answers": {"a": "1", "b": "2"},
            },
        },
    ]);

    let text = serde_json::to_string_pretty(&template)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&path, text)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model, validation};

    #[test]
    fn csv_template_validates_and_converts() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = create_csv_template(dir.path(), "template.csv").expect("create");

        assert!(validation::validate_csv_file(&path).is_empty());

        let json_out = dir.path().join("template.json");
        crate::convert::csv_to_json(&path, &json_out).expect("convert");
        let values = crate::files::load_json(&json_out);
        let (questions, skipped) = model::parse_questions(&values);
        assert_eq!(questions.len(), 4);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn json_template_contains_four_valid_questions() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = create_json_template(dir.path(), "example_template.json").expect("create");
        assert!(path.to_string_lossy().contains("templates"));

        let values = crate::files::load_json(&path);
        let (questions, skipped) = model::parse_questions(&values);
        assert_eq!(questions.len(), 4);
        assert_eq!(skipped, 0);
        assert!(validation::validate_json_file(&path).is_empty());
    }
}
