use serde_json::{json, Value};
use std::path::Path;

use crate::engine::InputSource;
use crate::files;
use crate::ui;

const PAGE_SIZE: usize = 25;

pub fn type_label(t: &str) -> &'static str {
    match t {
        "multiple" => "🟢 Multiple choice",
        "truefalse" => "🟠 True/False",
        "fillin" => "🟡 Fill-in",
        "match" => "🟣 Matching",
        _ => "❔ Unknown",
    }
}

/// Alta interactiva de una pregunta. Devuelve `None` si el usuario vuelve
/// atrás o corta la entrada a medias.
pub fn create_question(input: &mut dyn InputSource) -> Option<Value> {
    println!("\n──────────── Add question ────────────");
    let choices = [
        "1. Multiple choice (1 correct + 3 incorrect)",
        "2. True/False",
        "3. Fill-in-the-blank",
        "4. Matching pairs",
        "↩ Back",
    ];
    match ui::select(input, "Choose question type", &choices)? {
        0 => {
            let question = ui::prompt(input, "Enter the question")?;
            let correct = ui::prompt(input, "Enter the correct answer")?;
            let mut wrong_answers = Vec::with_capacity(3);
            for i in 0..3 {
                wrong_answers.push(ui::prompt(input, &format!("Enter incorrect answer #{}", i + 1))?);
            }
            Some(json!({
                "type": "multiple",
                "question": question,
                "correct": correct,
                "wrong_answers": wrong_answers,
            }))
        }
        1 => {
            let question =
                ui::prompt(input, "Enter a statement (e.g., 'The Sun is a planet.')")?;
            let correct = match ui::select(input, "Enter the correct answer", &["True", "False"])? {
                0 => "True",
                _ => "False",
            };
            let wrong = if correct == "True" { "False" } else { "True" };
            Some(json!({
                "type": "truefalse",
                "question": question,
                "correct": correct,
                "wrong_answers": [wrong],
            }))
        }
        2 => {
            let question = ui::prompt(
                input,
                "Enter a fill-in question (e.g., 'The capital of France is _____.')",
            )?;
            let correct = ui::prompt(input, "Enter the correct answer")?;
            Some(json!({
                "type": "fillin",
                "question": question,
                "correct": correct.trim(),
                "wrong_answers": [],
            }))
        }
        3 => create_match_question(input),
        _ => None,
    }
}

fn create_match_question(input: &mut dyn InputSource) -> Option<Value> {
    let question = ui::prompt(input, "Enter a question (e.g., 'Match the terms')")?;

    let mut left = Vec::with_capacity(3);
    println!("Enter items for the left column (e.g., Python, HTML, Linux):");
    for i in 0..3 {
        left.push(ui::prompt(input, &format!("  Left {})", letter(i)))?);
    }

    let mut right = Vec::with_capacity(3);
    println!("Enter items for the right column (e.g., Programming language, Markup language, OS):");
    for i in 0..3 {
        right.push(ui::prompt(input, &format!("  Right {})", i + 1))?);
    }

    let mut answers = serde_json::Map::new();
    println!("Enter correct pairs like (a-1, b-2, c-3). Answers use 1,2,3");
    for i in 0..3 {
        loop {
            let pair = ui::prompt(input, &format!("  Pair #{}", i + 1))?;
            if let Some((l, r)) = pair.split_once('-') {
                let l = l.trim().to_lowercase();
                let r = r.trim();
                let valid_letter =
                    l.len() == 1 && (0..left.len()).any(|j| l == letter(j).to_string());
                let valid_number = r
                    .parse::<usize>()
                    .map(|n| n >= 1 && n <= right.len())
                    .unwrap_or(false);
                if valid_letter && valid_number {
                    answers.insert(l, Value::String(r.to_string()));
                    break;
                }
            }
            println!("⚠️ Invalid input. Use format like 'a-1'.");
        }
    }

    Some(json!({
        "type": "match",
        "question": question,
        "pairs": {"left": left, "right": right, "answers": answers},
    }))
}

/// Edición eligiendo la pregunta de una lista.
pub fn edit_question(questions: &mut [Value], input: &mut dyn InputSource) {
    if questions.is_empty() {
        println!("⚠️ No questions available to edit.");
        return;
    }

    let mut choices: Vec<String> = questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {:.50}...", i + 1, question_text(q)))
        .collect();
    choices.push("↩ Back".to_string());

    let Some(idx) = ui::select(input, "✏️ Choose a question to edit:", &choices) else {
        return;
    };
    if idx + 1 == choices.len() {
        return;
    }
    edit_at(questions, idx, input);
}

/// Edición directa por número ordinal (base 1).
pub fn edit_question_by_index(questions: &mut [Value], number: usize, input: &mut dyn InputSource) {
    if questions.is_empty() {
        println!("⚠️ No questions available to edit.");
        return;
    }
    if number == 0 || number > questions.len() {
        println!("⚠️ Number out of range. Allowed 1-{}.", questions.len());
        return;
    }
    edit_at(questions, number - 1, input);
}

fn edit_at(questions: &mut [Value], idx: usize, input: &mut dyn InputSource) {
    let qdata = questions[idx].clone();
    let qtype = qdata.get("type").and_then(Value::as_str).unwrap_or("");
    let new_question =
        ui::prompt_default(input, "New question", &question_text(&qdata));

    let updated = match qtype {
        "multiple" => {
            let correct = qdata.get("correct").and_then(Value::as_str).unwrap_or("");
            let new_correct = ui::prompt_default(input, "New correct answer", correct);
            let current: Vec<String> = qdata
                .get("wrong_answers")
                .and_then(Value::as_array)
                .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                .unwrap_or_default();
            let default_count = current.len().max(3);
            let count = ui::prompt_default(
                input,
                "Number of incorrect answers",
                &default_count.to_string(),
            )
            .parse::<usize>()
            .unwrap_or(default_count)
            .clamp(1, 10);
            let mut wrongs = Vec::with_capacity(count);
            for i in 0..count {
                let default = current.get(i).map(String::as_str).unwrap_or("");
                wrongs.push(ui::prompt_default(
                    input,
                    &format!("New incorrect answer #{}", i + 1),
                    default,
                ));
            }
            json!({
                "type": "multiple",
                "question": new_question,
                "correct": new_correct,
                "wrong_answers": wrongs,
            })
        }
        "truefalse" => {
            let correct = qdata.get("correct").and_then(Value::as_str).unwrap_or("True");
            let new_correct = match ui::select(input, "New correct answer", &["True", "False"]) {
                Some(1) => "False",
                Some(_) => "True",
                None => correct,
            };
            let wrong = if new_correct == "True" { "False" } else { "True" };
            json!({
                "type": "truefalse",
                "question": new_question,
                "correct": new_correct,
                "wrong_answers": [wrong],
            })
        }
        "fillin" => {
            let correct = qdata.get("correct").and_then(Value::as_str).unwrap_or("");
            let new_correct = ui::prompt_default(input, "New correct answer", correct);
            json!({
                "type": "fillin",
                "question": new_question,
                "correct": new_correct,
                "wrong_answers": [],
            })
        }
        "match" => {
            let pairs = qdata.get("pairs").cloned().unwrap_or_else(|| json!({}));
            let joined = |key: &str| -> String {
                pairs
                    .get(key)
                    .and_then(Value::as_array)
                    .map(|a| {
                        a.iter()
                            .filter_map(Value::as_str)
                            .collect::<Vec<_>>()
                            .join("|")
                    })
                    .unwrap_or_default()
            };

            println!("Current left column (items separated by |):");
            let new_left = ui::prompt_default(input, "New left column", &joined("left"));
            println!("Current right column (items separated by |):");
            let new_right = ui::prompt_default(input, "New right column", &joined("right"));

            println!("Current mapping (e.g., a:1, b:2)");
            let current_mapping = pairs
                .get("answers")
                .and_then(Value::as_object)
                .map(|m| {
                    m.iter()
                        .map(|(k, v)| format!("{k}:{}", v.as_str().unwrap_or_default()))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            let raw_mapping = ui::prompt_default(input, "New mapping", &current_mapping);
            let mut answers = serde_json::Map::new();
            for pair in raw_mapping.split(',') {
                if let Some((k, v)) = pair.split_once(':') {
                    answers.insert(k.trim().to_string(), Value::String(v.trim().to_string()));
                }
            }

            let split = |s: String| -> Vec<String> {
                s.split('|')
                    .map(str::trim)
                    .filter(|x| !x.is_empty())
                    .map(str::to_string)
                    .collect()
            };
            json!({
                "type": "match",
                "question": new_question,
                "pairs": {
                    "left": split(new_left),
                    "right": split(new_right),
                    "answers": answers,
                },
            })
        }
        _ => {
            println!("⚠️ Unknown question type; nothing changed.");
            return;
        }
    };

    questions[idx] = updated;
    println!("✅ Question updated successfully.");
}

/// Borrado eligiendo la pregunta de una lista. Persiste el fichero.
pub fn delete_question(category_file: &Path, input: &mut dyn InputSource) {
    let questions = files::load_json(category_file);
    if questions.is_empty() {
        println!("No questions to delete.");
        return;
    }

    let mut choices: Vec<String> = questions.iter().map(question_text).collect();
    choices.push("↩ Back".to_string());
    let Some(idx) = ui::select(input, "Select a question to delete:", &choices) else {
        return;
    };
    if idx + 1 == choices.len() {
        return;
    }
    delete_question_at(category_file, idx);
}

/// Borrado directo por número ordinal (base 1). Persiste el fichero.
pub fn delete_question_by_index(category_file: &Path, number: usize) {
    if number == 0 {
        println!("Invalid question index.");
        return;
    }
    delete_question_at(category_file, number - 1);
}

fn delete_question_at(category_file: &Path, idx: usize) -> bool {
    let mut questions = files::load_json(category_file);
    if idx >= questions.len() {
        println!("Invalid question index.");
        return false;
    }
    let removed = questions.remove(idx);
    if files::save_json(category_file, &Value::Array(questions)) {
        println!("Deleted: {}", question_text(&removed));
        true
    } else {
        println!("Failed to save updated questions.");
        false
    }
}

/// Listado paginado de preguntas con su tipo.
pub fn show_questions_paginated(questions: &[Value], title: &str, input: &mut dyn InputSource) {
    if questions.is_empty() {
        println!("⚠️ No questions to display.");
        return;
    }

    let total = questions.len();
    let total_pages = total.div_ceil(PAGE_SIZE);
    let mut page = 0;
    loop {
        let start = page * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(total);
        if total_pages > 1 {
            println!("\n{title} [{}-{} of {}]", start + 1, end, total);
        } else {
            println!("\n{title}");
        }
        for (i, q) in questions[start..end].iter().enumerate() {
            let qtype = q.get("type").and_then(Value::as_str).unwrap_or("");
            println!("{:>5}  {:<60}  {}", start + i + 1, question_text(q), type_label(qtype));
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

        match ui::select(input, "Navigation", &choices) {
            Some(idx) => match choices[idx] {
                "⟨ Previous" => page -= 1,
                "Next ⟩" => page += 1,
                _ => break,
            },
            None => break,
        }
    }
}

fn question_text(q: &Value) -> String {
    q.get("question")
        .and_then(Value::as_str)
        .unwrap_or("<no text>")
        .to_string()
}

fn letter(i: usize) -> char {
    (b'a' + (i as u8)) as char
}
