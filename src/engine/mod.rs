pub mod input;

use rand::seq::SliceRandom;
use rand::thread_rng;
use serde_json::Value;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::model::{self, MatchPairs, Question};
use crate::scores::{self, ScoreRecord};

pub use input::{InputSource, StdinInput};

/// Presupuesto de tiempo por pregunta, en segundos.
pub const QUESTION_TIME_LIMIT: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizResult {
    Correct,
    Wrong,
    Timeout,
    Quit,
}

/// Ejecuta una sesión de quiz completa sobre `questions` y, si el usuario no
/// abandona, muestra el resumen y añade el resultado a `score_file`.
pub fn quiz_session(questions: &[Value], score_file: &Path, input: &mut dyn InputSource) {
    if questions.is_empty() {
        println!("⚠️ No available questions.");
        return;
    }

    let (mut valid, skipped) = model::parse_questions(questions);
    if skipped > 0 {
        println!("⚠️ Skipped {skipped} invalid question(s).");
    }
    if valid.is_empty() {
        println!("⚠️ No valid questions available.");
        return;
    }

    valid.shuffle(&mut thread_rng());
    let total = valid.len();
    let mut correct_count = 0u32;
    let mut wrong_count = 0u32;
    let mut timeout_count = 0u32;
    let start = Instant::now();

    for q in &valid {
        println!("\n━━━━━━━━━━━━━━ Question ━━━━━━━━━━━━━━");
        println!("\n{}", q.prompt());

        let result = match q {
            Question::Multiple { correct, wrong_answers, .. }
            | Question::TrueFalse { correct, wrong_answers, .. } => {
                handle_choice(correct, wrong_answers, input)
            }
            Question::Fillin { correct, .. } => handle_fillin(correct, input),
            Question::Match { pairs, .. } => handle_match(pairs, input),
        };

        match result {
            // Abandono: ni estadísticas ni guardado.
            QuizResult::Quit => return,
            QuizResult::Correct => correct_count += 1,
            QuizResult::Wrong => wrong_count += 1,
            QuizResult::Timeout => timeout_count += 1,
        }
    }

    let duration = start.elapsed().as_secs();
    show_statistics(correct_count, wrong_count, timeout_count, total, duration);

    let record = ScoreRecord {
        correct: correct_count,
        wrong: wrong_count,
        unanswered: timeout_count,
        total: total as u32,
        duration_s: duration,
        timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    };
    if !scores::append_score(score_file, &record) {
        println!("⚠️ Failed to save quiz results.");
    }
}

/// Repaso sin temporizador ni puntuación: pregunta, revelar, continuar.
pub fn flashcards_mode(questions: &[Value], input: &mut dyn InputSource) {
    if questions.is_empty() {
        println!("⚠️ No questions for flashcards.");
        return;
    }

    let (mut valid, skipped) = model::parse_questions(questions);
    if skipped > 0 {
        println!("⚠️ Skipped {skipped} invalid question(s).");
    }
    if valid.is_empty() {
        println!("⚠️ No valid questions available.");
        return;
    }

    valid.shuffle(&mut thread_rng());
    for q in &valid {
        println!("\n──────────────── Flashcard ────────────────");
        println!("┌──");
        println!("│ {}", q.prompt());
        println!("└──");

        match input.read_line("Press Enter to reveal answer or 'x' to exit") {
            None => break,
            Some(ans) => {
                if ans.trim().eq_ignore_ascii_case("x")
                    && input.confirm("Do you want to exit flashcards mode?")
                {
                    println!("⏹️ Exited flashcards mode.");
                    break;
                }
            }
        }

        reveal_answer(q);

        match input.read_line("Press Enter to continue or 'x' to exit") {
            None => break,
            Some(cont) => {
                if cont.trim().eq_ignore_ascii_case("x")
                    && input.confirm("Do you want to exit flashcards mode?")
                {
                    println!("⏹️ Exited flashcards mode.");
                    break;
                }
            }
        }
    }
}

fn reveal_answer(q: &Question) {
    match q {
        Question::Match { pairs, .. } => {
            println!("✅ Correct matching:");
            for (key, val) in &pairs.answers {
                let left = letter_index(key)
                    .and_then(|i| pairs.left.get(i))
                    .map(String::as_str)
                    .unwrap_or("?");
                let right = val
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| pairs.right.get(i))
                    .map(String::as_str)
                    .unwrap_or("?");
                println!("  {key}) {left:<24} {val}. {right}");
            }
        }
        Question::Multiple { correct, .. }
        | Question::TrueFalse { correct, .. }
        | Question::Fillin { correct, .. } => {
            println!("✅ Correct answer: {correct}");
        }
    }
}

fn handle_choice(correct: &str, wrong_answers: &[String], input: &mut dyn InputSource) -> QuizResult {
    let mut options: Vec<&str> = Vec::with_capacity(wrong_answers.len() + 1);
    options.push(correct);
    options.extend(wrong_answers.iter().map(String::as_str));
    options.shuffle(&mut thread_rng());

    let labels: Vec<char> = ('a'..='z').take(options.len()).collect();
    for (label, option) in labels.iter().zip(&options) {
        println!("  {label}) {option}");
    }

    let start = Instant::now();
    loop {
        let remaining = QUESTION_TIME_LIMIT - start.elapsed().as_secs() as i64;
        if remaining <= 0 {
            println!("❌ Time is up. Correct answer: {correct}");
            return QuizResult::Timeout;
        }

        let Some(answer) = input.read_line_with_deadline(
            &format!("⏳ {remaining}s - Your choice (letter, x to quit):"),
            Duration::from_secs(remaining as u64),
        ) else {
            println!("❌ Time is up. Correct answer: {correct}");
            return QuizResult::Timeout;
        };

        let answer = answer.trim().to_lowercase();
        if answer == "x" {
            if confirm_quit(input) {
                return QuizResult::Quit;
            }
            // Rechazado: seguimos con la misma pregunta sin reiniciar el reloj.
            continue;
        }

        if let Some(idx) = labels.iter().position(|l| answer == l.to_string()) {
            let selected = options[idx];
            if selected.trim().to_lowercase() == correct.trim().to_lowercase() {
                println!("✅ Correct!");
                return QuizResult::Correct;
            }
            println!("❌ Wrong. The correct answer is: {correct}");
            return QuizResult::Wrong;
        }

        println!("⚠️ Invalid input.");
    }
}

fn handle_fillin(correct: &str, input: &mut dyn InputSource) -> QuizResult {
    let start = Instant::now();
    loop {
        let remaining = QUESTION_TIME_LIMIT - start.elapsed().as_secs() as i64;
        if remaining <= 0 {
            println!("❌ Time is up. Correct answer: {correct}");
            return QuizResult::Timeout;
        }

        let Some(answer) = input.read_line_with_deadline(
            &format!("⏳ {remaining}s - Enter the correct answer (or x to quit):"),
            Duration::from_secs(remaining as u64),
        ) else {
            println!("❌ Time is up. Correct answer: {correct}");
            return QuizResult::Timeout;
        };

        let answer = answer.trim();
        if answer.eq_ignore_ascii_case("x") {
            if confirm_quit(input) {
                return QuizResult::Quit;
            }
            continue;
        }

        if answer.to_lowercase() == correct.to_lowercase() {
            println!("✅ Correct!");
            return QuizResult::Correct;
        }
        println!("❌ Wrong. The correct answer is: {correct}");
        return QuizResult::Wrong;
    }
}

fn handle_match(pairs: &MatchPairs, input: &mut dyn InputSource) -> QuizResult {
    if pairs.left.is_empty() || pairs.right.is_empty() || pairs.answers.is_empty() {
        println!("⚠️ Matching question is not properly defined.");
        return QuizResult::Wrong;
    }

    println!("Match the items (input: a-1, b-2, ...):");
    for (i, (left, right)) in pairs.left.iter().zip(&pairs.right).enumerate() {
        println!("  {}) {:<24} {}. {}", letter(i), left, i + 1, right);
    }

    // Un solo temporizador para toda la pregunta, no por pareja.
    let mut user_mapping: Vec<(String, String)> = Vec::with_capacity(pairs.left.len());
    let start = Instant::now();
    let mut i = 0;
    while i < pairs.left.len() {
        let remaining = QUESTION_TIME_LIMIT - start.elapsed().as_secs() as i64;
        if remaining <= 0 {
            println!("❌ Time is up. You didn't complete the question.");
            return QuizResult::Timeout;
        }

        let Some(value) = input.read_line_with_deadline(
            &format!(
                "⏳ {remaining}s - Enter the number for pair {}) {} (or x to quit):",
                letter(i),
                pairs.left[i]
            ),
            Duration::from_secs(remaining as u64),
        ) else {
            println!("❌ Time is up. You didn't answer {})", letter(i));
            return QuizResult::Timeout;
        };

        let value = value.trim();
        if value.eq_ignore_ascii_case("x") {
            if confirm_quit(input) {
                return QuizResult::Quit;
            }
            // Rechazado: se vuelve a pedir la misma pareja.
            continue;
        }

        user_mapping.push((letter(i).to_string(), value.to_string()));
        i += 1;
    }

    if user_mapping.len() != pairs.answers.len() {
        return QuizResult::Timeout;
    }

    for (key, expected) in &pairs.answers {
        let given = user_mapping
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str());
        if given != Some(expected.as_str()) {
            println!("❌ Incorrect. Correct mapping:");
            let rendered: Vec<String> =
                pairs.answers.iter().map(|(k, v)| format!("{k}:{v}")).collect();
            println!("  {{{}}}", rendered.join(", "));
            return QuizResult::Wrong;
        }
    }

    println!("✅ You matched all pairs correctly!");
    QuizResult::Correct
}

fn confirm_quit(input: &mut dyn InputSource) -> bool {
    if input.confirm("Do you want to stop the quiz?") {
        println!("⏹️ Quiz stopped by the user.");
        return true;
    }
    false
}

fn show_statistics(correct: u32, wrong: u32, unanswered: u32, total: usize, duration: u64) {
    println!("\n─────────── 📊 Quiz statistics ───────────");
    println!("✅ Correct answers: {correct}");
    println!("❌ Wrong answers: {wrong}");
    println!("⏱️ Unanswered: {unanswered}");
    println!("🕓 Total time: {duration} seconds");
    println!("🎯 Score: {correct}/{total} correct");
}

fn letter(i: usize) -> char {
    (b'a' + (i as u8)) as char
}

fn letter_index(key: &str) -> Option<usize> {
    let c = key.chars().next()?;
    if c.is_ascii_lowercase() {
        Some((c as u8 - b'a') as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::input::ScriptedInput;
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn match_pairs() -> MatchPairs {
        MatchPairs {
            left: vec!["Python".into(), "HTML".into()],
            right: vec!["Programming language".into(), "Markup language".into()],
            answers: BTreeMap::from([
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]),
        }
    }

    #[test]
    fn choice_with_single_option_accepts_a() {
        let mut input = ScriptedInput::new(&[Some("a")]);
        assert_eq!(handle_choice("Paris", &[], &mut input), QuizResult::Correct);
    }

    #[test]
    fn choice_reprompts_on_invalid_input() {
        let mut input = ScriptedInput::new(&[Some("zz"), Some("A")]);
        assert_eq!(handle_choice("Paris", &[], &mut input), QuizResult::Correct);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn choice_times_out_when_no_input_arrives() {
        let mut input = ScriptedInput::new(&[None]);
        assert_eq!(handle_choice("Paris", &[], &mut input), QuizResult::Timeout);
    }

    #[test]
    fn choice_quit_confirmed_propagates() {
        let mut input = ScriptedInput::new(&[Some("x"), Some("y")]);
        assert_eq!(handle_choice("Paris", &[], &mut input), QuizResult::Quit);
    }

    #[test]
    fn choice_declined_quit_keeps_the_question_alive() {
        let mut input = ScriptedInput::new(&[Some("x"), Some("n"), Some("a")]);
        assert_eq!(handle_choice("Paris", &[], &mut input), QuizResult::Correct);
    }

    #[test]
    fn fillin_compares_case_insensitively() {
        let mut input = ScriptedInput::new(&[Some("tokyo")]);
        assert_eq!(handle_fillin("Tokyo", &mut input), QuizResult::Correct);
    }

    #[test]
    fn fillin_wrong_answer() {
        let mut input = ScriptedInput::new(&[Some("Kyoto")]);
        assert_eq!(handle_fillin("Tokyo", &mut input), QuizResult::Wrong);
    }

    #[test]
    fn match_all_pairs_correct() {
        let mut input = ScriptedInput::new(&[Some("1"), Some("2")]);
        assert_eq!(handle_match(&match_pairs(), &mut input), QuizResult::Correct);
    }

    #[test]
    fn match_wrong_mapping() {
        let mut input = ScriptedInput::new(&[Some("2"), Some("1")]);
        assert_eq!(handle_match(&match_pairs(), &mut input), QuizResult::Wrong);
    }

    #[test]
    fn match_timeout_mid_sequence() {
        let mut input = ScriptedInput::new(&[Some("1"), None]);
        assert_eq!(handle_match(&match_pairs(), &mut input), QuizResult::Timeout);
    }

    #[test]
    fn match_declined_quit_reprompts_same_pair() {
        let mut input = ScriptedInput::new(&[Some("x"), Some("n"), Some("1"), Some("2")]);
        assert_eq!(handle_match(&match_pairs(), &mut input), QuizResult::Correct);
    }

    #[test]
    fn session_counts_always_add_up() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let score_file = dir.path().join("scores.json");
        let questions = vec![
            json!({"type": "fillin", "question": "Q1", "correct": "a1"}),
            json!({"type": "fillin", "question": "Q2", "correct": "a2"}),
            json!({"type": "fillin", "question": "Q3", "correct": "a3"}),
        ];
        let mut input =
            ScriptedInput::new(&[Some("nope"), Some("nope"), Some("nope")]);

        quiz_session(&questions, &score_file, &mut input);

        let saved = scores::load_scores(&score_file);
        assert_eq!(saved.len(), 1);
        let record = &saved[0];
        assert_eq!(record.total, 3);
        assert_eq!(record.wrong, 3);
        assert_eq!(record.correct + record.wrong + record.unanswered, record.total);
    }

    #[test]
    fn quitting_first_question_saves_nothing() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let score_file = dir.path().join("scores.json");
        let questions = vec![
            json!({"type": "fillin", "question": "Q1", "correct": "a1"}),
            json!({"type": "fillin", "question": "Q2", "correct": "a2"}),
            json!({"type": "fillin", "question": "Q3", "correct": "a3"}),
        ];
        let mut input = ScriptedInput::new(&[Some("x"), Some("y")]);

        quiz_session(&questions, &score_file, &mut input);

        assert!(!score_file.exists());
    }

    #[test]
    fn unanswered_question_is_recorded_as_timeout() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let score_file = dir.path().join("scores.json");
        let questions = vec![json!({"type": "fillin", "question": "Q", "correct": "a"})];
        let mut input = ScriptedInput::new(&[None]);

        quiz_session(&questions, &score_file, &mut input);

        let saved = scores::load_scores(&score_file);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].unanswered, 1);
        assert_eq!(saved[0].correct, 0);
    }

    #[test]
    fn invalid_only_bank_aborts_without_saving() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let score_file = dir.path().join("scores.json");
        let questions = vec![json!({"type": "multiple", "question": "no correct"})];
        let mut input = ScriptedInput::new(&[]);

        quiz_session(&questions, &score_file, &mut input);

        assert!(!score_file.exists());
    }

    #[test]
    fn flashcards_exit_on_first_card() {
        let questions = vec![
            json!({"type": "fillin", "question": "Q1", "correct": "a1"}),
            json!({"type": "fillin", "question": "Q2", "correct": "a2"}),
        ];
        let mut input = ScriptedInput::new(&[Some("x"), Some("y")]);
        flashcards_mode(&questions, &mut input);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn flashcards_reveals_match_table() {
        let questions = vec![json!({
            "type": "match",
            "question": "Match technologies",
            "pairs": {
                "left": ["Python", "HTML"],
                "right": ["Programming language", "Markup language"],
                "answers": {"a": "1", "b": "2"}
            }
        })];
        let mut input = ScriptedInput::new(&[Some(""), Some("")]);
        flashcards_mode(&questions, &mut input);
        assert_eq!(input.remaining(), 0);
    }
}
