use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Columnas izquierda/derecha de una pregunta de emparejar, más el mapeo
/// correcto letra -> número (como strings: `"a" -> "1"`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchPairs {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Question {
    #[serde(rename = "multiple")]
    Multiple {
        question: String,
        correct: String,
        #[serde(default, deserialize_with = "one_or_many")]
        wrong_answers: Vec<String>,
    },
    #[serde(rename = "truefalse")]
    TrueFalse {
        question: String,
        correct: String,
        #[serde(default, deserialize_with = "one_or_many")]
        wrong_answers: Vec<String>,
    },
    #[serde(rename = "fillin")]
    Fillin {
        question: String,
        correct: String,
        #[serde(default, deserialize_with = "one_or_many")]
        wrong_answers: Vec<String>,
    },
    #[serde(rename = "match")]
    Match { question: String, pairs: MatchPairs },
}

impl Question {
    pub fn prompt(&self) -> &str {
        match self {
            Question::Multiple { question, .. }
            | Question::TrueFalse { question, .. }
            | Question::Fillin { question, .. }
            | Question::Match { question, .. } => question,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Question::Multiple { .. } => "multiple",
            Question::TrueFalse { .. } => "truefalse",
            Question::Fillin { .. } => "fillin",
            Question::Match { .. } => "match",
        }
    }
}

// Algunos bancos viejos guardan wrong_answers como string suelto.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Valida la estructura de una pregunta cruda antes de usarla.
///
/// Requiere `type` y `question`; para `match` además `pairs.left`,
/// `pairs.right` y `pairs.answers` no vacíos; para el resto, `correct`.
pub fn is_valid(q: &Value) -> bool {
    let Some(obj) = q.as_object() else {
        return false;
    };
    if !obj.contains_key("type") || !obj.contains_key("question") {
        return false;
    }
    if obj.get("type").and_then(Value::as_str) == Some("match") {
        let pairs = obj.get("pairs");
        return truthy(pairs.and_then(|p| p.get("left")))
            && truthy(pairs.and_then(|p| p.get("right")))
            && truthy(pairs.and_then(|p| p.get("answers")));
    }
    obj.contains_key("correct")
}

fn truthy(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(m)) => !m.is_empty(),
    }
}

/// Filtra una lista cruda a preguntas tipadas. Devuelve las válidas y el
/// número de descartadas. Una entrada que pasa el predicado pero no encaja
/// en su variante cuenta como descartada; nunca se interrumpe la carga.
pub fn parse_questions(values: &[Value]) -> (Vec<Question>, usize) {
    let mut questions = Vec::with_capacity(values.len());
    let mut skipped = 0;
    for value in values {
        if !is_valid(value) {
            skipped += 1;
            continue;
        }
        match serde_json::from_value::<Question>(value.clone()) {
            Ok(q) => questions.push(q),
            Err(_) => skipped += 1,
        }
    }
    (questions, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_correct_is_invalid() {
        assert!(!is_valid(&json!({"type": "multiple", "question": "Q"})));
    }

    #[test]
    fn match_with_full_pairs_is_valid() {
        let q = json!({
            "type": "match",
            "question": "Q",
            "pairs": {"left": ["A"], "right": ["1"], "answers": {"a": "1"}}
        });
        assert!(is_valid(&q));
    }

    #[test]
    fn match_with_empty_pairs_is_invalid() {
        let q = json!({
            "type": "match",
            "question": "Q",
            "pairs": {"left": [], "right": ["1"], "answers": {"a": "1"}}
        });
        assert!(!is_valid(&q));
        assert!(!is_valid(&json!({"type": "match", "question": "Q"})));
    }

    #[test]
    fn non_object_entries_are_invalid() {
        assert!(!is_valid(&json!("just a string")));
        assert!(!is_valid(&json!(null)));
    }

    #[test]
    fn parse_questions_skips_and_counts() {
        let values = vec![
            json!({"type": "fillin", "question": "Capital?", "correct": "Tokyo"}),
            json!({"type": "multiple", "question": "no correct field"}),
            json!({"type": "truefalse", "question": "S", "correct": "True",
                   "wrong_answers": ["False"]}),
            json!(42),
        ];
        let (questions, skipped) = parse_questions(&values);
        assert_eq!(questions.len(), 2);
        assert_eq!(skipped, 2);
        assert_eq!(questions[0].type_name(), "fillin");
    }

    #[test]
    fn stray_string_wrong_answers_still_parse() {
        let v = json!({
            "type": "truefalse",
            "question": "S",
            "correct": "True",
            "wrong_answers": "False"
        });
        let (questions, skipped) = parse_questions(&[v]);
        assert_eq!(skipped, 0);
        match &questions[0] {
            Question::TrueFalse { wrong_answers, .. } => {
                assert_eq!(wrong_answers, &vec!["False".to_string()]);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn tagged_serialization_round_trip() {
        let q = Question::Match {
            question: "Match technologies".into(),
            pairs: MatchPairs {
                left: vec!["Python".into(), "HTML".into()],
                right: vec!["Programming language".into(), "Markup language".into()],
                answers: BTreeMap::from([
                    ("a".to_string(), "1".to_string()),
                    ("b".to_string(), "2".to_string()),
                ]),
            },
        };
        let value = serde_json::to_value(&q).expect("serializes");
        assert_eq!(value["type"], "match");
        let back: Question = serde_json::from_value(value).expect("deserializes");
        assert_eq!(back, q);
    }
}
