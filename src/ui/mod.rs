pub mod display;

use crate::engine::InputSource;

/// Menú numerado sobre stdin. Devuelve el índice elegido (base 0) o `None`
/// si la entrada se cerró.
pub fn select<S: AsRef<str>>(
    input: &mut dyn InputSource,
    title: &str,
    choices: &[S],
) -> Option<usize> {
    loop {
        println!("\n{title}");
        for (i, choice) in choices.iter().enumerate() {
            println!("  {}) {}", i + 1, choice.as_ref());
        }
        let line = input.read_line("Choose an option:")?;
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => return Some(n - 1),
            _ => println!("⚠️ Invalid choice."),
        }
    }
}

pub fn prompt(input: &mut dyn InputSource, message: &str) -> Option<String> {
    input
        .read_line(&format!("{message}:"))
        .map(|s| s.trim().to_string())
}

/// Prompt con valor por defecto: Enter vacío (o EOF) lo conserva.
pub fn prompt_default(input: &mut dyn InputSource, message: &str, default: &str) -> String {
    match input.read_line(&format!("{message} [{default}]:")) {
        Some(line) => {
            let line = line.trim();
            if line.is_empty() {
                default.to_string()
            } else {
                line.to_string()
            }
        }
        None => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::ScriptedInput;

    #[test]
    fn select_reprompts_until_a_valid_number() {
        let mut input = ScriptedInput::new(&[Some("zero"), Some("9"), Some("2")]);
        let idx = select(&mut input, "Menu", &["one", "two", "three"]);
        assert_eq!(idx, Some(1));
    }

    #[test]
    fn select_returns_none_on_closed_input() {
        let mut input = ScriptedInput::new(&[]);
        assert_eq!(select(&mut input, "Menu", &["one"]), None);
    }

    #[test]
    fn prompt_default_keeps_the_default_on_empty() {
        let mut input = ScriptedInput::new(&[Some("")]);
        assert_eq!(prompt_default(&mut input, "Name", "old"), "old");
        let mut input = ScriptedInput::new(&[Some("new")]);
        assert_eq!(prompt_default(&mut input, "Name", "old"), "new");
    }
}
