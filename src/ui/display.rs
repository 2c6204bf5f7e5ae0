use serde_json::Value;

use crate::engine::InputSource;

// Texto de ayuda embebido en el binario, como el resto de recursos fijos.
const HELP_JSON: &str = include_str!("../data/help.json");

pub fn clear_screen() {
    print!("\x1b[2J\x1b[1;1H");
}

pub fn show_logo() {
    println!("╭──────────────────────────────────────────╮");
    println!("│  🎓 Welcome to                           │");
    println!("│                                          │");
    println!("│    ┌─┐ ┬ ┬ ┬ ┌─┐ ┌┬┐ ┌─┐ ┌─┐ ┬┌─        │");
    println!("│    │─┼ │ │ │ ┌─┘  ││ ├─  │   ├┴┐        │");
    println!("│    └─┘ └─┘ ┴ └─┘ ─┴┘ └─┘ └─┘ ┴ ┴        │");
    println!("│                                          │");
    println!("╰──────────────────────────────────────────╯");
}

/// Muestra las instrucciones embebidas en `data/help.json`.
pub fn show_help(input: &mut dyn InputSource) {
    let data: Value = match serde_json::from_str(HELP_JSON) {
        Ok(data) => data,
        Err(_) => {
            println!("⚠️ Help instructions unavailable or invalid.");
            return;
        }
    };
    let Some(instructions) = data.get("instructions").and_then(Value::as_array) else {
        println!("⚠️ Help instructions unavailable or invalid.");
        return;
    };

    println!("\n──────────────── 🆘 Help ────────────────");
    for line in instructions {
        if let Some(text) = line.as_str() {
            println!("- {text}");
        }
    }
    let _ = input.read_line("\nPress Enter to go back...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_help_parses_with_instructions() {
        let data: Value = serde_json::from_str(HELP_JSON).expect("valid help resource");
        let instructions = data["instructions"].as_array().expect("instructions array");
        assert!(!instructions.is_empty());
    }
}
