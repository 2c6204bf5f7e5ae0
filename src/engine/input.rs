use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

/// Fuente de entrada del usuario. El motor de sesiones y los menús sólo
/// hablan con este trait, así que los tests pueden inyectar entradas
/// guionizadas sin tocar la terminal.
pub trait InputSource {
    /// Muestra `prompt` y espera una línea como mucho `deadline`.
    /// Devuelve `None` si el plazo vence (o si la entrada se cerró).
    fn read_line_with_deadline(&mut self, prompt: &str, deadline: Duration) -> Option<String>;

    /// Muestra `prompt` y espera una línea sin límite de tiempo.
    /// `None` sólo cuando la entrada se cerró (EOF).
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Pregunta sí/no. Enter vacío cuenta como sí; EOF como no.
    fn confirm(&mut self, message: &str) -> bool {
        match self.read_line(&format!("{message} (Y/n)")) {
            Some(answer) => {
                let answer = answer.trim().to_lowercase();
                answer.is_empty() || answer == "y" || answer == "yes"
            }
            None => false,
        }
    }
}

/// Entrada real por stdin.
///
/// Un único hilo lector de larga vida alimenta un canal; la espera con
/// plazo es un `recv_timeout` sobre ese canal. Así ningún hilo abandonado
/// se queda bloqueado robándose la siguiente línea tecleada.
pub struct StdinInput {
    rx: Receiver<String>,
}

impl StdinInput {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for StdinInput {
    fn read_line_with_deadline(&mut self, prompt: &str, deadline: Duration) -> Option<String> {
        print!("{prompt} ");
        let _ = io::stdout().flush();
        match self.rx.recv_timeout(deadline) {
            Ok(line) => Some(line),
            Err(_) => {
                println!();
                None
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{prompt} ");
        let _ = io::stdout().flush();
        self.rx.recv().ok()
    }
}

/// Entrada guionizada para tests: cada elemento es la línea devuelta por
/// una lectura; `None` simula un plazo vencido (o EOF).
#[cfg(test)]
pub(crate) struct ScriptedInput {
    lines: std::collections::VecDeque<Option<String>>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(lines: &[Option<&str>]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.map(str::to_string)).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn read_line_with_deadline(&mut self, _prompt: &str, _deadline: Duration) -> Option<String> {
        self.lines.pop_front().flatten()
    }

    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop_front().flatten()
    }
}
