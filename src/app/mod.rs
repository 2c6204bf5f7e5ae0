use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::cache::QuestionCache;
use crate::categories::CategoryStore;
use crate::engine::{self, InputSource, StdinInput};
use crate::paths::AppPaths;
use crate::ui::{self, display};
use crate::update;

// Submódulos del shell de menús
mod questions_menu;
mod stats;
mod tools;

pub struct App {
    paths: AppPaths,
    cache: QuestionCache,
    categories: CategoryStore,
    input: StdinInput,
    update_rx: Option<Receiver<String>>,
    update_notice: Option<String>,
}

impl App {
    pub fn new(paths: AppPaths) -> Self {
        let categories = CategoryStore::new(paths.categories_dir.clone());
        Self {
            paths,
            cache: QuestionCache::new(),
            categories,
            input: StdinInput::new(),
            update_rx: None,
            update_notice: None,
        }
    }

    /// Bucle principal de menús. Sale con la opción Exit confirmada o al
    /// cerrarse la entrada.
    pub fn run(&mut self) {
        self.launch_update_check();

        loop {
            display::clear_screen();
            display::show_logo();
            self.poll_update_result();
            if let Some(version) = &self.update_notice {
                println!("✨ Version {version} is available.");
            }

            let choices = [
                "🚀 Start Quiz",
                "👾 Flashcards Learning",
                "🗂️ Questions",
                "📈 Statistics",
                "🧰 Tools",
                "💞 Help",
                "⏻  Exit",
            ];
            let Some(choice) = ui::select(&mut self.input, "Main Menu", &choices) else {
                break;
            };
            match choice {
                0 => self.handle_quiz(),
                1 => self.handle_flashcards(),
                2 => self.handle_questions_menu(),
                3 => self.handle_stats_menu(),
                4 => self.handle_tools_menu(),
                5 => display::show_help(&mut self.input),
                _ => {
                    if self.input.confirm("Are you sure you want to exit?") {
                        println!("👋 Exit. Good luck with your studies!");
                        break;
                    }
                }
            }
        }
    }

    fn handle_quiz(&mut self) {
        println!("═══════════════════════ Categories ════════════════════════");
        let Some(filename) = self.select_category(false) else {
            return;
        };
        let questions = self.cache.get(&filename);
        engine::quiz_session(&questions, &self.paths.scores_file, &mut self.input);
        let _ = self.input.read_line("\nPress Enter to return to the main menu...");
    }

    fn handle_flashcards(&mut self) {
        let Some(filename) = self.select_category(false) else {
            return;
        };
        let questions = self.cache.get(&filename);
        engine::flashcards_mode(&questions, &mut self.input);
    }

    /// Selector de categoría compartido por quiz, flashcards y gestión.
    fn select_category(&mut self, allow_create: bool) -> Option<PathBuf> {
        let mut choices = self.categories.list();
        if choices.is_empty() && !allow_create {
            println!("⚠️ No categories found.");
            return None;
        }
        if allow_create {
            choices.push("➕ Create new".to_string());
        }
        choices.push("↩ Back".to_string());

        let idx = ui::select(&mut self.input, "📂 Select a category:", &choices)?;
        let picked = choices[idx].clone();
        if picked == "↩ Back" {
            return None;
        }
        if picked == "➕ Create new" {
            let name = ui::prompt(&mut self.input, "Enter file name (e.g., geography.json)")?;
            return match self.categories.create("", &name) {
                Ok(path) => Some(path),
                Err(msg) => {
                    println!("⚠️ {msg}");
                    None
                }
            };
        }
        Some(self.categories.path_for(&picked))
    }

    fn launch_update_check(&mut self) {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || match update::check_latest_release() {
            Ok(Some(version)) => {
                let _ = tx.send(version);
            }
            Ok(None) => {}
            // Sin red no hay aviso; el arranque nunca depende de esto.
            Err(e) => log::debug!("update check failed: {e}"),
        });
        self.update_rx = Some(rx);
    }

    fn poll_update_result(&mut self) {
        if self.update_notice.is_some() {
            return;
        }
        if let Some(rx) = &self.update_rx {
            if let Ok(version) = rx.try_recv() {
                self.update_notice = Some(version);
            }
        }
    }
}
