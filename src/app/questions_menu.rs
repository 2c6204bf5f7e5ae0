use serde_json::Value;
use std::path::Path;

use super::App;
use crate::engine::InputSource;
use crate::questions;
use crate::{files, ui};

impl App {
    pub(super) fn handle_questions_menu(&mut self) {
        loop {
            let mut choices = self.categories.list();
            if choices.is_empty() {
                println!("⚠️ No categories found.");
                return;
            }
            choices.push("🛠️ Manage categories".to_string());
            choices.push("↩ Back".to_string());

            let Some(idx) = ui::select(
                &mut self.input,
                "📂 Questions - choose a category or option:",
                &choices,
            ) else {
                return;
            };
            let picked = choices[idx].clone();
            if picked == "↩ Back" {
                return;
            }
            if picked == "🛠️ Manage categories" {
                self.handle_categories_management();
                continue;
            }

            let filename = self.categories.path_for(&picked);
            let questions = self.cache.get(&filename);
            self.handle_questions_submenu(&filename, questions);
        }
    }

    fn handle_questions_submenu(&mut self, filename: &Path, mut questions: Vec<Value>) {
        loop {
            let title = format!("📂 Manage questions ({})", filename.display());
            let choices = [
                "📚 Show all questions",
                "🔢 Edit by number",
                "🔢 Delete by number",
                "➕ Add question",
                "📝 Edit question",
                "🗑️ Delete question",
                "💾 Save questions",
                "↩ Back",
            ];
            let Some(choice) = ui::select(&mut self.input, &title, &choices) else {
                return;
            };
            match choice {
                0 => {
                    if questions.is_empty() {
                        println!("⚠️ No questions in this category.");
                    } else {
                        questions::show_questions_paginated(
                            &questions,
                            "📚 Questions",
                            &mut self.input,
                        );
                    }
                }
                1 => {
                    if questions.is_empty() {
                        println!("⚠️ No questions to edit.");
                    } else if let Some(entry) = ui::prompt(
                        &mut self.input,
                        &format!("Enter question number (1-{})", questions.len()),
                    ) {
                        match entry.parse::<usize>() {
                            Ok(n) => questions::edit_question_by_index(
                                &mut questions,
                                n,
                                &mut self.input,
                            ),
                            Err(_) => println!("⚠️ Invalid input."),
                        }
                    }
                }
                2 => {
                    if questions.is_empty() {
                        println!("⚠️ No questions to delete.");
                    } else if let Some(entry) = ui::prompt(
                        &mut self.input,
                        &format!("Enter question number (1-{})", questions.len()),
                    ) {
                        match entry.parse::<usize>() {
                            Ok(n) => {
                                questions::delete_question_by_index(filename, n);
                                questions = self.cache.get(filename);
                            }
                            Err(_) => println!("⚠️ Invalid input."),
                        }
                    }
                }
                3 => {
                    if let Some(q) = questions::create_question(&mut self.input) {
                        questions.push(q);
                    }
                }
                4 => questions::edit_question(&mut questions, &mut self.input),
                5 => {
                    questions::delete_question(filename, &mut self.input);
                    questions = self.cache.get(filename);
                }
                6 => {
                    if files::save_json(filename, &Value::Array(questions.clone())) {
                        self.categories.add(filename);
                        println!("✅ Questions saved.");
                    }
                }
                _ => return,
            }
        }
    }

    fn handle_categories_management(&mut self) {
        loop {
            let choices = [
                "➕ Create new category",
                "✏️ Rename category",
                "🗑️ Delete category",
                "↩ Back",
            ];
            let Some(choice) = ui::select(&mut self.input, "🛠️ Manage categories:", &choices)
            else {
                return;
            };
            match choice {
                0 => self.create_category_flow(),
                1 => self.rename_category_flow(),
                2 => self.delete_category_flow(),
                _ => return,
            }
        }
    }

    fn create_category_flow(&mut self) {
        let Some(folder) = ui::prompt(
            &mut self.input,
            "📁 Enter a folder inside 'categories' (empty for the root, e.g., programming/python)",
        ) else {
            return;
        };
        let Some(name) = ui::prompt(&mut self.input, "📄 Enter file name (e.g., loops.json)")
        else {
            return;
        };
        match self.categories.create(&folder, &name) {
            Ok(path) => println!("✅ New category created: {}", path.display()),
            Err(msg) => println!("⚠️ {msg}"),
        }
    }

    fn rename_category_flow(&mut self) {
        let mut choices = self.categories.list();
        if choices.is_empty() {
            println!("⚠️ No categories to rename.");
            return;
        }
        choices.push("↩ Back".to_string());
        let Some(idx) =
            ui::select(&mut self.input, "✏️ Choose a category to rename:", &choices)
        else {
            return;
        };
        if idx + 1 == choices.len() {
            return;
        }
        let old_rel = choices[idx].clone();

        let Some(new_name) = ui::prompt(&mut self.input, "📝 New file name (without .json)")
        else {
            return;
        };

        match self.categories.rename(&old_rel, &new_name, false) {
            Ok(path) => println!("✅ Category renamed: {}", path.display()),
            Err(msg) if msg.contains("already exists") => {
                if self.input.confirm(&format!("⚠️ {msg} Overwrite?")) {
                    match self.categories.rename(&old_rel, &new_name, true) {
                        Ok(path) => println!("✅ Category renamed: {}", path.display()),
                        Err(msg) => println!("⚠️ {msg}"),
                    }
                } else {
                    println!("↩ Rename canceled.");
                }
            }
            Err(msg) => println!("⚠️ {msg}"),
        }
    }

    fn delete_category_flow(&mut self) {
        let mut choices = self.categories.list();
        if choices.is_empty() {
            println!("⚠️ No categories to delete.");
            return;
        }
        choices.push("↩ Back".to_string());
        let Some(idx) =
            ui::select(&mut self.input, "🗑️ Choose a category to delete:", &choices)
        else {
            return;
        };
        if idx + 1 == choices.len() {
            return;
        }
        let rel = choices[idx].clone();

        if self
            .input
            .confirm(&format!("⚠️ Are you sure you want to delete category: {rel}?"))
        {
            match self.categories.delete(&rel) {
                Ok(()) => println!("❌ Category deleted: {rel}"),
                Err(msg) => println!("⚠️ {msg}"),
            }
        } else {
            println!("↩ Deletion canceled.");
        }
    }
}
