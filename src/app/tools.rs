use std::fs;
use std::path::Path;

use super::App;
use crate::categories::csv_files;
use crate::engine::InputSource;
use crate::validation::{is_file_valid, FileKind};
use crate::{convert, remote, templates, ui};

impl App {
    pub(super) fn handle_tools_menu(&mut self) {
        loop {
            let choices = [
                "🧾 Convert CSV to JSON",
                "📤 Export JSON to CSV",
                "📄 Create CSV template",
                "📄 Create JSON template",
                "🌐 Import remote CSV/JSON",
                "↩ Back",
            ];
            let Some(choice) =
                ui::select(&mut self.input, "🧰 Tools - Choose an option:", &choices)
            else {
                return;
            };
            match choice {
                0 => self.handle_csv_to_json(),
                1 => self.handle_json_to_csv(),
                2 => match templates::create_csv_template(&self.paths.csv_dir, "template.csv") {
                    Ok(path) => println!("✅ CSV template created at: {}", path.display()),
                    Err(e) => println!("⚠️ Could not create CSV template: {e}"),
                },
                3 => {
                    match templates::create_json_template(
                        &self.paths.categories_dir,
                        "example_template.json",
                    ) {
                        Ok(path) => {
                            self.categories.refresh();
                            println!("✅ JSON template created at: {}", path.display());
                        }
                        Err(e) => println!("⚠️ Could not create JSON template: {e}"),
                    }
                }
                4 => self.import_remote_file(),
                _ => return,
            }
        }
    }

    fn handle_csv_to_json(&mut self) {
        let mut choices = csv_files(&self.paths.csv_dir);
        if choices.is_empty() {
            println!("⚠️ No CSV files found.");
            return;
        }
        choices.push("↩ Back".to_string());
        let Some(idx) =
            ui::select(&mut self.input, "📄 Choose a CSV file to convert:", &choices)
        else {
            return;
        };
        if idx + 1 == choices.len() {
            return;
        }
        let csv_choice = choices[idx].clone();

        let Some(folder) = ui::prompt(
            &mut self.input,
            "Folder under 'categories' (empty for the root, e.g., history/antiquity)",
        ) else {
            return;
        };
        let folder_path = if folder.is_empty() {
            self.paths.categories_dir.clone()
        } else {
            self.paths.categories_dir.join(&folder)
        };

        let src_csv = self.paths.csv_dir.join(&csv_choice);
        let base = Path::new(&csv_choice)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&csv_choice)
            .to_string();
        let out_json = folder_path.join(format!("{base}.json"));

        println!("🔍 Validating CSV file: {csv_choice}");
        if !is_file_valid(&src_csv, FileKind::Csv) {
            println!("❌ CSV validation failed. Please fix the errors and try again.");
            return;
        }

        if let Err(e) = fs::create_dir_all(&folder_path) {
            println!("⚠️ Could not create {}: {e}", folder_path.display());
            return;
        }
        match convert::csv_to_json(&src_csv, &out_json) {
            Ok(()) => {
                self.categories.refresh();
                println!("✅ CSV converted to JSON and saved as: {}", out_json.display());
            }
            Err(e) => println!("⚠️ Conversion failed: {e}"),
        }
    }

    fn handle_json_to_csv(&mut self) {
        let mut choices = self.categories.list();
        if choices.is_empty() {
            println!("⚠️ No JSON files available.");
            return;
        }
        choices.push("↩ Back".to_string());
        let Some(idx) = ui::select(
            &mut self.input,
            "📁 Choose a JSON file to export to CSV:",
            &choices,
        ) else {
            return;
        };
        if idx + 1 == choices.len() {
            return;
        }
        let rel_choice = choices[idx].clone();

        let src_json = self.categories.path_for(&rel_choice);
        let base = Path::new(&rel_choice)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("export")
            .to_string();
        let out_csv = self.paths.csv_dir.join(format!("{base}.csv"));

        println!("🔍 Validating JSON file: {rel_choice}");
        if !is_file_valid(&src_json, FileKind::Json) {
            println!("❌ JSON validation failed. Please fix the errors and try again.");
            return;
        }

        match convert::json_to_csv(&src_json, &out_csv) {
            Ok(()) => println!("✅ JSON successfully exported to CSV: {}", out_csv.display()),
            Err(e) => println!("⚠️ Export failed: {e}"),
        }
    }

    fn import_remote_file(&mut self) {
        let Some(url) = ui::prompt(&mut self.input, "🌐 Enter CSV/JSON URL") else {
            return;
        };
        let Some(base) = ui::prompt(&mut self.input, "💾 Save as (file name without extension)")
        else {
            return;
        };
        if !safe_base_name(&base) {
            println!("⚠️ Invalid file name.");
            return;
        }

        let lower = url.to_lowercase();
        let ext = if lower.ends_with(".csv") {
            "csv"
        } else if lower.ends_with(".json") {
            "json"
        } else {
            match ui::select(
                &mut self.input,
                "🔍 Could not detect file type. Please choose:",
                &["CSV", "JSON"],
            ) {
                Some(0) => "csv",
                Some(_) => "json",
                None => return,
            }
        };

        let dest_dir = if ext == "csv" {
            self.paths.csv_dir.clone()
        } else {
            self.paths.categories_dir.clone()
        };
        let dest_path = dest_dir.join(format!("{base}.{ext}"));

        if dest_path.exists()
            && !self
                .input
                .confirm(&format!("⚠️ '{base}.{ext}' exists. Overwrite?"))
        {
            println!("↩ Canceled.");
            return;
        }

        let saved = match remote::download_remote(&url, &dest_path, true) {
            Ok(saved) => saved,
            Err(e) => {
                println!("⚠️ Download failed: {e}");
                return;
            }
        };

        println!("🔍 Validating downloaded {} file", ext.to_uppercase());
        let kind = if ext == "csv" { FileKind::Csv } else { FileKind::Json };
        if !is_file_valid(&saved, kind) {
            println!(
                "❌ Downloaded {} file is invalid. The file was not added.",
                ext.to_uppercase()
            );
            let _ = fs::remove_file(&saved);
            return;
        }

        if ext == "json" {
            self.categories.refresh();
            println!("✅ JSON file downloaded and added to categories:\n{}", saved.display());
        } else {
            println!("✅ CSV file downloaded to:\n{}", saved.display());
        }
    }
}

fn safe_base_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
