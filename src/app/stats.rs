use super::App;
use crate::{scores, ui};

impl App {
    pub(super) fn handle_stats_menu(&mut self) {
        loop {
            let choices = ["📈 View results", "♻️ Reset results", "↩ Back"];
            let Some(choice) = ui::select(&mut self.input, "📊 Statistics", &choices) else {
                return;
            };
            match choice {
                0 => scores::view_scores(&self.paths.scores_file, &mut self.input),
                1 => scores::reset_scores(&self.paths.scores_file, &mut self.input),
                _ => return,
            }
        }
    }
}
