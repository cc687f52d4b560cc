use crate::domain::{DuplicateGroup, SelectionSet};
use crate::ports::SelectionPort;
use crate::services::all_candidates;
use anyhow::Result;
use console::{Term, style};
use dialoguer::{Confirm, MultiSelect, Select, theme::ColorfulTheme};

/// Terminal selection surface: per-group checklists of candidates, with the
/// original always kept, followed by a confirmation. Prompts go to stderr so
/// stdout carries only the report.
pub struct InteractiveSelectionAdapter {
    term: Term,
    assume_yes: bool,
}

impl InteractiveSelectionAdapter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            assume_yes: false,
        }
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    fn ensure_cursor_visible(&self) {
        let _ = self.term.show_cursor();
    }

    fn review_groups(&self, groups: &[DuplicateGroup]) -> Result<SelectionSet> {
        let mut selection = SelectionSet::new();
        for (i, group) in groups.iter().enumerate() {
            self.term.write_line(&format!(
                "\n{}",
                style(format!("Group {} of {} (hash: {}...)", i + 1, groups.len(), group.fingerprint.short())).bold()
            ))?;
            self.term
                .write_line(&format!("  {} {}", style("keep").green(), group.original.display()))?;

            let items: Vec<String> = group
                .candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            let picked = MultiSelect::with_theme(&ColorfulTheme::default())
                .with_prompt("Select copies to delete (space to toggle, enter to confirm)")
                .items(&items)
                .interact_on(&self.term)?;

            selection.extend(picked.into_iter().map(|idx| group.candidates[idx].clone()));
        }
        Ok(selection)
    }

    pub fn confirm(&self, count: usize) -> Result<bool> {
        if count == 0 {
            return Ok(false);
        }
        if self.assume_yes {
            return Ok(true);
        }

        self.term
            .write_line(&format!("\n{}", style("Deleted files cannot be recovered.").bold().red()))?;
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Are you sure you want to delete {} selected duplicate files?", count))
            .default(false)
            .interact_on(&self.term)?;
        if !confirmed {
            self.term.write_line("Operation cancelled.")?;
        }
        Ok(confirmed)
    }
}

impl Default for InteractiveSelectionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionPort for InteractiveSelectionAdapter {
    fn select(&self, groups: &[DuplicateGroup]) -> Result<SelectionSet> {
        if groups.is_empty() {
            return Ok(SelectionSet::new());
        }

        let actions = [
            "Review each group individually",
            "Select all duplicate groups (keep originals)",
            "Exit without changes",
        ];
        let choice = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("What would you like to do?")
            .items(&actions)
            .default(0)
            .interact_on(&self.term)?;

        let selection = match choice {
            0 => self.review_groups(groups)?,
            1 => all_candidates(groups),
            _ => SelectionSet::new(),
        };

        let confirmed = self.confirm(selection.len())?;
        self.ensure_cursor_visible();
        Ok(if confirmed { selection } else { SelectionSet::new() })
    }
}
