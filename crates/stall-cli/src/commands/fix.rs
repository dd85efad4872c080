//! Fix command - renames async functions so they carry the Async suffix

use crate::commands::check::discover_files;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use stall_core::engine::CancellationToken;
use stall_core::rename::{fix_all, plan_fixes, SourceDocument, Workspace};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug)]
pub struct FixArgs {
    /// Path to file or directory to fix
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Show the renames that would be applied without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl FixArgs {
    pub fn run(&self) -> Result<()> {
        self.configure_colors();

        let root = self.path.clone().unwrap_or_else(|| PathBuf::from("."));
        let files = discover_files(&root)?;

        if files.is_empty() {
            println!("No JavaScript/TypeScript files found.");
            return Ok(());
        }

        let mut documents = Vec::with_capacity(files.len());
        for file in &files {
            let source = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            documents.push(SourceDocument::new(file.to_string_lossy(), source));
        }
        let workspace = Workspace::from_documents(documents);
        let token = CancellationToken::new();
        debug!(files = files.len(), "built rename workspace");

        if self.dry_run {
            return self.report_plans(&workspace, &token);
        }

        let before = workspace.clone();
        let outcome = fix_all(workspace, &token)?;

        if outcome.applied.is_empty() {
            println!("No async naming issues found.");
            return Ok(());
        }

        let mut written = 0usize;
        for doc in outcome.workspace.documents() {
            let unchanged = before
                .get(&doc.path)
                .is_some_and(|old| old.source == doc.source);
            if unchanged {
                continue;
            }
            fs::write(&doc.path, &doc.source)
                .with_context(|| format!("Failed to write {}", doc.path))?;
            written += 1;
        }

        for plan in &outcome.applied {
            println!("{} {}", "✓".green().bold(), plan.title);
        }
        println!(
            "\nApplied {} rename(s) across {} file(s)",
            outcome.applied.len(),
            written
        );
        Ok(())
    }

    fn report_plans(&self, workspace: &Workspace, token: &CancellationToken) -> Result<()> {
        let plans = plan_fixes(workspace, token)?;

        if plans.is_empty() {
            println!("No async naming issues found.");
            return Ok(());
        }

        for plan in &plans {
            println!("{} {}", "would apply:".yellow(), plan.title);
        }
        println!("\n{} rename(s) pending (dry run, nothing written)", plans.len());
        Ok(())
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var("NO_COLOR").is_ok();
        if self.no_color || no_color_env {
            colored::control::set_override(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn fix_args(path: PathBuf, dry_run: bool) -> FixArgs {
        FixArgs {
            path: Some(path),
            dry_run,
            no_color: true,
        }
    }

    #[test]
    fn fix_renames_declaration_and_call_sites() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.js");
        fs::write(
            &file_path,
            "async function loadUser() { return 1; }\nloadUser();",
        )
        .unwrap();

        fix_args(file_path.clone(), false).run().unwrap();

        let updated = fs::read_to_string(&file_path).unwrap();
        assert!(updated.contains("async function loadUserAsync()"));
        assert!(updated.contains("loadUserAsync();"));
        assert!(!updated.contains("loadUser();"));
    }

    #[test]
    fn fix_rewrites_references_in_sibling_files() {
        let dir = tempdir().unwrap();
        let lib = dir.path().join("lib.js");
        let main = dir.path().join("main.js");
        fs::write(&lib, "export async function fetchData() { return 0; }").unwrap();
        fs::write(&main, "import { fetchData } from './lib.js';\nfetchData();").unwrap();

        fix_args(dir.path().to_path_buf(), false).run().unwrap();

        let lib_src = fs::read_to_string(&lib).unwrap();
        let main_src = fs::read_to_string(&main).unwrap();
        assert!(lib_src.contains("fetchDataAsync"));
        assert!(main_src.contains("import { fetchDataAsync }"));
        assert!(main_src.contains("fetchDataAsync();"));
    }

    #[test]
    fn dry_run_leaves_files_untouched() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.js");
        let original = "async function loadUser() { return 1; }";
        fs::write(&file_path, original).unwrap();

        fix_args(file_path.clone(), true).run().unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), original);
    }

    #[test]
    fn fix_repairs_misspelled_suffix() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.js");
        fs::write(&file_path, "async function saveAsycn() {}").unwrap();

        fix_args(file_path.clone(), false).run().unwrap();

        let updated = fs::read_to_string(&file_path).unwrap();
        assert!(updated.contains("saveAsync"));
        assert!(!updated.contains("saveAsycn"));
    }

    #[test]
    fn fix_reports_clean_tree() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.js");
        fs::write(&file_path, "async function loadAsync() {}").unwrap();

        let result = fix_args(file_path.clone(), false).run();

        assert!(result.is_ok());
        assert_eq!(
            fs::read_to_string(&file_path).unwrap(),
            "async function loadAsync() {}"
        );
    }
}
