//! End-to-end tests for the detect-then-fix workflow across a
//! multi-document workspace.

use stall_core::engine::cancel::{Cancellable, CancellationToken};
use stall_core::engine::EngineError;
use stall_core::parser::ParsedFile;
use stall_core::rename::{SourceDocument, Workspace, fix_all, plan_fixes};
use stall_core::rules::api_design::naming_findings;
use stall_core::AnalysisEngine;

fn workspace(docs: &[(&str, &str)]) -> Workspace {
    Workspace::from_documents(
        docs.iter()
            .map(|(path, source)| SourceDocument::new(*path, *source))
            .collect(),
    )
}

#[test]
fn detect_and_fix_full_roundtrip() {
    let ws = workspace(&[
        (
            "service.js",
            "export async function loadUser(id) {\n  return db.query(id);\n}\n",
        ),
        (
            "app.js",
            "import { loadUser } from './service.js';\nconst user = await loadUser(1);\n",
        ),
    ]);
    let token = CancellationToken::new();

    let outcome = fix_all(ws, &token).unwrap();

    assert_eq!(outcome.applied.len(), 1);
    assert_eq!(outcome.applied[0].old_name, "loadUser");
    assert_eq!(outcome.applied[0].new_name, "loadUserAsync");

    let service = &outcome.workspace.get("service.js").unwrap().source;
    let app = &outcome.workspace.get("app.js").unwrap().source;
    assert!(service.contains("async function loadUserAsync(id)"));
    assert!(app.contains("import { loadUserAsync } from './service.js';"));
    assert!(app.contains("await loadUserAsync(1);"));

    // Rerunning detection on the fixed workspace finds nothing.
    for doc in outcome.workspace.documents() {
        let file = ParsedFile::from_source(&doc.path, &doc.source);
        assert!(naming_findings(&file).is_empty());
    }
}

#[test]
fn fix_repairs_every_flavor_of_bad_suffix() {
    let ws = workspace(&[(
        "mixed.js",
        concat!(
            "async function plainName() {}\n",
            "async function transposedAsycn() {}\n",
            "async function lowercasedasync() {}\n",
            "async function alreadyDoneAsync() {}\n",
        ),
    )]);
    let token = CancellationToken::new();

    let outcome = fix_all(ws, &token).unwrap();

    let source = &outcome.workspace.get("mixed.js").unwrap().source;
    assert!(source.contains("plainNameAsync()"));
    assert!(source.contains("transposedAsync()"));
    assert!(source.contains("lowercasedAsync()"));
    assert!(source.contains("alreadyDoneAsync()"));
    assert!(!source.contains("AsyncAsync"));
    assert_eq!(outcome.applied.len(), 3);
}

#[test]
fn fix_renames_aliased_method_references() {
    let ws = workspace(&[(
        "api.js",
        concat!(
            "class Api {\n",
            "  async fetchUser() { return this.get('/user'); }\n",
            "}\n",
            "const api = new Api();\n",
            "const handler = api.fetchUser;\n",
            "api.fetchUser();\n",
        ),
    )]);
    let token = CancellationToken::new();

    let outcome = fix_all(ws, &token).unwrap();

    let source = &outcome.workspace.get("api.js").unwrap().source;
    assert!(source.contains("async fetchUserAsync()"));
    assert!(source.contains("const handler = api.fetchUserAsync;"));
    assert!(source.contains("api.fetchUserAsync();"));
}

#[test]
fn plan_fixes_is_read_only() {
    let ws = workspace(&[("a.js", "async function one() {}\nasync function two() {}\n")]);
    let token = CancellationToken::new();

    let plans = plan_fixes(&ws, &token).unwrap();

    assert_eq!(plans.len(), 2);
    let titles: Vec<&str> = plans.iter().map(|p| p.title.as_str()).collect();
    assert!(titles.contains(&"Rename 'one' to 'oneAsync'"));
    assert!(titles.contains(&"Rename 'two' to 'twoAsync'"));
    assert!(ws.get("a.js").unwrap().source.contains("function one()"));
}

#[test]
fn analysis_and_fix_agree_on_findings() {
    let code = r#"
const fs = require('fs');
async function loadConfig() {
    return fs.readFileSync('config.json');
}
"#;
    let engine = AnalysisEngine::new();
    let file = ParsedFile::from_source("config.js", code);

    let diagnostics = engine.analyze(&file).unwrap();

    // One blocking-call diagnostic, one naming diagnostic for the same fn.
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().any(|d| d.rule_id == "R001"));
    assert!(
        diagnostics
            .iter()
            .any(|d| d.rule_id == "A001" && d.message.contains("loadConfigAsync"))
    );

    let ws = workspace(&[("config.js", code)]);
    let outcome = fix_all(ws, &CancellationToken::new()).unwrap();
    assert!(
        outcome
            .workspace
            .get("config.js")
            .unwrap()
            .source
            .contains("async function loadConfigAsync()")
    );
}

#[test]
fn cancellation_stops_midway_without_corrupting_input() {
    let ws = workspace(&[("a.js", "async function doWork() {}\n")]);
    let token = CancellationToken::new();
    token.cancel();

    let result = fix_all(ws.clone(), &token);

    assert!(matches!(result, Err(EngineError::Cancelled)));
    assert!(ws.get("a.js").unwrap().source.contains("doWork"));
}
