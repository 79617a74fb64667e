//! End-to-end blast radius analysis over real TypeScript projects.

mod common;

use std::path::Path;
use std::sync::Arc;

use common::{engine_for, identity, workspace_with_files};
use ripple::{BlastRadiusEngine, ImpactedFile, RiskLevel, RiskTag, DEFAULT_MAX_DEPTH};

fn distances(files: &[ImpactedFile]) -> Vec<(String, usize)> {
    files
        .iter()
        .map(|f| {
            let name = f
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            (name, f.distance)
        })
        .collect()
}

fn chain_project() -> tempfile::TempDir {
    workspace_with_files(&[
        ("a.ts", "export function greet(name: string) {\n  return `hi ${name}`;\n}\n"),
        (
            "b.ts",
            "import { greet } from './a';\nexport function welcome() {\n  return greet('you');\n}\n",
        ),
        (
            "c.ts",
            "import { welcome } from './b';\nexport const banner = welcome();\n",
        ),
    ])
}

#[test]
fn three_file_chain_reports_each_hop() {
    let dir = chain_project();
    let engine = engine_for(&dir);

    let result = engine
        .analyze(Path::new("a.ts"), "greet", DEFAULT_MAX_DEPTH)
        .expect("analyze should succeed");

    assert_eq!(
        distances(&result.impacted_files),
        vec![("b.ts".to_string(), 1), ("c.ts".to_string(), 2)]
    );
    assert_eq!(result.impacted_files[0].symbols, vec!["welcome"]);
    assert_eq!(result.dependency_chain.len(), 2);
    assert!(result.risk_tags.is_empty());
    // No tags: breadth 2 * 2 plus proximity 2 * 3.
    assert_eq!(result.total_risk_score, 10);
    assert_eq!(result.risk_level(), RiskLevel::Low);
    assert_eq!(result.target_file, identity(&engine, "a.ts"));
}

#[test]
fn default_import_chain_reports_each_hop() {
    let dir = workspace_with_files(&[
        ("a.ts", "export function greet() {\n  return 'hi';\n}\n"),
        (
            "b.ts",
            "import { greet } from './a';\nexport default function welcome() {\n  return greet();\n}\n",
        ),
        ("c.ts", "import welcome from './b';\nexport const banner = welcome();\n"),
    ]);
    let engine = engine_for(&dir);

    let result = engine
        .analyze(Path::new("a.ts"), "greet", DEFAULT_MAX_DEPTH)
        .expect("analyze should succeed");

    assert_eq!(
        distances(&result.impacted_files),
        vec![("b.ts".to_string(), 1), ("c.ts".to_string(), 2)]
    );
    assert_eq!(result.impacted_files[0].symbols, vec!["welcome"]);
    assert_eq!(result.dependency_chain.len(), 2);
    let default_edge = result
        .dependency_chain
        .iter()
        .find(|edge| edge.from == identity(&engine, "c.ts"))
        .expect("c.ts imports b.ts");
    assert_eq!(default_edge.symbols, vec!["welcome"]);
}

#[test]
fn depth_one_stops_at_direct_importers() {
    let dir = chain_project();
    let engine = engine_for(&dir);

    let result = engine
        .analyze(Path::new("a.ts"), "greet", 1)
        .expect("analyze should succeed");

    assert_eq!(distances(&result.impacted_files), vec![("b.ts".to_string(), 1)]);
}

#[test]
fn long_chain_is_bounded_by_depth() {
    let mut files: Vec<(String, String)> = vec![("f0.ts".into(), "export const v0 = 0;\n".into())];
    for i in 1..10 {
        files.push((
            format!("f{i}.ts"),
            format!(
                "import {{ v{prev} }} from './f{prev}';\nexport const v{i} = v{prev} + 1;\n",
                prev = i - 1
            ),
        ));
    }
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();
    let dir = workspace_with_files(&borrowed);
    let engine = engine_for(&dir);

    let result = engine
        .analyze(Path::new("f0.ts"), "v0", 3)
        .expect("analyze should succeed");

    assert_eq!(
        distances(&result.impacted_files),
        vec![
            ("f1.ts".to_string(), 1),
            ("f2.ts".to_string(), 2),
            ("f3.ts".to_string(), 3)
        ]
    );
}

#[test]
fn file_reached_by_usage_and_traversal_appears_once_at_distance_one() {
    let dir = workspace_with_files(&[
        ("a.ts", "export function greet() {}\nexport function wave() {}\n"),
        ("b.ts", "import { greet, wave } from './a';\nexport const both = [greet, wave];\n"),
        ("c.ts", "import './a';\n"),
        ("d.ts", "import { wave } from './a';\n"),
    ]);
    let engine = engine_for(&dir);

    let result = engine
        .analyze(Path::new("a.ts"), "greet", DEFAULT_MAX_DEPTH)
        .expect("analyze should succeed");

    // b names the symbol; c and d reach the file by traversal only.
    let mut seen = distances(&result.impacted_files);
    seen.sort();
    assert_eq!(
        seen,
        vec![
            ("b.ts".to_string(), 1),
            ("c.ts".to_string(), 1),
            ("d.ts".to_string(), 1)
        ]
    );
    assert_eq!(
        result.impacted_files[0].path,
        identity(&engine, "b.ts"),
        "direct users are listed first"
    );
}

#[test]
fn circular_imports_terminate_and_exclude_target() {
    let dir = workspace_with_files(&[
        ("a.ts", "import { b } from './b';\nexport const a = () => b;\n"),
        ("b.ts", "import { a } from './a';\nexport const b = () => a;\n"),
    ]);
    let engine = engine_for(&dir);

    let result = engine
        .analyze(Path::new("a.ts"), "a", DEFAULT_MAX_DEPTH)
        .expect("analyze should succeed");
    let cycles = engine.detect_cycles().expect("initialized");

    assert_eq!(distances(&result.impacted_files), vec![("b.ts".to_string(), 1)]);
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        cycles[0].files,
        vec![identity(&engine, "a.ts"), identity(&engine, "b.ts")]
    );
}

#[test]
fn risky_paths_raise_file_levels_and_total() {
    let dir = workspace_with_files(&[
        ("src/auth/session.ts", "export function login() {}\n"),
        (
            "src/pages/home.ts",
            "import { login } from '../auth/session';\nexport function render() { login(); }\n",
        ),
        (
            "src/payments/charge.ts",
            "import { render } from '../pages/home';\nexport function charge() { render(); }\n",
        ),
    ]);
    let engine = engine_for(&dir);

    let result = engine
        .analyze(Path::new("src/auth/session.ts"), "login", DEFAULT_MAX_DEPTH)
        .expect("analyze should succeed");

    let home = &result.impacted_files[0];
    let payments = &result.impacted_files[1];
    assert!(home.risk_tags.is_empty());
    assert_eq!(home.risk_level, RiskLevel::Low);
    // payment = 95, decayed by two hops to 85.
    assert_eq!(payments.risk_tags, [RiskTag::Payment].into_iter().collect());
    assert_eq!(payments.risk_level, RiskLevel::Critical);
    assert_eq!(payments.distance, 2);
    assert!(result.risk_tags.contains(&RiskTag::Auth));
    assert!(result.risk_tags.contains(&RiskTag::Payment));
    // auth = 90, plus 4 breadth and 6 proximity.
    assert_eq!(result.total_risk_score, 100);
    assert_eq!(result.risk_level(), RiskLevel::Critical);
}

#[test]
fn dependents_direct_and_transitive() {
    let dir = chain_project();
    let engine = engine_for(&dir);

    let direct = engine
        .dependents(Path::new("a.ts"), false, DEFAULT_MAX_DEPTH)
        .expect("initialized");
    let transitive = engine
        .dependents(Path::new("a.ts"), true, DEFAULT_MAX_DEPTH)
        .expect("initialized");

    assert_eq!(direct.len(), 1);
    assert_eq!(direct[0].path, identity(&engine, "b.ts"));
    assert_eq!(transitive.len(), 2);
    assert_eq!(transitive[1].path, identity(&engine, "c.ts"));
    assert_eq!(transitive[1].distance, 2);
}

#[test]
fn rebuild_is_idempotent() {
    let dir = chain_project();
    let mut engine = engine_for(&dir);
    let first = engine.graph().expect("initialized");

    engine.rebuild(dir.path(), None).expect("rebuild should succeed");
    let second = engine.graph().expect("initialized");

    assert!(!Arc::ptr_eq(&first, &second), "rebuild swaps in a fresh graph");
    assert_eq!(*first, *second, "nodes, reverse imports and edges match");
    assert_eq!(second.len(), 3);
}

#[test]
fn definition_search_finds_unexported_declarations() {
    let dir = workspace_with_files(&[
        ("a.ts", "function helper() {}\nexport const x = helper;\n"),
        ("b.ts", "export class helper {}\n"),
    ]);
    let mut engine = engine_for(&dir);

    let locations = engine
        .find_symbol_definition("helper")
        .expect("initialized");

    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].file_identity, identity(&engine, "a.ts"));
    assert_eq!(locations[0].line, 1);
    assert_eq!(locations[1].file_identity, identity(&engine, "b.ts"));
}

#[test]
fn result_serializes_with_camel_case_fields() {
    let dir = chain_project();
    let engine = engine_for(&dir);
    let result = engine
        .analyze(Path::new("a.ts"), "greet", DEFAULT_MAX_DEPTH)
        .expect("analyze should succeed");

    let json = serde_json::to_value(&result).expect("result should serialize");

    assert_eq!(json["targetSymbol"], "greet");
    assert_eq!(json["totalRiskScore"], 10);
    assert_eq!(json["impactedFiles"][0]["riskLevel"], "low");
    assert_eq!(json["impactedFiles"][0]["distance"], 1);
    assert_eq!(json["dependencyChain"][0]["kind"], "import");
    assert!(json["analyzedAt"].is_string());
}

#[test]
fn queries_before_initialize_fail() {
    let mut engine = BlastRadiusEngine::new();

    let analyze = engine.analyze(Path::new("a.ts"), "greet", DEFAULT_MAX_DEPTH);
    let dependents = engine.dependents(Path::new("a.ts"), true, DEFAULT_MAX_DEPTH);
    let definition = engine.find_symbol_definition("greet");

    assert!(analyze.is_err_and(|e| e.is_precondition()));
    assert!(dependents.is_err_and(|e| e.is_precondition()));
    assert!(definition.is_err_and(|e| e.is_precondition()));
}
