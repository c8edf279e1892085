//! Integration Test: UI Isolation
//!
//! **Policy**: `clinic-core` is the headless decision layer. It MUST NOT
//! reference any UI framework - no ratatui, no crossterm. Rendering belongs
//! to surface crates.
//!
//! The separation is what keeps the core testable without a terminal and
//! lets any surface (TUI, web, headless harness) drive the same logic.

use std::fs;
use std::path::{Path, PathBuf};

/// UI framework identifiers that must not appear in core code
const FORBIDDEN: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_has_no_ui_framework_references() {
    let core_src = workspace_root().join("clinic/core/src");
    assert!(
        core_src.exists(),
        "expected core sources at {}",
        core_src.display()
    );

    let mut violations = Vec::new();

    for entry in walkdir::WalkDir::new(&core_src)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) == Some("rs") {
            check_file(entry.path(), &mut violations);
        }
    }

    assert!(
        violations.is_empty(),
        "\nUI framework references found in clinic-core:\n  {}\n\
         Rendering belongs in the surface crates.",
        violations.join("\n  ")
    );
}

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = workspace_root().join("clinic/core/Cargo.toml");
    let content = fs::read_to_string(&manifest).expect("core manifest readable");

    for forbidden in FORBIDDEN {
        assert!(
            !content.contains(forbidden),
            "clinic-core Cargo.toml references {forbidden}"
        );
    }
}

fn check_file(path: &Path, violations: &mut Vec<String>) {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (idx, line) in content.lines().enumerate() {
        // Skip comments - the crate docs may name the frameworks they exclude
        let code_part = line.split("//").next().unwrap_or(line);

        for forbidden in FORBIDDEN {
            if code_part.contains(forbidden) {
                violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
            }
        }
    }
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("enforcement crate lives two levels below the workspace root")
        .to_path_buf()
}
