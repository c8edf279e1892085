//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call blocking or polling sleeps.
//! **Exceptions**: the chat composing delay (the one deliberate scheduled
//! delay in the core), frame rate limiting (TUI event loop only), and test
//! code.
//!
//! Sleeping to wait for events hides latency bugs and burns CPU; the one
//! legitimate timer in this app is the simulated composing delay, which is
//! an explicit product behavior, not synchronization.

use std::fs;
use std::path::{Path, PathBuf};

#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:");
        for violation in &violations {
            eprintln!("  {violation}");
        }

        eprintln!("\nACCEPTABLE sleep uses:");
        eprintln!("  - The chat composing delay in clinic/core/src/chat.rs");
        eprintln!("  - Frame rate limiting in tui/src/app.rs");
        eprintln!("  - Test code (#[test] or #[tokio::test] functions)");
        eprintln!("\nFORBIDDEN:");
        eprintln!("  - Sleep in polling loops");
        eprintln!("  - Sleep as poor man's synchronization");
        eprintln!("  - std::thread::sleep anywhere outside tests");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();
    let root = workspace_root();

    check_directory(
        &root.join("clinic/core/src"),
        &mut violations,
        &SleepPolicy {
            allow_composing_delay: true,
            allow_frame_limiting: false,
        },
    );

    check_directory(
        &root.join("tui/src"),
        &mut violations,
        &SleepPolicy {
            allow_composing_delay: false,
            allow_frame_limiting: true,
        },
    );

    violations
}

struct SleepPolicy {
    allow_composing_delay: bool,
    allow_frame_limiting: bool,
}

fn check_directory(dir: &Path, violations: &mut Vec<String>, policy: &SleepPolicy) {
    assert!(dir.exists(), "expected sources at {}", dir.display());

    for entry in walkdir::WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if entry.path().extension().and_then(|s| s.to_str()) == Some("rs") {
            check_file(entry.path(), violations, policy);
        }
    }
}

fn check_file(path: &Path, violations: &mut Vec<String>, policy: &SleepPolicy) {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return,
    };

    let lines: Vec<&str> = content.lines().collect();

    for (idx, line) in lines.iter().enumerate() {
        // Skip comments
        let code_part = line.split("//").next().unwrap_or(line);

        if !(code_part.contains("::sleep(") || code_part.contains(".sleep(")) {
            continue;
        }

        // Blocking sleeps are never acceptable in production code
        let blocking = code_part.contains("thread::sleep");

        // Test code is exempt
        if is_in_test_code(&lines, idx) {
            continue;
        }

        if !blocking {
            // The composing delay in the chat responder
            if policy.allow_composing_delay
                && path.ends_with("clinic/core/src/chat.rs")
                && is_composing_delay_context(&lines, idx)
            {
                continue;
            }

            // Frame rate limiting in the TUI event loop
            if policy.allow_frame_limiting
                && path.ends_with("tui/src/app.rs")
                && is_frame_limiting_context(&lines, idx)
            {
                continue;
            }
        }

        violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
    }
}

/// Check if a line is inside test code (a `#[cfg(test)]` module or a test fn)
fn is_in_test_code(lines: &[&str], current_idx: usize) -> bool {
    for i in (0..current_idx).rev() {
        let line = lines[i].trim();

        if line.starts_with("#[cfg(test)]") {
            return true;
        }

        if line.starts_with("#[test]") || line.starts_with("#[tokio::test") {
            return true;
        }
    }
    false
}

/// Check if a sleep implements the chat composing delay
fn is_composing_delay_context(lines: &[&str], current_idx: usize) -> bool {
    let range = current_idx.saturating_sub(10)..lines.len().min(current_idx + 3);
    for i in range {
        let line = lines[i].to_lowercase();
        if line.contains("composing") || line.contains("delay") {
            return true;
        }
    }
    false
}

/// Check if a sleep is frame rate limiting (acceptable in the TUI loop)
fn is_frame_limiting_context(lines: &[&str], current_idx: usize) -> bool {
    let range = current_idx.saturating_sub(10)..lines.len().min(current_idx + 5);
    for i in range {
        let line = lines[i].to_lowercase();
        if line.contains("frame") || line.contains("fps") || line.contains("tick") {
            return true;
        }
    }
    false
}

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("enforcement crate lives two levels below the workspace root")
        .to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_plain_sleep() {
        let code = vec![
            "fn poll_for_result() {",
            "    std::thread::sleep(Duration::from_millis(10));",
            "}",
        ];
        assert!(!is_in_test_code(&code, 1));
    }

    #[test]
    fn test_frame_limiting_detection() {
        let code = vec![
            "let frame_duration = Duration::from_millis(100);",
            "loop {",
            "    tokio::time::sleep(frame_duration).await;",
            "}",
        ];
        assert!(is_frame_limiting_context(&code, 2));
    }

    #[test]
    fn test_composing_delay_detection() {
        let code = vec![
            "let delay = self.sample_delay();",
            "let task = tokio::spawn(async move {",
            "    tokio::time::sleep(delay).await;",
            "});",
        ];
        assert!(is_composing_delay_context(&code, 2));
    }
}
