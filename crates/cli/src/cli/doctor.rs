use std::path::Path;

use cp_chat::ChatSession;
use cp_domain::config::{Config, ConfigSeverity};

use crate::bootstrap;

/// Run all diagnostic checks and print a summary.
///
/// Returns `Ok(true)` when every check passes, `Ok(false)` when at least
/// one check failed.
pub async fn run(config: &Config, config_path: &Path) -> anyhow::Result<bool> {
    println!("chatpal doctor");
    println!("==============\n");

    let mut all_passed = true;

    // 1. Config file (informational; defaults are fine)
    check_config_file(config_path);

    // 2. Config validation
    check_config_validation(config, &mut all_passed);

    // 3. Session store
    check_store(config);

    // 4. Chat service health
    match bootstrap::build_session(config) {
        Ok(session) => check_service(&session, &config.service.base_url, &mut all_passed).await,
        Err(e) => {
            print_check("Chat service reachable", false, format!("client not built: {e}"));
            all_passed = false;
        }
    }

    println!();
    if all_passed {
        println!("All checks passed.");
    } else {
        println!("Some checks failed. Review the output above.");
    }

    Ok(all_passed)
}

// ── Individual checks ─────────────────────────────────────────────────

fn check_config_file(config_path: &Path) {
    let exists = config_path.exists();
    print_check(
        "Config file",
        true,
        if exists {
            config_path.display().to_string()
        } else {
            format!("{} not found (using defaults)", config_path.display())
        },
    );
}

fn check_config_validation(config: &Config, all_passed: &mut bool) {
    let issues = config.validate();
    let error_count = issues
        .iter()
        .filter(|e| e.severity == ConfigSeverity::Error)
        .count();

    if issues.is_empty() {
        print_check("Config validation", true, "no issues".into());
        return;
    }

    print_check(
        "Config validation",
        error_count == 0,
        format!("{} issue(s) ({error_count} error(s))", issues.len()),
    );
    for issue in &issues {
        println!("      {issue}");
    }
    if error_count > 0 {
        *all_passed = false;
    }
}

fn check_store(config: &Config) {
    let detail = if config.store.ephemeral {
        "in memory (ephemeral)".to_owned()
    } else {
        let path = config
            .store
            .path
            .clone()
            .unwrap_or_else(bootstrap::default_store_path);
        format!("{}", path.display())
    };
    print_check("Session store", true, detail);
}

async fn check_service(session: &ChatSession, url: &str, all_passed: &mut bool) {
    match session.health().await {
        Ok(health) => {
            let version = health.version.as_deref().unwrap_or("unknown version");
            print_check(
                "Chat service reachable",
                true,
                format!("{url} ({}, {version})", health.status),
            );
        }
        Err(e) => {
            print_check("Chat service reachable", false, format!("{url} ({e})"));
            *all_passed = false;
        }
    }
}

// ── Formatting helper ─────────────────────────────────────────────────

fn print_check(name: &str, passed: bool, detail: String) {
    let status = if passed { "PASS" } else { "FAIL" };
    println!("  [{status}] {name}: {detail}");
}
