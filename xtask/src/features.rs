use std::process::Command;

use anyhow::{Context, Result};

/// `appraisal-common` is the only crate with opt-in features.
const FEATURE_COMBINATIONS: &[&[&str]] = &[
    &[], // no features
    &["foundation"],
    &["test-utils"],
];

/// Check that every supported feature combination compiles on its own.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} appraisal-common feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, features) in FEATURE_COMBINATIONS.iter().enumerate() {
        let joined = features.join(",");
        let label = if features.is_empty() { "none".to_string() } else { joined.clone() };

        println!(
            "\n[{}/{}] cargo check -p appraisal-common --no-default-features{}",
            index + 1,
            FEATURE_COMBINATIONS.len(),
            if features.is_empty() { String::new() } else { format!(" --features {joined}") }
        );

        let mut command = Command::new("cargo");
        command.args(["check", "-p", "appraisal-common", "--no-default-features"]);
        if !features.is_empty() {
            command.arg("--features").arg(&joined);
        }

        let status =
            command.status().with_context(|| format!("Failed to run cargo check for '{label}'"))?;

        if !status.success() {
            anyhow::bail!("Feature combination '{label}' failed to compile");
        }

        println!("✅ Features '{label}' compiled successfully");
    }

    println!("\n✅ All {} feature combinations compile successfully!", FEATURE_COMBINATIONS.len());

    Ok(())
}
