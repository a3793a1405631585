use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, catalog, stderr_of, stdout_of};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("✓ Created .tdqarc.json"));
    assert!(stdout.contains("  rules:    resources/teradataQualityCheckRules.xml (not found yet)\n"));
    assert!(stdout.contains("  keywords: resources/Teradata_Reserved_Words.csv (not found yet)\n"));
    assert!(stdout.contains("  report:   output/junit-QACheck.xml (junit)\n"));

    let content = test.read_file(".tdqarc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["rulesFile"], "resources/teradataQualityCheckRules.xml");
    assert_eq!(parsed["reportFormat"], "junit");
    assert_eq!(parsed["rootMarkers"], serde_json::json!(["TERADATA", "DBAI"]));

    Ok(())
}

#[test]
fn test_init_reports_existing_inputs() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("resources/teradataQualityCheckRules.xml", &catalog("", "", ""))?;

    let output = test.command().arg("init").output()?;
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("  rules:    resources/teradataQualityCheckRules.xml (found)\n"));
    assert!(stdout.contains("  keywords: resources/Teradata_Reserved_Words.csv (not found yet)\n"));

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".tdqarc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Error: .tdqarc.json already exists"));
    assert_eq!(test.read_file(".tdqarc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;

    test.write_file(
        "resources/teradataQualityCheckRules.xml",
        &catalog("", "", ""),
    )?;
    test.write_file("pkg/EXTRACTED/Version.txt", "CR_NUMBER: C7654321\n")?;

    let output = test.check_command().arg("pkg").output()?;
    assert!(
        output.status.success(),
        "Check command should work with initialized config. stderr: {}",
        stderr_of(&output)
    );
    assert!(test.root().join("output/junit-QACheck.xml").exists());

    Ok(())
}
