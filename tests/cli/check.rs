use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, REPORT_FILE, catalog, stderr_of, stdout_of};

const TABLE: &str = "pkg/EXTRACTED/TERADATA/P_D_BAL_001/P_D_BAL_001_STD_0.FACT_A.tbl";
const TABLE_ID: &str = "/TERADATA/P_D_BAL_001/P_D_BAL_001_STD_0.FACT_A.tbl";
const ROLLBACK: &str = "pkg/EXTRACTED/TERADATA/ROLLBACK/P_D_BAL_001_Rollback_Drop_Tables.sql";
const VERSION: &str = "pkg/EXTRACTED/Version.txt";

fn multiset_rules() -> String {
    catalog(
        r#"<when name="Create Table" value="CREATE" type="CONTAINS" scope="LINE" filter="CREATE_TABLE"/>"#,
        r#"<action name="Multiset" textMatch="MULTISET"/>"#,
        r#"<rule when="Create Table" action="Multiset" level="error" message="Tables must be MULTISET [[TD-1]]"/>"#,
    )
}

/// Write a one-table package whose table is rolled back.
fn write_package(test: &CliTest, ddl: &str) -> Result<()> {
    test.write_file(VERSION, "RELEASE: 2.3\nCR_NUMBER: C1234567\n")?;
    test.write_file(TABLE, ddl)?;
    test.write_file(ROLLBACK, "DROP TABLE P_D_BAL_001_STD_0.FACT_A;\n")?;
    Ok(())
}

#[test]
fn test_clean_package() -> Result<()> {
    let test = CliTest::with_rules(&multiset_rules())?;
    write_package(&test, "CREATE MULTISET TABLE P_D_BAL_001_STD_0.FACT_A (\n  ID INTEGER\n);\n")?;

    let output = test.check_command().arg("pkg").output()?;
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert!(stdout.contains("info: The Change Record Number is: C1234567"));
    assert!(stdout.contains("These objects are created and rolled back: \n    P_D_BAL_001_STD_0.FACT_A"));
    assert!(stdout.contains("These objects are deleted and rolled back: \n    P_D_BAL_001_STD_0.FACT_A"));
    assert!(stdout.contains("✓ Checked 3 artifacts - no failures or warnings"));
    assert!(stdout.contains("Report:"));

    let report = test.read_file(REPORT_FILE)?;
    assert!(report.contains(r#"tests="3" failures="0" errors="0""#));
    assert!(report.contains(&format!(r#"<testcase name="{TABLE_ID}" classname="{TABLE_ID}"/>"#)));

    Ok(())
}

#[test]
fn test_rule_failure_blocks_build() -> Result<()> {
    let test = CliTest::with_rules(&multiset_rules())?;
    write_package(&test, "CREATE SET TABLE P_D_BAL_001_STD_0.FACT_A (\n  ID INTEGER\n);\n")?;

    let output = test.check_command().arg("pkg").output()?;
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains(&format!(
        "error: Tables must be MULTISET [[TD-1]]\n  --> {TABLE_ID}\n"
    )));
    assert!(stdout.contains("1 failed"));

    let report = test.read_file(REPORT_FILE)?;
    assert!(report.contains(r#"<failure type="failure" message="Tables must be MULTISET [[TD-1]]"/>"#));

    Ok(())
}

#[test]
fn test_missing_rollback_is_a_failure() -> Result<()> {
    let test = CliTest::with_rules(&multiset_rules())?;
    test.write_file(VERSION, "CR_NUMBER: C1234567\n")?;
    test.write_file(TABLE, "CREATE MULTISET TABLE P_D_BAL_001_STD_0.FACT_A (ID INTEGER);\n")?;

    let output = test.check_command().arg("pkg").output()?;
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("error: These objects are created but not rolled back: \n    P_D_BAL_001_STD_0.FACT_A"));
    assert!(stdout.contains("  --> .Object Counts"));

    Ok(())
}

#[test]
fn test_malformed_change_request_number_warns() -> Result<()> {
    let test = CliTest::with_rules(&multiset_rules())?;
    write_package(&test, "CREATE MULTISET TABLE P_D_BAL_001_STD_0.FACT_A (ID INTEGER);\n")?;
    test.write_file(VERSION, "CR_NUMBER: TBD\n")?;

    let output = test.check_command().args(["pkg", "--no-report"]).output()?;
    let stdout = stdout_of(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("warning: The Change Record Number is: TBD"));
    assert!(stdout.contains("0 failed, 1 with warning"));

    Ok(())
}

#[test]
fn test_no_report_skips_report_file() -> Result<()> {
    let test = CliTest::with_rules(&multiset_rules())?;
    write_package(&test, "CREATE MULTISET TABLE P_D_BAL_001_STD_0.FACT_A (ID INTEGER);\n")?;

    let output = test.check_command().args(["pkg", "--no-report"]).output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(!stdout_of(&output).contains("Report:"));
    assert!(!test.root().join("output").exists());

    Ok(())
}

#[test]
fn test_json_report() -> Result<()> {
    let test = CliTest::with_rules(&multiset_rules())?;
    write_package(&test, "CREATE SET TABLE P_D_BAL_001_STD_0.FACT_A (ID INTEGER);\n")?;

    let output = test
        .check_command()
        .args(["pkg", "--format", "json", "--report", "qa/report.json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let report: Value = serde_json::from_str(&test.read_file("qa/report.json")?)?;
    assert_eq!(report["suite"], "Teradata Package Check");
    assert_eq!(report["summary"]["artifacts"], 3);
    assert_eq!(report["summary"]["failures"], 1);

    let results = report["results"].as_array().unwrap();
    let table = results.iter().find(|r| r["name"] == TABLE_ID).unwrap();
    assert_eq!(table["failure"], "Tables must be MULTISET [[TD-1]]");
    assert!(table.get("warning").is_none());

    Ok(())
}

#[test]
fn test_config_file_overrides_defaults() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("rules/checks.xml", &multiset_rules())?;
    test.write_file(
        ".tdqarc.json",
        r#"{ "rulesFile": "rules/checks.xml", "reportFile": "qa.json", "reportFormat": "json" }"#,
    )?;
    write_package(&test, "CREATE SET TABLE P_D_BAL_001_STD_0.FACT_A (ID INTEGER);\n")?;

    let output = test.check_command().arg("pkg").output()?;
    assert_eq!(output.status.code(), Some(1));

    let report: Value = serde_json::from_str(&test.read_file("qa.json")?)?;
    assert_eq!(report["summary"]["failures"], 1);

    Ok(())
}

#[test]
fn test_archives_are_not_scanned() -> Result<()> {
    let test = CliTest::with_rules(&catalog(
        r#"<when name="Any Create" value="CREATE" type="CONTAINS" scope="LINE" filter="ALL"/>"#,
        r#"<action name="Multiset" textMatch="MULTISET"/>"#,
        r#"<rule when="Any Create" action="Multiset" level="error" message="Tables must be MULTISET"/>"#,
    ))?;
    write_package(&test, "CREATE MULTISET TABLE P_D_BAL_001_STD_0.FACT_A (ID INTEGER);\n")?;
    test.write_file("pkg/EXTRACTED/TERADATA/bundle.tar", "CREATE SET TABLE X.Y (ID INTEGER);\n")?;

    let output = test.check_command().args(["pkg", "--no-report"]).output()?;

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout_of(&output));
    assert!(!stdout_of(&output).contains("bundle.tar"));

    Ok(())
}

#[test]
fn test_missing_catalog_runs_builtin_checks_only() -> Result<()> {
    let test = CliTest::new()?;
    write_package(&test, "CREATE SET TABLE P_D_BAL_001_STD_0.FACT_A (ID INTEGER);\n")?;

    let output = test.check_command().args(["pkg", "--no-report"]).output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr_of(&output).contains("continuing with no rules"));
    assert!(stdout_of(&output).contains("✓ Checked 2 artifacts"));

    Ok(())
}

#[test]
fn test_unsupported_pattern_runs_builtin_checks_only() -> Result<()> {
    let test = CliTest::with_rules(&catalog(
        r#"<when name="Set Table" value="CREATE (?!MULTISET)" type="MATCHES_PATTERN" scope="LINE" filter="CREATE_TABLE"/>"#,
        r#"<action name="Fail" textMatch="MULTISET"/>"#,
        r#"<rule when="Set Table" action="Fail" level="error" message="Tables must be MULTISET"/>"#,
    ))?;
    write_package(&test, "CREATE SET TABLE P_D_BAL_001_STD_0.FACT_A (ID INTEGER);\n")?;

    let output = test.check_command().args(["pkg", "--no-report"]).output()?;
    let stderr = stderr_of(&output);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr);
    assert!(stderr.contains("invalid pattern"));
    assert!(stderr.contains("continuing with no rules"));
    assert!(stdout_of(&output).contains("✓ Checked 2 artifacts"));

    Ok(())
}

#[test]
fn test_unknown_condition_reference_is_fatal() -> Result<()> {
    let test = CliTest::with_rules(&catalog(
        "",
        r#"<action name="Multiset" textMatch="MULTISET"/>"#,
        r#"<rule when="Nowhere" action="Multiset" level="error" message="Tables must be MULTISET"/>"#,
    ))?;
    write_package(&test, "CREATE SET TABLE P_D_BAL_001_STD_0.FACT_A (ID INTEGER);\n")?;

    let output = test.check_command().arg("pkg").output()?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Error: Invalid rule catalog"));
    assert!(stderr.contains("Nowhere"));

    Ok(())
}

#[test]
fn test_missing_package_directory() -> Result<()> {
    let test = CliTest::with_rules(&multiset_rules())?;

    let output = test.check_command().arg("does-not-exist").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr_of(&output).contains("Package directory not found"));

    Ok(())
}

#[test]
fn test_help_without_command() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().output()?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout_of(&output).contains("Usage: tdqa"));

    Ok(())
}
