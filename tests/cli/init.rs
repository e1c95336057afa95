use anyhow::{Context, Result};
use insta_cmd::assert_cmd_snapshot;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["entry", "functionName", "mangle", "output", "merge", "trailingNewline"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(parsed["functionName"], "__");
    assert_eq!(parsed["output"], false);

    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    assert_cmd_snapshot!(test.command().arg("init"), @r"
    success: true
    exit_code: 0
    ----- stdout -----
    ✓ Created .transkeyrc.json

    ----- stderr -----
    ");

    assert!(test.root().join(".transkeyrc.json").exists());

    let content = test.read_file(".transkeyrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".transkeyrc.json", "{}")?;

    let result = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(result.code, Some(1));
    assert!(result.stderr.contains(".transkeyrc.json already exists"));
    assert_eq!(test.read_file(".transkeyrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;

    test.write_file("src/index.js", r#"console.log(__("hello"));"#)?;

    let result = run(test.extract_command())?;
    assert_eq!(
        result.code,
        Some(0),
        "Extract should work with initialized config. stderr: {}",
        result.stderr
    );
    assert!(result.stdout.contains("Extracted 1 key from 1 module"));

    Ok(())
}
