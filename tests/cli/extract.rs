use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_extract_writes_global_mapping() -> Result<()> {
    let test = CliTest::with_file(
        ".transkeyrc.json",
        r#"{
  "entry": "./src/index.js",
  "output": "i18n/keys.json",
  "indent": 2,
  "trailingNewline": true
}"#,
    )?;
    test.write_file(
        "src/index.js",
        r#"import { farewell } from "./messages";
console.log(__("greeting"), farewell());
"#,
    )?;
    test.write_file(
        "src/messages.ts",
        r#"export const farewell = (): string => __("farewell") + __("greeting");
"#,
    )?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stdout.contains("Extracted 2 keys from 2 modules"));
    assert!(result.stdout.contains("wrote i18n/keys.json"));

    let content = test.read_file("i18n/keys.json")?;
    assert!(content.ends_with("}\n"));
    insta::assert_snapshot!(content.trim_end(), @r#"
    {
      "greeting": "greeting",
      "farewell": "farewell"
    }
    "#);

    Ok(())
}

#[test]
fn test_extract_mangles_and_rewrites_sources() -> Result<()> {
    let test = CliTest::with_file(
        "src/index.js",
        r#"import "./nav";
const title = __("page.title");
const again = __('page.title');
"#,
    )?;
    test.write_file("src/nav.js", "export const label = __(`nav.home`);\n")?;

    let result = run({
        let mut cmd = test.extract_command();
        cmd.args(["--mangle", "--output", "keys.json", "--out-dir", "dist"]);
        cmd
    })?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert_eq!(test.read_file("keys.json")?, r#"{"page.title":" ","nav.home":"!"}"#);
    assert_eq!(
        test.read_file("dist/src/index.js")?,
        r#"import "./nav";
const title = __(" ");
const again = __(" ");
"#
    );
    assert_eq!(
        test.read_file("dist/src/nav.js")?,
        "export const label = __(\"!\");\n"
    );
    assert!(result.stdout.contains("emitted 2 rewritten modules"));

    Ok(())
}

#[test]
fn test_extract_per_entry_outputs() -> Result<()> {
    let test = CliTest::with_file(
        ".transkeyrc.json",
        r#"{
  "entry": { "app": "./src/app.js", "admin": "./src/admin.js" },
  "output": ["all.json", "locales/[name].json"]
}"#,
    )?;
    test.write_file("src/app.js", "require('./shared');\n__('app.title');\n")?;
    test.write_file("src/admin.js", "__('admin.title');\n")?;
    test.write_file("src/shared.js", "__('shared.ok');\n")?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert_eq!(
        test.read_file("locales/app.json")?,
        r#"{"app.title":"app.title","shared.ok":"shared.ok"}"#
    );
    assert_eq!(
        test.read_file("locales/admin.json")?,
        r#"{"admin.title":"admin.title"}"#
    );
    assert_eq!(
        test.read_file("all.json")?,
        r#"{"app.title":"app.title","shared.ok":"shared.ok","admin.title":"admin.title"}"#
    );

    Ok(())
}

#[test]
fn test_extract_reports_invalid_calls() -> Result<()> {
    let test = CliTest::with_file(
        "src/index.js",
        "const ok = __('ok');\n__();\nconst x = __(key);\n",
    )?;

    let result = run({
        let mut cmd = test.extract_command();
        cmd.args(["--output", "keys.json"]);
        cmd
    })?;

    assert_eq!(result.code, Some(1));
    assert!(
        result
            .stdout
            .contains("error: translation function called without a key  missing-key")
    );
    assert!(result.stdout.contains("--> src/index.js:2:1"));
    assert!(result.stdout.contains(
        "error: dynamic variable \"key\" is not supported as a translation key  dynamic-key"
    ));
    assert!(result.stdout.contains("--> src/index.js:3:11"));
    assert!(result.stdout.contains("✘ 2 problems\n"));
    assert!(!result.stdout.contains("warning"));
    assert_eq!(test.read_file("keys.json")?, r#"{"ok":"ok"}"#);

    Ok(())
}

#[test]
fn test_extract_reports_parse_errors() -> Result<()> {
    let test = CliTest::with_file("src/index.js", "import './broken';\n__('fine');\n")?;
    test.write_file("src/broken.js", "const = ;\n")?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(1));
    assert!(result.stdout.contains("parse-error"));
    assert!(result.stdout.contains("--> src/broken.js"));
    assert!(result.stdout.contains("Extracted 1 key from 2 modules"));

    Ok(())
}

#[test]
fn test_extract_merges_into_existing_file() -> Result<()> {
    let test = CliTest::with_file("src/index.js", "__('hello');\n__('new');\n")?;
    test.write_file("keys.json", r#"{"old":"old","hello":"stale"}"#)?;

    let result = run({
        let mut cmd = test.extract_command();
        cmd.args(["--merge", "--output", "keys.json"]);
        cmd
    })?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert_eq!(
        test.read_file("keys.json")?,
        r#"{"old":"old","hello":"hello","new":"new"}"#
    );

    Ok(())
}

#[test]
fn test_extract_custom_function_name() -> Result<()> {
    let test = CliTest::with_file("src/index.js", "t('picked');\n__('ignored');\n")?;

    let result = run({
        let mut cmd = test.extract_command();
        cmd.args(["--function-name", "t", "--output", "keys.json"]);
        cmd
    })?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert_eq!(test.read_file("keys.json")?, r#"{"picked":"picked"}"#);

    Ok(())
}

#[test]
fn test_extract_from_subdirectory_uses_config_root() -> Result<()> {
    let test = CliTest::with_file(
        ".transkeyrc.json",
        r#"{ "entry": "./web/main.js", "output": "keys.json" }"#,
    )?;
    test.write_file("web/main.js", "__('nested');\n")?;

    let result = run({
        let mut cmd = test.extract_command();
        cmd.args(["--path", "web"]);
        cmd
    })?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert_eq!(test.read_file("keys.json")?, r#"{"nested":"nested"}"#);

    Ok(())
}

#[test]
fn test_extract_rejects_output_true() -> Result<()> {
    let test = CliTest::with_file(".transkeyrc.json", r#"{ "output": true }"#)?;
    test.write_file("src/index.js", "__('a');\n")?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("Invalid 'output'"));

    Ok(())
}

#[test]
fn test_extract_missing_entry_root() -> Result<()> {
    let test = CliTest::new()?;

    let result = run(test.extract_command())?;

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("Entry root \"./src/index.js\""));

    Ok(())
}
