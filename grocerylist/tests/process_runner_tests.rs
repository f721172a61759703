//! End-to-end tests against a fake dstask executable
//!
//! Serialized so no other test forks while a script is still open for writing.
#![cfg(unix)]

use grocerylist::config::YamlConfig;
use grocerylist::dstask::ToolLauncher;
use grocerylist::{Config, GroceryError, GroceryList, ItemId, ParseMode};
use serial_test::serial;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes a fake dstask that logs its argv and prints canned output per verb
fn fake_dstask(dir: &Path) -> PathBuf {
    let script = dir.join("dstask");
    let log = dir.join("calls.log");
    let body = format!(
        r#"#!/bin/sh
echo "$*" >> "{log}"
case "$1" in
  next)
    echo "3 pending milk +grocery"
    echo "4 pending free range eggs +grocery"
    ;;
  show-resolved)
    printf '[\n  {{"id": 7, "summary": "tea", "status": "resolved", "tags": ["grocery"]}}\n]\n'
    ;;
  done)
    if [ "$2" = "99" ]; then
      echo "no task with id 99" >&2
      exit 1
    fi
    ;;
esac
"#,
        log = log.display()
    );
    fs::write(&script, body).unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

fn calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

fn list_for(dir: &Path) -> GroceryList {
    let config = Config {
        tool: fake_dstask(dir).display().to_string(),
        use_version_manager: false,
        ..Config::default()
    };
    GroceryList::new(config)
}

#[test]
#[serial]
fn test_list_pending_through_real_subprocess() {
    let temp_dir = TempDir::new().unwrap();
    let list = list_for(temp_dir.path());

    let items = list.list_pending().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].summary, "free range eggs");
    assert_eq!(calls(temp_dir.path()), vec!["next +grocery"]);
}

#[test]
#[serial]
fn test_add_passes_description_as_single_argument() {
    let temp_dir = TempDir::new().unwrap();
    let list = list_for(temp_dir.path());

    let message = list.add_item("bread & \"butter\"").unwrap();
    assert_eq!(message, "Added \"bread & \"butter\"\" to grocery list");
    assert_eq!(calls(temp_dir.path()), vec!["add bread & \"butter\" +grocery"]);
}

#[test]
#[serial]
fn test_failed_done_reports_stderr() {
    let temp_dir = TempDir::new().unwrap();
    let list = list_for(temp_dir.path());

    let err = list.mark_done(&ItemId::from("99")).unwrap_err();
    assert!(matches!(err, GroceryError::ExternalTool { .. }));
    assert_eq!(err.to_string(), "dstask command failed: no task with id 99");
}

#[test]
#[serial]
fn test_clear_removes_resolved_items() {
    let temp_dir = TempDir::new().unwrap();
    let list = list_for(temp_dir.path());

    assert_eq!(list.clear_resolved().unwrap(), "Cleared 1 bought item(s)");
    assert_eq!(
        calls(temp_dir.path()),
        vec!["show-resolved +grocery", "remove 7"]
    );
}

#[test]
#[serial]
fn test_missing_tool_is_external_tool_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        tool: temp_dir.path().join("no-dstask-here").display().to_string(),
        use_version_manager: false,
        ..Config::default()
    };
    let list = GroceryList::new(config);
    assert!(matches!(list.launcher(), ToolLauncher::Direct { .. }));

    let err = list.list_pending().unwrap_err();
    assert!(err.is_external_tool());
}

#[test]
#[serial]
fn test_yaml_config_file_is_applied() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    fs::write(
        &path,
        "tool: /opt/dstask/bin/dstask\nmarker_tag: \"+shopping\"\nuse_version_manager: false\noutput_format: text\n",
    )
    .unwrap();

    let mut config = Config::default();
    YamlConfig::load_from_file(&path)
        .unwrap()
        .apply_to_config(&mut config);

    assert_eq!(config.tool, "/opt/dstask/bin/dstask");
    assert_eq!(config.marker_tag, "+shopping");
    assert!(!config.use_version_manager);
    assert_eq!(config.output_format, ParseMode::Text);
}
