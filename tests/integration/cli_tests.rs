use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Sandbox {
    home: TempDir,
    ws: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            ws: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcli-agents"));
        cmd.env("HOME", self.home.path())
            .env_remove("RUST_LOG")
            .env_remove("QCLI_AGENTS_PROMPTZ_API_URL")
            .env_remove("QCLI_AGENTS_PROMPTZ_API_KEY")
            .arg("--workspace")
            .arg(self.ws.path());
        cmd
    }

    fn local_agent(&self, name: &str) -> std::path::PathBuf {
        self.ws
            .path()
            .join(".amazonq/cli-agents")
            .join(format!("{}.json", name))
    }

    fn global_agent(&self, name: &str) -> std::path::PathBuf {
        self.home
            .path()
            .join(".aws/amazonq/cli-agents")
            .join(format!("{}.json", name))
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_help_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcli-agents"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Manage Q CLI agent configurations and context resources",
        ))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcli-agents"));
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("qcli-agents "));
}

#[test]
fn test_agent_create_and_list() {
    let sb = Sandbox::new();

    sb.cmd()
        .args(["agent", "create", "reviewer", "-d", "Reviews code"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Created agent \"reviewer\" at .amazonq/cli-agents/reviewer.json",
        ));

    let json = read_json(&sb.local_agent("reviewer"));
    assert_eq!(json["name"], "reviewer");
    assert_eq!(json["description"], "Reviews code");
    assert_eq!(json["allowedTools"], serde_json::json!(["fs_read"]));
    assert_eq!(json["useLegacyMcpJson"], true);

    sb.cmd()
        .args(["agent", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reviewer"))
        .stdout(predicate::str::contains("local"));

    sb.cmd()
        .args(["agent", "create", "reviewer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Agent \"reviewer\" already exists"));
}

#[test]
fn test_agent_create_rejects_bad_name() {
    let sb = Sandbox::new();

    sb.cmd()
        .args(["agent", "create", "bad name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Agent name can only contain letters, numbers, hyphens, and underscores",
        ));
    assert!(!sb.local_agent("bad name").exists());
}

#[test]
fn test_agent_create_without_workspace() {
    let sb = Sandbox::new();
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qcli-agents"));
    cmd.env("HOME", sb.home.path())
        .args(["--no-workspace", "agent", "create", "loner", "--global"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No workspace folder found"));
    assert!(!sb.global_agent("loner").exists());
}

#[test]
fn test_agent_new_from_template_and_show() {
    let sb = Sandbox::new();

    sb.cmd()
        .args(["agent", "new", "docs", "--template", "documentation", "--global"])
        .assert()
        .success();
    assert!(sb.global_agent("docs").is_file());

    sb.cmd()
        .args(["agent", "show", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"docs\""));

    sb.cmd()
        .args(["agent", "validate", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));

    sb.cmd()
        .args(["agent", "new", "x", "--template", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown template \"nope\""));
}

#[test]
fn test_agent_new_rejects_path_like_names() {
    let sb = Sandbox::new();

    for name in ["../../escaped", "../x", "nested/agent"] {
        sb.cmd()
            .args(["agent", "new", name, "--template", "basic"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid agent name"));
    }
    assert!(fs::read_dir(sb.ws.path()).unwrap().next().is_none());
    assert!(fs::read_dir(sb.home.path()).unwrap().next().is_none());

    sb.cmd()
        .args(["agent", "delete", "../x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid agent name"));
    sb.cmd()
        .args(["agent", "show", "../x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid agent name"));
}

#[test]
fn test_conflicts_and_delete() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["agent", "create", "dup", "--global"])
        .assert()
        .success();
    sb.cmd().args(["agent", "create", "dup"]).assert().success();

    sb.cmd()
        .args(["agent", "conflicts", "dup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("conflict: yes"))
        .stdout(predicate::str::contains("recommended action: use_local"));

    sb.cmd()
        .args(["agent", "delete", "dup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("still exists in the global location"));
    assert!(!sb.local_agent("dup").exists());
    assert!(sb.global_agent("dup").exists());

    sb.cmd()
        .args(["agent", "delete", "dup"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Agent \"dup\" not found"));
}

#[test]
fn test_validate_reports_broken_agent() {
    let sb = Sandbox::new();
    let path = sb.local_agent("broken");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"name":"other","description":"d","tools":[],"allowedTools":["fs_read"]}"#,
    )
    .unwrap();

    sb.cmd()
        .args(["agent", "validate", "broken"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Agent name must match config name"))
        .stdout(predicate::str::contains(
            "Allowed tool \"fs_read\" must be in tools",
        ));
}

#[test]
fn test_context_add_list_remove() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["agent", "create", "ctx", "--resource", "file://README.md"])
        .assert()
        .success();

    sb.cmd()
        .args(["context", "add", "ctx", "src/"])
        .assert()
        .success();
    sb.cmd()
        .args(["context", "add", "ctx", "docs/**/*.md"])
        .assert()
        .success();
    sb.cmd()
        .args(["context", "add", "ctx", "src/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let json = read_json(&sb.local_agent("ctx"));
    assert_eq!(
        json["resources"],
        serde_json::json!(["file://README.md", "file://src/", "file://docs/**/*.md"])
    );

    sb.cmd()
        .args(["context", "list", "ctx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[directory] src/"))
        .stdout(predicate::str::contains("[glob     ] docs/**/*.md"));

    sb.cmd()
        .args(["context", "remove", "ctx", "README.md"])
        .assert()
        .success();
    let json = read_json(&sb.local_agent("ctx"));
    assert_eq!(
        json["resources"],
        serde_json::json!(["file://src/", "file://docs/**/*.md"])
    );
}

#[test]
fn test_context_check_rejects_traversal() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["context", "check", "../secrets.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid context item"));

    sb.cmd()
        .args(["context", "check", "notes.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file://notes.md (file)"));
}

#[test]
fn test_catalog_listings() {
    let sb = Sandbox::new();
    sb.cmd()
        .arg("templates")
        .assert()
        .success()
        .stdout(predicate::str::contains("developer"));

    sb.cmd()
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("Standard Tools:"))
        .stdout(predicate::str::contains("Experimental Tools:"))
        .stdout(predicate::str::contains("knowledge"));

    sb.cmd()
        .args(["hooks", "--category", "git"])
        .assert()
        .success()
        .stdout(predicate::str::contains("git-status"))
        .stdout(predicate::str::contains("project-info").not());
}

#[test]
fn test_config_show_masks_api_key() {
    let sb = Sandbox::new();
    fs::write(
        sb.home.path().join(".qcli-agents.toml"),
        "[promptz]\napi_url = \"https://promptz.example\"\napi_key = \"secret-key-1234\"\n",
    )
    .unwrap();

    sb.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_url: https://promptz.example"))
        .stdout(predicate::str::contains("***********1234"))
        .stdout(predicate::str::contains("secret-key").not());
}

#[test]
fn test_config_validate_reports_parse_error() {
    let sb = Sandbox::new();
    fs::write(sb.ws.path().join(".qcli-agents.toml"), "[cache\nttl_secs = ").unwrap();

    sb.cmd()
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ Workspace config"))
        .stdout(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn test_promptz_requires_configuration() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["promptz", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PromptZ API URL and API Key must be configured"));
}
