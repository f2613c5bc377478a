use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_catvault"))
}

struct TestEnv {
    _base: TempDir,
    config_home: PathBuf,
    data_home: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let base = TempDir::new().expect("tempdir");
        let config_home = base.path().join("config");
        let data_home = base.path().join("data");
        std::fs::create_dir_all(&config_home).expect("create config dir");
        std::fs::create_dir_all(&data_home).expect("create data dir");

        let env = Self {
            _base: base,
            config_home,
            data_home,
        };
        env.write_config();
        env
    }

    /// Point the CLI at a sqlite store inside the sandbox; the keychain
    /// backend would touch the real OS keychain.
    fn write_config(&self) {
        let config_dir = self.config_home.join("catvault");
        std::fs::create_dir_all(&config_dir).expect("create catvault config dir");
        let db_path = self.data_home.join("vault.db");
        let contents = format!(
            "[store]\nbackend = \"sqlite\"\nservice = \"catvault-test\"\npath = \"{}\"\n",
            db_path.display()
        );
        std::fs::write(config_dir.join("config.toml"), contents).expect("write config");
    }

    fn run(&self, pin: &str, args: &[&str]) -> Output {
        Command::new(bin())
            .args(args)
            .env("XDG_CONFIG_HOME", &self.config_home)
            .env("XDG_DATA_HOME", &self.data_home)
            .env("CATVAULT_PIN", pin)
            .output()
            .expect("command should run")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn extract_note_id(text: &str) -> String {
    let start = text.find("note_").expect("output should contain a note id");
    text[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn init_vault(env: &TestEnv, pin: &str) {
    let output = env.run(pin, &["init", "--no-input"]);
    assert!(
        output.status.success(),
        "init failed: {}",
        stderr(&output)
    );
}

#[test]
fn test_init_add_list_show_delete_flow() {
    let env = TestEnv::new();
    init_vault(&env, "1234");

    let output = env.run("1234", &["add", "--text", "milk and tuna", "--no-input"]);
    assert!(output.status.success(), "add failed: {}", stderr(&output));
    let id = extract_note_id(&stdout(&output));

    let output = env.run("1234", &["list", "--format", "plain"]);
    assert!(output.status.success(), "list failed: {}", stderr(&output));
    let listed = stdout(&output);
    assert!(listed.contains(&id));
    assert!(listed.contains("milk and tuna"));

    let output = env.run("1234", &["show", &id]);
    assert!(output.status.success(), "show failed: {}", stderr(&output));
    assert!(stdout(&output).contains("milk and tuna"));

    let output = env.run("1234", &["delete", &id, "--yes"]);
    assert!(output.status.success(), "delete failed: {}", stderr(&output));

    let output = env.run("1234", &["list", "--format", "plain"]);
    assert!(!stdout(&output).contains(&id));
}

#[test]
fn test_wrong_pin_is_rejected() {
    let env = TestEnv::new();
    init_vault(&env, "1234");

    let output = env.run("9999", &["list", "--format", "plain"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Incorrect PIN"));
}

#[test]
fn test_commands_require_setup() {
    let env = TestEnv::new();

    let output = env.run("1234", &["add", "--text", "too early", "--no-input"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No PIN set"));
}

#[test]
fn test_init_twice_fails() {
    let env = TestEnv::new();
    init_vault(&env, "1234");

    let output = env.run("1234", &["init", "--no-input"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("already set"));
}

#[test]
fn test_note_is_not_stored_in_plaintext() {
    let env = TestEnv::new();
    init_vault(&env, "1234");

    let output = env.run("1234", &["add", "--text", "TOPSECRET_MARKER", "--no-input"]);
    assert!(output.status.success(), "add failed: {}", stderr(&output));

    let db = std::fs::read(db_path(&env)).expect("read db");
    let haystack = String::from_utf8_lossy(&db);
    assert!(!haystack.contains("TOPSECRET_MARKER"));
}

fn db_path(env: &TestEnv) -> PathBuf {
    Path::new(&env.data_home).join("vault.db")
}
