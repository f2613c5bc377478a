//! Save a new note.

use std::io::{self, IsTerminal, Read};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use dialoguer::Confirm;

use catvault_core::{NoBiometrics, SaveMode, VaultError};

use crate::app::auth::authenticate;
use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::ui;

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    authenticate(&vault, &NoBiometrics, args.no_input)?;

    let text = read_note_body(args.no_input, args.text.clone())?;

    let saved = match vault.save_note(&text, SaveMode::EncryptOnly) {
        Ok(saved) => saved,
        Err(err @ VaultError::Crypto(_)) => {
            if !confirm_degraded_save(args)? {
                return Err(err.into());
            }
            vault.save_note(&text, SaveMode::AllowPlaintext)?
        }
        Err(err) => return Err(err.into()),
    };

    ui::print_warnings(&saved.warnings);
    if !ctx.quiet() {
        ui::success(&format!("Saved {}", saved.id));
    }
    Ok(())
}

/// The explicit opt-in for the degraded plaintext save.
fn confirm_degraded_save(args: &AddArgs) -> anyhow::Result<bool> {
    if args.allow_plaintext {
        return Ok(true);
    }
    if args.no_input || !io::stdin().is_terminal() {
        return Ok(false);
    }
    Confirm::new()
        .with_prompt(
            "Failed to encrypt note due to a crypto module issue. \
             Save unencrypted note? (PIN protection still applies)",
        )
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

fn read_note_body(no_input: bool, text: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = text {
        if value.trim().is_empty() {
            return Err(anyhow::anyhow!("--text cannot be empty"));
        }
        return Ok(value);
    }

    if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
        let trimmed = buffer.trim_end().to_string();
        if trimmed.is_empty() {
            return Err(anyhow::anyhow!("No input provided on stdin"));
        }
        return Ok(trimmed);
    }

    if no_input {
        return Err(anyhow::anyhow!("--no-input requires content from stdin"));
    }

    read_body_from_editor()
}

fn read_body_from_editor() -> anyhow::Result<String> {
    let editor = std::env::var("EDITOR")
        .map_err(|_| anyhow::anyhow!("$EDITOR is not set; use --text or pipe content via stdin"))?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("System time error: {}", e))?
        .as_nanos();
    let filename = format!("catvault_note_{}_{}.md", std::process::id(), nanos);
    let path = std::env::temp_dir().join(filename);

    std::fs::write(&path, "").map_err(|e| anyhow::anyhow!("Failed to create temp file: {}", e))?;

    let status = Command::new(editor)
        .arg(&path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to launch editor: {}", e))?;
    if !status.success() {
        let _ = std::fs::remove_file(&path);
        return Err(anyhow::anyhow!("Editor exited with failure"));
    }

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read temp file: {}", e))?;
    let _ = std::fs::remove_file(&path);

    let trimmed = contents.trim_end().to_string();
    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("Note body is empty"));
    }

    Ok(trimmed)
}
