//! Delete a note.

use std::io::IsTerminal;

use dialoguer::Confirm;

use catvault_core::{NoBiometrics, NoteId};

use crate::app::auth::authenticate;
use crate::app::AppContext;
use crate::cli::DeleteArgs;
use crate::ui;

pub fn handle_delete(ctx: &AppContext, args: &DeleteArgs) -> anyhow::Result<()> {
    let id = NoteId::parse(&args.id).map_err(|e| anyhow::anyhow!("{}", e))?;

    let vault = ctx.open_vault()?;
    authenticate(&vault, &NoBiometrics, false)?;

    if !args.yes {
        if !std::io::stdin().is_terminal() {
            return Err(anyhow::anyhow!("Refusing to delete without --yes"));
        }
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {}?", id))
            .default(false)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))?;
        if !confirmed {
            return Ok(());
        }
    }

    vault.delete_note(&id)?;
    if !ctx.quiet() {
        ui::success(&format!("Deleted {}", id));
    }
    Ok(())
}
