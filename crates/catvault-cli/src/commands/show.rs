//! Show a single note.

use catvault_core::{NoBiometrics, NoteId};

use crate::app::auth::authenticate;
use crate::app::AppContext;
use crate::cli::ShowArgs;
use crate::ui;

pub fn handle_show(ctx: &AppContext, args: &ShowArgs) -> anyhow::Result<()> {
    let id = NoteId::parse(&args.id).map_err(|e| anyhow::anyhow!("{}", e))?;

    let vault = ctx.open_vault()?;
    authenticate(&vault, &NoBiometrics, false)?;

    let viewed = vault.view_note(&id)?;
    ui::print_warnings(&viewed.warnings);
    println!("{}", viewed.content);
    Ok(())
}
