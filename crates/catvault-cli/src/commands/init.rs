//! First-run setup: choose a PIN and create the master key.

use catvault_core::KeyProvider;

use crate::app::auth::prompt_new_pin;
use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::write_config;
use crate::ui;

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;

    if vault.keys().pin_is_set()? {
        return Err(anyhow::anyhow!(
            "A PIN is already set. The vault is ready to use."
        ));
    }

    let pin = prompt_new_pin(args.no_input)?;

    // Creates the key on first setup; if a key already exists from an
    // interrupted setup, the new PIN attaches to it instead.
    let access = vault.keys().get_or_create_key(Some(&pin))?;
    ui::print_warnings(&access.warnings);

    // Materialize the config so users can find and edit it.
    let config_path = ctx.config_path()?;
    if !config_path.exists() {
        write_config(&config_path, ctx.config()?)?;
    }

    if !ctx.quiet() {
        ui::success("PIN set; vault is ready");
    }
    Ok(())
}
