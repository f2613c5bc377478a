//! Index/store consistency check.

use catvault_core::NoBiometrics;

use crate::app::auth::authenticate;
use crate::app::AppContext;
use crate::ui;

pub fn handle_check(ctx: &AppContext) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    authenticate(&vault, &NoBiometrics, false)?;

    let report = vault.reconcile()?;
    if report.dropped.is_empty() {
        if !ctx.quiet() {
            ui::success("Index and store are consistent");
        }
    } else {
        for id in &report.dropped {
            ui::warn(&format!("Dropped dangling index entry {}", id));
        }
    }
    Ok(())
}
