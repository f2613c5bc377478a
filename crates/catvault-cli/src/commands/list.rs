//! List all notes.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use catvault_core::NoBiometrics;

use crate::app::auth::authenticate;
use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::ui;

const SUMMARY_MAX: usize = 60;

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let vault = ctx.open_vault()?;
    authenticate(&vault, &NoBiometrics, false)?;

    let listing = vault.list_notes()?;

    match args.format.as_deref() {
        None | Some("table") => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NOTE"]);
            for note in &listing.notes {
                table.add_row(vec![note.id.to_string(), summary(&note.content)]);
            }
            println!("{}", table);
        }
        Some("plain") => {
            for note in &listing.notes {
                println!("{} {}", note.id, summary(&note.content));
            }
        }
        Some(other) => {
            return Err(anyhow::anyhow!(
                "Unsupported format: {} (use table or plain)",
                other
            ));
        }
    }

    ui::print_warnings(&listing.warnings);
    if !ctx.quiet() && listing.notes.is_empty() {
        println!("No notes yet. Add one with `catvault add`.");
    }
    Ok(())
}

/// First line of the note, truncated for the listing.
fn summary(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("");
    let mut summary: String = first_line.chars().take(SUMMARY_MAX).collect();
    if first_line.chars().count() > SUMMARY_MAX || content.lines().count() > 1 {
        summary.push('…');
    }
    summary
}
