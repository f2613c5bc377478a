//! Authentication gate for vault commands.
//!
//! Biometrics first when the device offers them, PIN entry otherwise. A
//! failed or unavailable biometric prompt falls back to the PIN; it is
//! never fatal on its own.

use dialoguer::Password;

use catvault_core::{BiometricGate, Pin, VaultService};

const MAX_PIN_ATTEMPTS: usize = 3;

/// Require a successful authentication before a vault command runs.
///
/// Order: enrolled biometrics, then `CATVAULT_PIN`, then an interactive
/// PIN prompt with up to three attempts.
pub fn authenticate(
    vault: &VaultService,
    gate: &dyn BiometricGate,
    no_input: bool,
) -> anyhow::Result<()> {
    if !vault.keys().pin_is_set()? {
        return Err(anyhow::anyhow!(
            "No PIN set. Run `catvault init` to set up the vault."
        ));
    }

    if gate.has_capability()
        && gate.is_enrolled()
        && gate.prompt("Authenticate to access CatVault")
    {
        return Ok(());
    }

    if let Some(pin) = pin_from_env()? {
        if vault.keys().verify_pin(&pin)? {
            return Ok(());
        }
        return Err(anyhow::anyhow!("Incorrect PIN"));
    }

    if no_input {
        return Err(anyhow::anyhow!(
            "--no-input requires CATVAULT_PIN to be set"
        ));
    }

    for _ in 0..MAX_PIN_ATTEMPTS {
        let entered = Password::new()
            .with_prompt("PIN")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read PIN: {}", e))?;
        let pin = match Pin::new(&entered) {
            Ok(pin) => pin,
            Err(_) => {
                eprintln!("PIN must be 4 digits");
                continue;
            }
        };
        if vault.keys().verify_pin(&pin)? {
            return Ok(());
        }
        eprintln!("Incorrect PIN");
    }

    Err(anyhow::anyhow!("Too many failed PIN attempts"))
}

/// Prompt for a new PIN during setup, honoring `CATVAULT_PIN`.
pub fn prompt_new_pin(no_input: bool) -> anyhow::Result<Pin> {
    if let Some(pin) = pin_from_env()? {
        return Ok(pin);
    }

    if no_input {
        return Err(anyhow::anyhow!(
            "--no-input requires CATVAULT_PIN to be set"
        ));
    }

    let entered = Password::new()
        .with_prompt("Choose a 4-digit PIN")
        .with_confirmation("Confirm PIN", "PINs do not match")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read PIN: {}", e))?;
    Pin::new(&entered).map_err(|e| anyhow::anyhow!("{}", e))
}

fn pin_from_env() -> anyhow::Result<Option<Pin>> {
    match std::env::var("CATVAULT_PIN") {
        Ok(value) if !value.trim().is_empty() => {
            let pin = Pin::new(value.trim())
                .map_err(|e| anyhow::anyhow!("CATVAULT_PIN: {}", e))?;
            Ok(Some(pin))
        }
        _ => Ok(None),
    }
}
