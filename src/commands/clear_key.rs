//! Clear Key Command Handler
//!
//! Handles the `clear-key` subcommand.

use rust_tde::config::TdeConfig;
use rust_tde::error::Result;
use rust_tde::ScsiInterface;
use tracing::info;

pub fn execute(device: &str, config: &TdeConfig) -> Result<()> {
    info!("Trying to decrypt: {}", device);

    let scsi = ScsiInterface::new();
    scsi.clear_encryption_key(None, device, &config.sde_settings())?;

    println!("Encryption disabled on {}, key cleared", device);
    Ok(())
}
