//! Set Key Command Handler
//!
//! Handles the `set-key` subcommand.

use rust_tde::config::TdeConfig;
use rust_tde::error::Result;
use rust_tde::ScsiInterface;
use tracing::info;

pub fn execute(device: &str, key: &str, config: &TdeConfig) -> Result<()> {
    info!("Trying to encrypt: {}", device);

    let scsi = ScsiInterface::new();
    scsi.enable_encryption(None, device, key, &config.sde_settings())?;

    println!("Encryption enabled on {}", device);
    Ok(())
}
