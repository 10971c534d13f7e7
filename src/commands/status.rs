//! Status Command Handler
//!
//! Handles the `status` subcommand for querying the drive's encryption state.

use rust_tde::error::{Result, RustTdeError};
use rust_tde::ScsiInterface;
use tracing::info;

pub fn execute(device: &str, json: bool) -> Result<()> {
    info!("Reading data encryption status: {}", device);

    let scsi = ScsiInterface::new();
    let status = scsi.read_encryption_status(None, device)?;

    if json {
        let text = serde_json::to_string_pretty(&status)
            .map_err(|e| RustTdeError::parse(format!("Cannot serialize status: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    println!("Data Encryption Status ({}):", device);
    match status.nexus_scope {
        Some(scope) => println!("  I_T Nexus Scope: {:?}", scope),
        None => println!("  I_T Nexus Scope: reserved"),
    }
    println!("  Key Scope: 0x{:02X}", status.key_scope);
    println!("  Encryption Mode: {:?}", status.encryption_mode);
    println!("  Decryption Mode: {:?}", status.decryption_mode);
    println!("  Algorithm Index: 0x{:02X}", status.algorithm_index);
    println!("  Key Instance Counter: {}", status.key_instance_counter);

    Ok(())
}
