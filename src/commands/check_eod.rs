//! Check EOD Command Handler
//!
//! Handles the `check-eod` subcommand. The handler owns the device handle and
//! lends its descriptor to the classifier.

use rust_tde::error::Result;
use rust_tde::ScsiInterface;
use tracing::info;

pub fn execute(device: &str) -> Result<()> {
    info!("Checking end of data: {}", device);

    let scsi = ScsiInterface::new();
    let handle = scsi.open_device(device)?;

    if scsi.is_at_end_of_data(handle.fd()) {
        println!("{}: at end of data", device);
    } else {
        println!("{}: not at end of data", device);
    }

    Ok(())
}
