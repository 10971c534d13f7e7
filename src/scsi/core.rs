//! SCSI Core Implementation
//!
//! This module contains the ScsiInterface struct and the page exchange logic.

use tracing::{debug, error, info};

use crate::error::{Result, RustTdeError};

use super::constants::SENSE_INFO_LEN;
use super::device::{DeviceFd, DeviceHandle, DeviceLayer, SgDevice, SgRequest};
use super::sense::SenseData;
use super::types::{DataDirection, SecurityProtocolCdb};

/// SCSI operation structure that encapsulates low-level SCSI commands
#[derive(Debug, Default)]
pub struct ScsiInterface<D: DeviceLayer = SgDevice> {
    device: D,
}

impl ScsiInterface<SgDevice> {
    /// Create new SCSI interface instance on the Linux SG device layer
    pub fn new() -> Self {
        Self { device: SgDevice }
    }
}

impl<D: DeviceLayer> ScsiInterface<D> {
    /// Create a SCSI interface on an arbitrary device layer
    pub fn with_device(device: D) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Open a device for the caller. The returned handle closes it when dropped.
    pub fn open_device(&self, device_path: &str) -> Result<DeviceHandle<'_, D>> {
        debug!("Opening tape device: {}", device_path);
        let fd = self.device.open(device_path).map_err(|source| {
            error!("Failed to open {}: {}", device_path, source);
            RustTdeError::DeviceOpen {
                path: device_path.to_string(),
                source,
            }
        })?;
        debug!("Device opened successfully: {} (fd {})", device_path, fd);
        Ok(DeviceHandle::owned(&self.device, fd))
    }

    /// Execute one CDB + page exchange.
    ///
    /// With `fd == None` the device at `device_path` is opened for this call
    /// and closed again on every exit path; a caller-supplied descriptor is
    /// used as is and left open. The sense buffer is decoded and logged
    /// whatever the outcome.
    pub fn execute_page_exchange(
        &self,
        fd: Option<DeviceFd>,
        device_path: &str,
        cdb: &SecurityProtocolCdb,
        page: &mut [u8],
        direction: DataDirection,
    ) -> Result<()> {
        let handle = match fd {
            Some(fd) => DeviceHandle::borrowed(&self.device, fd),
            None => self.open_device(device_path)?,
        };

        let cdb_bytes = cdb.to_bytes();
        let mut sense = [0u8; SENSE_INFO_LEN];

        let outcome = {
            let mut request = SgRequest {
                cdb: &cdb_bytes,
                data: page,
                sense: &mut sense,
                direction,
            };
            self.device.sg_io(handle.fd(), &mut request)
        };

        let result = match outcome {
            Err(source) => {
                error!(
                    "Unable to perform SG_IO ioctl on fd {}: {}",
                    handle.fd(),
                    source
                );
                Err(RustTdeError::Transport {
                    fd: handle.fd(),
                    source,
                })
            }
            Ok(status) if !status.is_ok() => {
                error!("Failed with {}", status);
                Err(RustTdeError::DeviceStatus(status))
            }
            Ok(status) => {
                debug!(
                    "SG_IO completed: status 0x{:02X}, resid {}, duration {} ms",
                    status.status, status.resid, status.duration
                );
                Ok(())
            }
        };

        drop(handle);

        log_sense_data(&SenseData::parse(&sense));

        result
    }

    /// Send a page to the device (Security Protocol Out direction)
    pub fn send_page_to_device(
        &self,
        fd: Option<DeviceFd>,
        device_path: &str,
        cdb: &SecurityProtocolCdb,
        page: &mut [u8],
    ) -> Result<()> {
        self.execute_page_exchange(fd, device_path, cdb, page, DataDirection::ToDevice)
    }

    /// Receive a page from the device (Security Protocol In direction)
    pub fn receive_page_from_device(
        &self,
        fd: Option<DeviceFd>,
        device_path: &str,
        cdb: &SecurityProtocolCdb,
        page: &mut [u8],
    ) -> Result<()> {
        self.execute_page_exchange(fd, device_path, cdb, page, DataDirection::FromDevice)
    }

    /// Check whether the drive's current sense reports end of data.
    ///
    /// Operates on a caller-owned descriptor and never opens or closes it.
    pub fn is_at_end_of_data(&self, fd: DeviceFd) -> bool {
        let mut sense = [0u8; SENSE_INFO_LEN];

        if let Err(e) = self.device.request_sense(fd, &mut sense) {
            debug!("REQUEST SENSE ioctl on fd {} failed: {}", fd, e);
            return false;
        }

        let sense = SenseData::parse(&sense);
        debug!("Current sense: {}", sense);
        sense.is_end_of_data()
    }
}

fn log_sense_data(sense: &SenseData) {
    info!("Sense data");
    info!("==========");
    info!("Sense code: {}", sense.sense_key_text());
    info!("Additional sense code: {}", sense.additional_sense_text());
}
