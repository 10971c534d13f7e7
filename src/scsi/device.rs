//! SCSI Device Access
//!
//! The [`DeviceLayer`] trait is the seam between the SCSI transport logic and
//! the operating system. [`SgDevice`] implements it on top of the Linux SCSI
//! generic `SG_IO` ioctl; tests substitute a scripted fake.

use std::fmt;
use std::io;

use super::constants::{sg, SENSE_INFO_LEN};
use super::types::DataDirection;

/// Raw file descriptor of an open device node
pub type DeviceFd = libc::c_int;

/// One SCSI generic exchange: CDB out, data in either direction, sense back
#[derive(Debug)]
pub struct SgRequest<'a> {
    pub cdb: &'a [u8],
    pub data: &'a mut [u8],
    pub sense: &'a mut [u8; SENSE_INFO_LEN],
    pub direction: DataDirection,
}

/// Completion fields reported by the driver for a finished exchange
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SgStatus {
    pub info: u32,
    pub status: u8,
    pub masked_status: u8,
    pub msg_status: u8,
    pub sb_len_wr: u8,
    pub host_status: u16,
    pub driver_status: u16,
    pub resid: i32,
    pub duration: u32,
}

impl SgStatus {
    /// Masked check of the info word; auxiliary bits outside the mask are not errors
    pub fn is_ok(&self) -> bool {
        self.info & sg::SG_INFO_OK_MASK == sg::SG_INFO_OK
    }
}

impl fmt::Display for SgStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "info 0x{:X}, mask status 0x{:02X}, msg status 0x{:02X}, host status 0x{:04X}, driver status 0x{:04X}",
            self.info, self.masked_status, self.msg_status, self.host_status, self.driver_status
        )
    }
}

/// Low-level device operations used by [`super::ScsiInterface`]
pub trait DeviceLayer {
    /// Open `device_path` read-write, non-blocking
    fn open(&self, device_path: &str) -> io::Result<DeviceFd>;

    /// Release a descriptor previously returned by [`DeviceLayer::open`]
    fn close(&self, fd: DeviceFd);

    /// Issue a SCSI generic exchange. `Err` means the ioctl itself failed;
    /// device-level outcome is carried in the returned [`SgStatus`].
    fn sg_io(&self, fd: DeviceFd, request: &mut SgRequest<'_>) -> io::Result<SgStatus>;

    /// Issue the direct REQUEST SENSE ioctl into `sense`
    fn request_sense(&self, fd: DeviceFd, sense: &mut [u8; SENSE_INFO_LEN]) -> io::Result<()>;
}

/// Device handle wrapper that ensures proper resource cleanup.
///
/// An owned handle closes its descriptor exactly once when dropped; a
/// borrowed handle wraps a caller's descriptor and never closes it.
#[derive(Debug)]
pub struct DeviceHandle<'a, D: DeviceLayer> {
    layer: &'a D,
    fd: DeviceFd,
    owned: bool,
}

impl<'a, D: DeviceLayer> DeviceHandle<'a, D> {
    pub(crate) fn owned(layer: &'a D, fd: DeviceFd) -> Self {
        Self {
            layer,
            fd,
            owned: true,
        }
    }

    pub(crate) fn borrowed(layer: &'a D, fd: DeviceFd) -> Self {
        Self {
            layer,
            fd,
            owned: false,
        }
    }

    pub fn fd(&self) -> DeviceFd {
        self.fd
    }

    pub fn is_owned(&self) -> bool {
        self.owned
    }
}

impl<D: DeviceLayer> Drop for DeviceHandle<'_, D> {
    fn drop(&mut self) {
        if self.owned {
            self.layer.close(self.fd);
            tracing::debug!("Device fd {} closed", self.fd);
        }
    }
}

/// Linux SCSI generic device layer
#[derive(Debug, Default, Clone, Copy)]
pub struct SgDevice;

impl DeviceLayer for SgDevice {
    fn open(&self, device_path: &str) -> io::Result<DeviceFd> {
        #[cfg(target_os = "linux")]
        {
            use std::fs::OpenOptions;
            use std::os::unix::fs::OpenOptionsExt;
            use std::os::unix::io::IntoRawFd;

            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(device_path)?;
            Ok(file.into_raw_fd())
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = device_path;
            Err(unsupported())
        }
    }

    fn close(&self, fd: DeviceFd) {
        #[cfg(target_os = "linux")]
        {
            // SAFETY: fd came from `open` above and is closed exactly once by its owner.
            if unsafe { libc::close(fd) } != 0 {
                tracing::warn!(
                    "close() on fd {} failed: {}",
                    fd,
                    io::Error::last_os_error()
                );
            }
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = fd;
        }
    }

    fn sg_io(&self, fd: DeviceFd, request: &mut SgRequest<'_>) -> io::Result<SgStatus> {
        #[cfg(target_os = "linux")]
        {
            let mut hdr = super::ffi::SgIoHdr::for_request(request);
            tracing::debug!("calling SG_IO on fd {} with {:?}", fd, hdr);

            // SAFETY: hdr points into `request`, whose buffers outlive this call.
            let rc = unsafe { libc::ioctl(fd, sg::SG_IO as _, &mut hdr as *mut super::ffi::SgIoHdr) };
            if rc < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(hdr.completion())
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = (fd, request);
            Err(unsupported())
        }
    }

    fn request_sense(&self, fd: DeviceFd, sense: &mut [u8; SENSE_INFO_LEN]) -> io::Result<()> {
        #[cfg(target_os = "linux")]
        {
            use super::constants::SIOC_REQSENSE;

            // SAFETY: the request size encoded in SIOC_REQSENSE matches the buffer.
            let rc = unsafe { libc::ioctl(fd, SIOC_REQSENSE as _, sense.as_mut_ptr()) };
            if rc != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        }

        #[cfg(not(target_os = "linux"))]
        {
            let _ = (fd, sense);
            Err(unsupported())
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "SCSI generic pass-through requires Linux",
    )
}
