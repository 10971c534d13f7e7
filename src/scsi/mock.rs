//! Scripted [`DeviceLayer`] for tests: counts opens/closes and records the last exchange.

use std::cell::{Cell, RefCell};
use std::io;

use super::constants::SENSE_INFO_LEN;
use super::device::{DeviceFd, DeviceLayer, SgRequest, SgStatus};
use super::types::DataDirection;

pub const FAKE_FD: DeviceFd = 17;

#[derive(Debug)]
pub struct FakeDevice {
    pub fail_open: bool,
    pub fail_ioctl: bool,
    pub fail_request_sense: bool,
    pub status: SgStatus,
    pub sense: [u8; SENSE_INFO_LEN],
    pub response: Vec<u8>,

    pub opens: Cell<usize>,
    pub closes: Cell<usize>,
    pub exchanges: Cell<usize>,
    pub sense_requests: Cell<usize>,
    pub closed_fds: RefCell<Vec<DeviceFd>>,
    pub last_path: RefCell<Option<String>>,
    pub last_cdb: RefCell<Vec<u8>>,
    pub last_data: RefCell<Vec<u8>>,
    pub last_direction: Cell<Option<DataDirection>>,
}

impl FakeDevice {
    /// Device that accepts every exchange with an OK completion
    pub fn accepting() -> Self {
        Self {
            fail_open: false,
            fail_ioctl: false,
            fail_request_sense: false,
            status: SgStatus::default(),
            sense: [0u8; SENSE_INFO_LEN],
            response: Vec::new(),
            opens: Cell::new(0),
            closes: Cell::new(0),
            exchanges: Cell::new(0),
            sense_requests: Cell::new(0),
            closed_fds: RefCell::new(Vec::new()),
            last_path: RefCell::new(None),
            last_cdb: RefCell::new(Vec::new()),
            last_data: RefCell::new(Vec::new()),
            last_direction: Cell::new(None),
        }
    }

    pub fn with_open_failure(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn with_ioctl_failure(mut self) -> Self {
        self.fail_ioctl = true;
        self
    }

    pub fn with_request_sense_failure(mut self) -> Self {
        self.fail_request_sense = true;
        self
    }

    pub fn with_status(mut self, status: SgStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_sense(mut self, sense_key: u8, asc: u8, ascq: u8) -> Self {
        self.sense = [0u8; SENSE_INFO_LEN];
        self.sense[0] = 0x70;
        self.sense[2] = sense_key;
        self.sense[7] = 10;
        self.sense[12] = asc;
        self.sense[13] = ascq;
        self
    }

    pub fn with_response(mut self, response: Vec<u8>) -> Self {
        self.response = response;
        self
    }
}

impl DeviceLayer for FakeDevice {
    fn open(&self, device_path: &str) -> io::Result<DeviceFd> {
        *self.last_path.borrow_mut() = Some(device_path.to_string());
        if self.fail_open {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        self.opens.set(self.opens.get() + 1);
        Ok(FAKE_FD)
    }

    fn close(&self, fd: DeviceFd) {
        self.closes.set(self.closes.get() + 1);
        self.closed_fds.borrow_mut().push(fd);
    }

    fn sg_io(&self, _fd: DeviceFd, request: &mut SgRequest<'_>) -> io::Result<SgStatus> {
        self.exchanges.set(self.exchanges.get() + 1);
        *self.last_cdb.borrow_mut() = request.cdb.to_vec();
        self.last_direction.set(Some(request.direction));

        if self.fail_ioctl {
            return Err(io::Error::from_raw_os_error(libc::EIO));
        }

        if request.direction == DataDirection::FromDevice {
            let len = self.response.len().min(request.data.len());
            request.data[..len].copy_from_slice(&self.response[..len]);
        }
        *self.last_data.borrow_mut() = request.data.to_vec();
        request.sense.copy_from_slice(&self.sense);
        Ok(self.status)
    }

    fn request_sense(&self, _fd: DeviceFd, sense: &mut [u8; SENSE_INFO_LEN]) -> io::Result<()> {
        self.sense_requests.set(self.sense_requests.get() + 1);
        if self.fail_request_sense {
            return Err(io::Error::from_raw_os_error(libc::ENOTTY));
        }
        sense.copy_from_slice(&self.sense);
        Ok(())
    }
}
