use libc::{c_int, c_uchar, c_uint, c_ushort, c_void};

use super::constants::sg::SG_INTERFACE_ID_ORIG;
use super::device::{SgRequest, SgStatus};

/// Linux SCSI generic request header (corresponds to `sg_io_hdr_t` in <scsi/sg.h>)
#[repr(C)]
#[derive(Debug)]
pub struct SgIoHdr {
    pub interface_id: c_int,
    pub dxfer_direction: c_int,
    pub cmd_len: c_uchar,
    pub mx_sb_len: c_uchar,
    pub iovec_count: c_ushort,
    pub dxfer_len: c_uint,
    pub dxferp: *mut c_void,
    pub cmdp: *const c_uchar,
    pub sbp: *mut c_uchar,
    pub timeout: c_uint,
    pub flags: c_uint,
    pub pack_id: c_int,
    pub usr_ptr: *mut c_void,
    pub status: c_uchar,
    pub masked_status: c_uchar,
    pub msg_status: c_uchar,
    pub sb_len_wr: c_uchar,
    pub host_status: c_ushort,
    pub driver_status: c_ushort,
    pub resid: c_int,
    pub duration: c_uint,
    pub info: c_uint,
}

impl SgIoHdr {
    /// Build a zeroed header pointing at the request's CDB, data and sense buffers.
    ///
    /// The returned header borrows raw pointers into `request`; it must not
    /// outlive it.
    pub fn for_request(request: &mut SgRequest<'_>) -> Self {
        Self {
            interface_id: SG_INTERFACE_ID_ORIG,
            dxfer_direction: request.direction.sg_dxfer(),
            cmd_len: request.cdb.len() as c_uchar,
            mx_sb_len: request.sense.len() as c_uchar,
            iovec_count: 0,
            dxfer_len: request.data.len() as c_uint,
            dxferp: request.data.as_mut_ptr() as *mut c_void,
            cmdp: request.cdb.as_ptr(),
            sbp: request.sense.as_mut_ptr(),
            timeout: 0,
            flags: 0,
            pack_id: 0,
            usr_ptr: std::ptr::null_mut(),
            status: 0,
            masked_status: 0,
            msg_status: 0,
            sb_len_wr: 0,
            host_status: 0,
            driver_status: 0,
            resid: 0,
            duration: 0,
            info: 0,
        }
    }

    /// Completion fields filled in by the driver
    pub fn completion(&self) -> SgStatus {
        SgStatus {
            info: self.info,
            status: self.status,
            masked_status: self.masked_status,
            msg_status: self.msg_status,
            sb_len_wr: self.sb_len_wr,
            host_status: self.host_status,
            driver_status: self.driver_status,
            resid: self.resid,
            duration: self.duration,
        }
    }
}
