use thiserror::Error;

use crate::scsi::device::{DeviceFd, SgStatus};

pub type Result<T> = std::result::Result<T, RustTdeError>;

#[derive(Error, Debug)]
pub enum RustTdeError {
    #[error("Failed to open {path}: {source}")]
    DeviceOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to perform SG_IO ioctl on fd {fd}: {source}")]
    Transport {
        fd: DeviceFd,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed with {0}")]
    DeviceStatus(SgStatus),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parameter validation error: {0}")]
    ParameterValidation(String),
}

impl RustTdeError {
    pub fn parse<T: Into<String>>(msg: T) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    pub fn parameter_validation<T: Into<String>>(msg: T) -> Self {
        Self::ParameterValidation(msg.into())
    }
}
