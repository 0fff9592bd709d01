use gbe_host::HostError;

use crate::native::Address;


#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("native allocator could not provide {0} bytes")]
    OutOfMemory(usize),
    #[error("native core rejected the rom image ({0} bytes)")]
    CreateFailed(usize),
    #[error("rom image is empty")]
    EmptyRom,
    #[error("native core reported an unusable screen resolution of {0}x{1}")]
    InvalidResolution(u32, u32),
    #[error("access of {len} bytes at {addr:#010x} is outside of native memory ({size} bytes)")]
    OutOfBounds { addr: Address, len: usize, size: usize },
    #[error("native core: {0}")]
    Native(String),
    #[error("display surface: {0}")]
    Surface(String),
}

impl Error {
    pub fn native<S>(msg: S) -> Error
    where
        S: Into<String>,
    {
        Error::Native(msg.into())
    }

    /// True for failures of a `load` that leave the controller empty and can be shown to the user
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Error::OutOfMemory(_) | Error::CreateFailed(_) | Error::EmptyRom | Error::InvalidResolution(_, _)
        )
    }
}

impl<E: std::fmt::Display> From<HostError<E>> for Error {
    fn from(err: HostError<E>) -> Self {
        Error::Surface(err.to_string())
    }
}
