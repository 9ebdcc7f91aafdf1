use crate::platform::PlatformOps;
use std::path::Path;

pub static WINDOWS_PLATFORM: Windows = Windows;

pub struct Windows;

impl PlatformOps for Windows {
    fn make_executable(&self, _path: &Path) -> Result<(), std::io::Error> { Ok(()) }
}
