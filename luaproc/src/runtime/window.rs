use bitflags::bitflags;

use crate::core::error::{HostError, HostResult};

bitflags! {
    /// Presentation options requested before the window exists.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct WindowFlags: u32 {
        const FULLSCREEN = 1 << 0;
        const RESIZABLE = 1 << 1;
    }
}

pub const DEFAULT_FRAME_RATE: u32 = 60;
pub const DEFAULT_TITLE: &str = "LuaProc";

/// Window intent accumulated while the script configures itself.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    /// Negative until `size()` runs.
    pub width: i32,
    pub height: i32,
    pub frame_rate: u32,
    pub flags: WindowFlags,
    pub title: String,
    pub frame_count: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: -1,
            height: -1,
            frame_rate: DEFAULT_FRAME_RATE,
            flags: WindowFlags::empty(),
            title: DEFAULT_TITLE.to_string(),
            frame_count: 0,
        }
    }
}

impl WindowConfig {
    /// Surface size, or `InvalidWindow` unless both sides are positive.
    pub fn size(&self) -> HostResult<(u32, u32)> {
        match (u32::try_from(self.width), u32::try_from(self.height)) {
            (Ok(width), Ok(height)) if width > 0 && height > 0 => {
                Ok((width, height))
            }
            _ => Err(HostError::InvalidWindow {
                width: self.width,
                height: self.height,
            }),
        }
    }

    pub fn validate(&self) -> HostResult<()> {
        self.size().map(|_| ())
    }

    pub fn set_flag(&mut self, flag: WindowFlags, enabled: bool) {
        self.flags.set(flag, enabled);
    }
}
