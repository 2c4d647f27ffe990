//! Window and context settings, readable from JSON.
//!
//! ```rust,ignore
//! let settings = Settings::from_json(r#"{ "window": { "title": "Splat", "width": 1024 } }"#)?;
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowParams {
    pub title: String,
    /// The size of the client area in points.
    pub width: u32,
    pub height: u32,
    /// Bits of the red, green, blue and alpha channels of the default framebuffer.
    pub color_bits: [u8; 4],
    pub depth_bits: u8,
    pub stencil_bits: u8,
    /// The multisampling level. 0 disables multisampling.
    pub samples: u16,
    pub resizable: bool,
    pub visible: bool,
    pub vsync: bool,
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "Window".to_owned(),
            width: 640,
            height: 480,
            color_bits: [8, 8, 8, 8],
            depth_bits: 24,
            stencil_bits: 8,
            samples: 4,
            resizable: false,
            visible: true,
            vsync: true,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextParams {
    /// The requested core profile version. Compute shaders need 4.3.
    pub major: u8,
    pub minor: u8,
    /// Forwards the driver debug messages to the logger.
    pub debug: bool,
}

impl Default for ContextParams {
    fn default() -> Self {
        ContextParams {
            major: 4,
            minor: 3,
            debug: cfg!(debug_assertions),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowParams,
    pub context: ContextParams,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|err| Error::Io {
            path: path.display().to_string(),
            err,
        })?;

        info!("Loading settings from {}.", path.display());
        Settings::from_json(&json)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn partial() {
        let settings = Settings::from_json(r#"{ "window": { "width": 1024 } }"#).unwrap();
        assert_eq!(settings.window.width, 1024);
        assert_eq!(settings.window.height, 480);
        assert_eq!(settings.window.samples, 4);
        assert_eq!(settings.context, ContextParams::default());
    }

    #[test]
    fn malformed() {
        match Settings::from_json("{ \"window\": 3 }") {
            Err(Error::Settings(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
