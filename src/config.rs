//! Service configuration.
//!
//! All knobs live in one struct so a running instance can be described by a
//! single log line and two deployments can be diffed. Values come from
//! `PDF2RASTER_*` environment variables with defaults matching the
//! deployment layout the locator expects (binary and `bin/dll/` side by
//! side under the install root).

use crate::error::RasterError;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Rendering resolution used when the request does not choose one.
pub const DEFAULT_DPI: u32 = 200;

/// Upload cap; a scanned multi-hundred-page document stays well below this.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Runtime configuration for the conversion service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Root of the deployment; the native library is expected under
    /// `<install_root>/bin/dll/`.
    pub install_root: PathBuf,
    /// Address the HTTP listener binds to.
    pub bind_addr: SocketAddr,
    /// Rasterisation resolution in dots per inch.
    pub dpi: u32,
    /// Maximum accepted multipart body size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            install_root: default_install_root(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            dpi: DEFAULT_DPI,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Build the configuration from `PDF2RASTER_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, RasterError> {
        let mut config = Self::default();

        if let Ok(root) = std::env::var("PDF2RASTER_INSTALL_ROOT") {
            config.install_root = PathBuf::from(root);
        }
        if let Ok(bind) = std::env::var("PDF2RASTER_BIND") {
            config.bind_addr = bind.parse().map_err(|e| {
                RasterError::InvalidConfig(format!("PDF2RASTER_BIND '{bind}': {e}"))
            })?;
        }
        if let Ok(dpi) = std::env::var("PDF2RASTER_DPI") {
            config.dpi = dpi.parse().map_err(|e| {
                RasterError::InvalidConfig(format!("PDF2RASTER_DPI '{dpi}': {e}"))
            })?;
        }
        if let Ok(max) = std::env::var("PDF2RASTER_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = max.parse().map_err(|e| {
                RasterError::InvalidConfig(format!("PDF2RASTER_MAX_UPLOAD_BYTES '{max}': {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), RasterError> {
        if self.dpi == 0 {
            return Err(RasterError::InvalidConfig("DPI must be ≥ 1".into()));
        }
        if self.max_upload_bytes == 0 {
            return Err(RasterError::InvalidConfig(
                "max upload size must be ≥ 1 byte".into(),
            ));
        }
        Ok(())
    }
}

/// The directory holding the service binary, matching the layout where the
/// binary sits at the install root next to `bin/dll/`. Falls back to the
/// working directory when the executable path is unavailable.
fn default_install_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}
