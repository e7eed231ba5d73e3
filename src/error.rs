//! Error types for dust-image.
//!
//! Construction of a point cloud fails fast on bad configuration. The
//! adapters (image source, GPU rasterizer, viewer) have their own error
//! types so callers can surface collaborator failures without the core
//! masking them.

use std::fmt;

/// Errors raised while building or tuning a point cloud.
#[derive(Debug, Clone, PartialEq)]
pub enum CloudError {
    /// A configuration field is out of its valid domain.
    ///
    /// Carries the offending field name and a human readable reason.
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
}

impl CloudError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CloudError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CloudError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloudError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for `{}`: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for CloudError {}

/// Errors that can occur while loading an image source.
#[derive(Debug)]
pub enum SourceError {
    /// Failed to decode the image.
    ImageLoad(image::ImageError),
    /// Failed to read file from disk.
    Io(std::io::Error),
    /// Decoded image has no pixels.
    Empty,
    /// Raw pixel data does not match the stated dimensions.
    SizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::ImageLoad(e) => write!(f, "Failed to load image: {}", e),
            SourceError::Io(e) => write!(f, "Failed to read image file: {}", e),
            SourceError::Empty => write!(f, "Image has zero width or height"),
            SourceError::SizeMismatch { expected, actual } => write!(
                f,
                "RGBA data size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::ImageLoad(e) => Some(e),
            SourceError::Io(e) => Some(e),
            SourceError::Empty | SourceError::SizeMismatch { .. } => None,
        }
    }
}

impl From<image::ImageError> for SourceError {
    fn from(e: image::ImageError) -> Self {
        SourceError::ImageLoad(e)
    }
}

impl From<std::io::Error> for SourceError {
    fn from(e: std::io::Error) -> Self {
        SourceError::Io(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// Surface reports no supported formats for this adapter.
    UnsupportedSurface,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::UnsupportedSurface => write!(f, "Surface is not supported by the selected adapter"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Point cloud could not be built.
    Cloud(CloudError),
    /// Image source could not be loaded.
    Source(SourceError),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            ViewerError::Window(e) => write!(f, "Failed to create window: {}", e),
            ViewerError::Gpu(e) => write!(f, "GPU error: {}", e),
            ViewerError::Cloud(e) => write!(f, "Point cloud error: {}", e),
            ViewerError::Source(e) => write!(f, "Image source error: {}", e),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Gpu(e) => Some(e),
            ViewerError::Cloud(e) => Some(e),
            ViewerError::Source(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for ViewerError {
    fn from(e: winit::error::OsError) -> Self {
        ViewerError::Window(e)
    }
}

impl From<GpuError> for ViewerError {
    fn from(e: GpuError) -> Self {
        ViewerError::Gpu(e)
    }
}

impl From<CloudError> for ViewerError {
    fn from(e: CloudError) -> Self {
        ViewerError::Cloud(e)
    }
}

impl From<SourceError> for ViewerError {
    fn from(e: SourceError) -> Self {
        ViewerError::Source(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_display() {
        let err = CloudError::invalid("max_depth", "must be >= 0, got -1");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for `max_depth`: must be >= 0, got -1"
        );
    }

    #[test]
    fn test_source_error_chain() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err = SourceError::from(io);
        assert!(err.source().is_some());
        assert!(SourceError::Empty.source().is_none());
    }
}
