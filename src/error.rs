//! Error types for startup and asset loading.
//!
//! Initialization is the only part of the program that fails with a value;
//! after the first frame renders, surface loss is handled in the event loop
//! and everything else is deterministic.

use std::fmt;

/// Errors raised while bringing up the GPU.
#[derive(Debug)]
pub enum GpuError {
    /// The window could not be wrapped in a render surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter matched the surface and power preference.
    Adapter(wgpu::RequestAdapterError),
    /// The adapter rejected the device request.
    Device(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::Surface(e) => write!(f, "Could not create a render surface: {}", e),
            GpuError::Adapter(e) => write!(
                f,
                "No usable GPU adapter ({}). A Vulkan, Metal, or DX12 capable device is required.",
                e
            ),
            GpuError::Device(e) => write!(f, "Could not open a device on the adapter: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::Surface(e) => Some(e),
            GpuError::Adapter(e) => Some(e),
            GpuError::Device(e) => Some(e),
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::Surface(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::Adapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::Device(e)
    }
}

/// Errors raised while loading texture assets.
#[derive(Debug)]
pub enum TextureError {
    /// The image bytes could not be decoded.
    Decode(image::ImageError),
    /// The file could not be read from disk.
    Io(std::io::Error),
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Decode(e) => write!(f, "Could not decode texture image: {}", e),
            TextureError::Io(e) => write!(f, "Could not read texture from disk: {}", e),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Decode(e) => Some(e),
            TextureError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::Decode(e)
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}

/// Top-level startup errors reported to the user before the fallback banner.
#[derive(Debug)]
pub enum AppError {
    /// The event loop could not be started.
    EventLoop(winit::error::EventLoopError),
    /// The main window could not be opened.
    Window(winit::error::OsError),
    /// GPU bring-up failed.
    Gpu(GpuError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Could not start the event loop: {}", e),
            AppError::Window(e) => write!(f, "Could not open the main window: {}", e),
            AppError::Gpu(e) => write!(f, "GPU setup failed: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for AppError {
    fn from(e: winit::error::OsError) -> Self {
        AppError::Window(e)
    }
}

impl From<GpuError> for AppError {
    fn from(e: GpuError) -> Self {
        AppError::Gpu(e)
    }
}
