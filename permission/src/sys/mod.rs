//! Platform-specific permission providers.

#[cfg(target_os = "android")]
pub mod android;

#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
mod desktop;

#[cfg(any(target_os = "linux", target_os = "windows", target_os = "macos"))]
pub use desktop::DesktopPermissions;
