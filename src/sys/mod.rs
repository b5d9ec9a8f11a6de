pub mod timer;
pub mod window_system;
#[cfg(target_os = "linux")]
pub mod x11;
