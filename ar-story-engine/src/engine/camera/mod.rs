//! Story camera and the pointer-mode orbit controls.

/// Camera marker, orbit state and controller system.
pub mod viewport_camera;
