//! Immersive session negotiation and the pointer fallback.

/// Session request, result handling and viewer pose.
pub mod session;
