pub const SESSION_MODE: &str = "immersive-ar";

pub const REQUIRED_FEATURES: &[&str] = &["hit-test"];

pub const OPTIONAL_FEATURES: &[&str] = &["dom-overlay", "local-floor"];
