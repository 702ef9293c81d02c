pub const LANDING_PAGE: &str = "landing-page";
pub const AR_VIEW: &str = "ar-view";
pub const END_PAGE: &str = "end-page";
pub const LOADING_OVERLAY: &str = "loading-overlay";
pub const LOADING_TEXT: &str = "loading-text";
pub const START_BUTTON: &str = "start-button";
pub const RESTART_BUTTON: &str = "restart-button";
pub const SUBTITLE: &str = "subtitle";

/// Label shown on the start button until the essential batch is ready.
pub const START_LABEL_LOADING: &str = "Loading…";
pub const START_LABEL_READY: &str = "Start";
