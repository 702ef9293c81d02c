/// Delay between tearing a scene down and entering the next one.
pub const NEXT_SETTLE_DELAY_MS: u64 = 300;

/// Short beat between story cues.
pub const SHORT_PAUSE_MS: u64 = 2000;

/// Long beat, usually the length of a narration line.
pub const LONG_PAUSE_MS: u64 = 5000;

/// Interval between FPS notifications to the host.
pub const FPS_NOTIFY_INTERVAL_SECS: f32 = 0.5;
