/// Where the Next button is placed when a scene does not pick a spot.
pub const NEXT_BUTTON_POSITION: [f32; 3] = [0.6, 0.9, -2.0];

/// Where the Quit button is placed in the final scene.
pub const QUIT_BUTTON_POSITION: [f32; 3] = [0.0, 1.0, -2.0];

/// Parking spot for hidden reusable buttons.
pub const BUTTON_PARK_POSITION: [f32; 3] = [0.0, -10.0, 0.0];

/// Half extents of the pick volume around a reusable button.
pub const BUTTON_PICK_HALF_EXTENTS: [f32; 3] = [0.15, 0.08, 0.05];

/// Text plate panel size (width, height, depth) in metres.
pub const TEXT_PLATE_SIZE: [f32; 3] = [1.2, 0.35, 0.02];

pub const TEXT_PLATE_FONT_SIZE: f32 = 18.0;

/// Panel colour as linear RGBA.
pub const TEXT_PLATE_COLOUR: [f32; 4] = [0.05, 0.08, 0.14, 0.85];
