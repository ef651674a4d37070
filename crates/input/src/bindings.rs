use crate::action::Action;
use glam::{DVec2, DVec3};
use voxelsketch_common::Viewport;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
    };
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
    };
    pub const SHIFT: Self = Self {
        ctrl: false,
        shift: true,
        alt: false,
    };
    pub const ALT: Self = Self {
        ctrl: false,
        shift: false,
        alt: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// Raw pointer input in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move {
        position: DVec2,
        movement: DVec2,
        modifiers: Modifiers,
    },
    Wheel {
        delta_y: f64,
        modifiers: Modifiers,
    },
    Click {
        position: DVec2,
        button: PointerButton,
    },
}

/// Gesture-to-action mapping with its tuning constants.
///
/// - ctrl + drag: orbit
/// - shift + drag: pan
/// - alt + move: steer the light relative to the camera
/// - wheel: zoom, shift + wheel: move along the view axis
/// - primary click: draw, secondary click: erase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureBindings {
    pub degrees_per_pixel: f64,
    pub pan_per_pixel: f64,
    pub zoom_out_factor: f64,
    pub zoom_in_factor: f64,
    pub wheel_pan_step: f64,
}

impl Default for GestureBindings {
    fn default() -> Self {
        Self {
            degrees_per_pixel: 0.1,
            pan_per_pixel: 0.001,
            zoom_out_factor: 1.1,
            zoom_in_factor: 0.9,
            wheel_pan_step: 0.01,
        }
    }
}

impl GestureBindings {
    pub fn map(&self, event: &PointerEvent, viewport: Viewport) -> Action {
        match *event {
            PointerEvent::Move {
                position,
                movement,
                modifiers,
            } => {
                if modifiers.ctrl {
                    Action::Rotate {
                        yaw_degrees: -movement.x * self.degrees_per_pixel,
                        pitch_degrees: movement.y * self.degrees_per_pixel,
                    }
                } else if modifiers.shift {
                    Action::Pan(DVec3::new(movement.x, movement.y, 0.0) * self.pan_per_pixel)
                } else if modifiers.alt {
                    Action::SetLight(light_input(position, viewport))
                } else {
                    Action::Noop
                }
            }
            PointerEvent::Wheel { delta_y, modifiers } => {
                if delta_y == 0.0 || !delta_y.is_finite() {
                    return Action::Noop;
                }
                let out = delta_y > 0.0;
                if modifiers.shift {
                    let step = if out {
                        self.wheel_pan_step
                    } else {
                        -self.wheel_pan_step
                    };
                    Action::Pan(DVec3::new(0.0, 0.0, step))
                } else if out {
                    Action::Zoom(self.zoom_out_factor)
                } else {
                    Action::Zoom(self.zoom_in_factor)
                }
            }
            PointerEvent::Click { position, button } => match button {
                PointerButton::Primary => Action::Draw(position),
                PointerButton::Secondary => Action::Erase(position),
            },
        }
    }
}

/// Canvas position to light input: [-1, 1] per axis, both axes negated.
fn light_input(position: DVec2, viewport: Viewport) -> DVec2 {
    DVec2::new(
        -((position.x / viewport.width) * 2.0 - 1.0),
        -((position.y / viewport.height) * 2.0 - 1.0),
    )
}
