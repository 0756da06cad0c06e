use std::collections::HashSet;

use glam::Vec2;
use winit::event::TouchPhase;
use winit::keyboard::KeyCode;

/// Max knob travel of the virtual joystick, in screen pixels.
const JOYSTICK_MAX_DISTANCE: f32 = 50.0;

/// Device-independent control signal read once per tick.
///
/// Keyboard values are 0 or 1; touch values are continuous in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSignal {
    pub forward: f32,
    pub backward: f32,
    pub turn_left: f32,
    pub turn_right: f32,
    pub jump: bool,
    pub interact: bool,
}

impl InputSignal {
    /// Split a signed joystick reading into the one-sided channels.
    pub fn from_touch(forward: f32, turn: f32, jump: bool, interact: bool) -> Self {
        Self {
            forward: forward.max(0.0),
            backward: (-forward).max(0.0),
            turn_left: (-turn).max(0.0),
            turn_right: turn.max(0.0),
            jump,
            interact,
        }
    }

    /// Net drive along the heading; forward and backward cancel additively.
    pub fn drive(&self) -> f32 {
        self.forward - self.backward
    }

    /// Net turn; positive turns left.
    pub fn steer(&self) -> f32 {
        self.turn_left - self.turn_right
    }

    /// Combine keyboard and touch; the stronger reading wins per channel.
    pub fn merge(self, other: Self) -> Self {
        Self {
            forward: self.forward.max(other.forward),
            backward: self.backward.max(other.backward),
            turn_left: self.turn_left.max(other.turn_left),
            turn_right: self.turn_right.max(other.turn_right),
            jump: self.jump || other.jump,
            interact: self.interact || other.interact,
        }
    }
}

/// Keys currently held, fed from window key events.
#[derive(Debug, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: KeyCode, down: bool) {
        if down {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Drop everything held, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn any(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_down(*k))
    }

    pub fn signal(&self) -> InputSignal {
        let axis = |keys: &[KeyCode]| if self.any(keys) { 1.0 } else { 0.0 };
        InputSignal {
            forward: axis(&[KeyCode::ArrowUp, KeyCode::KeyW]),
            backward: axis(&[KeyCode::ArrowDown, KeyCode::KeyS]),
            turn_left: axis(&[KeyCode::ArrowLeft, KeyCode::KeyA]),
            turn_right: axis(&[KeyCode::ArrowRight, KeyCode::KeyD]),
            jump: self.any(&[KeyCode::Space, KeyCode::KeyE]),
            interact: self.any(&[KeyCode::KeyF, KeyCode::KeyR]),
        }
    }
}

/// Touches starting this close to the stick's base grab it.
const JOYSTICK_BASE_RADIUS: f32 = 60.0;
/// Stick base sits this far in from the bottom-left corner.
const JOYSTICK_MARGIN: f32 = 100.0;
/// Side of the square jump/interact buttons.
const BUTTON_SIZE: f32 = 100.0;
/// Gap between the buttons and from the screen edge.
const BUTTON_MARGIN: f32 = 40.0;

/// On-screen thumbstick.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualJoystick {
    center: Vec2,
    knob: Vec2,
    active: bool,
}

impl VirtualJoystick {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            ..Self::default()
        }
    }

    /// Move the base, e.g. after a resize or orientation change.
    pub fn set_center(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Whether a touch starting at `point` lands on the base.
    pub fn hits(&self, point: Vec2) -> bool {
        point.distance(self.center) <= JOYSTICK_BASE_RADIUS
    }

    pub fn press(&mut self) {
        self.active = true;
    }

    /// Track a touch; the knob is clamped to the base radius.
    pub fn drag(&mut self, touch: Vec2) {
        if !self.active {
            return;
        }
        let delta = touch - self.center;
        self.knob = if delta.length() <= JOYSTICK_MAX_DISTANCE {
            delta
        } else {
            delta.normalize_or_zero() * JOYSTICK_MAX_DISTANCE
        };
    }

    pub fn release(&mut self) {
        self.active = false;
        self.knob = Vec2::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn knob_offset(&self) -> Vec2 {
        self.knob
    }

    /// (forward, turn), each in [-1, 1]. Screen y grows downward, so pushing
    /// the knob up drives forward.
    pub fn movement(&self) -> (f32, f32) {
        (
            -self.knob.y / JOYSTICK_MAX_DISTANCE,
            self.knob.x / JOYSTICK_MAX_DISTANCE,
        )
    }
}

/// Axis-aligned screen rectangle, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl ScreenRect {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// Stick bottom-left, jump and interact buttons bottom-right. Each control
/// remembers the finger that grabbed it, so lifting one finger only releases
/// its own control.
#[derive(Debug, Clone, Copy)]
pub struct TouchControls {
    joystick: VirtualJoystick,
    jump_button: ScreenRect,
    interact_button: ScreenRect,
    stick_finger: Option<u64>,
    jump_finger: Option<u64>,
    interact_finger: Option<u64>,
}

impl TouchControls {
    pub fn new(width: f32, height: f32) -> Self {
        let mut controls = Self {
            joystick: VirtualJoystick::new(Vec2::ZERO),
            jump_button: ScreenRect::default(),
            interact_button: ScreenRect::default(),
            stick_finger: None,
            jump_finger: None,
            interact_finger: None,
        };
        controls.layout(width, height);
        controls
    }

    /// Re-anchor every control to the screen corners.
    pub fn layout(&mut self, width: f32, height: f32) {
        self.joystick.set_center(Vec2::new(JOYSTICK_MARGIN, height - JOYSTICK_MARGIN));

        let bottom = height - BUTTON_MARGIN;
        let square = |right: f32| ScreenRect {
            min: Vec2::new(right - BUTTON_SIZE, bottom - BUTTON_SIZE),
            max: Vec2::new(right, bottom),
        };
        let jump_right = width - BUTTON_MARGIN;
        self.jump_button = square(jump_right);
        self.interact_button = square(jump_right - BUTTON_SIZE - BUTTON_MARGIN);
    }

    pub fn jump_button(&self) -> ScreenRect {
        self.jump_button
    }

    pub fn interact_button(&self) -> ScreenRect {
        self.interact_button
    }

    /// Feed one touch event. Returns true when the interact button was just
    /// pressed.
    pub fn handle(&mut self, finger: u64, phase: TouchPhase, location: Vec2) -> bool {
        match phase {
            TouchPhase::Started => self.touch_started(finger, location),
            TouchPhase::Moved => {
                if self.stick_finger == Some(finger) {
                    self.joystick.drag(location);
                }
                false
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touch_ended(finger);
                false
            }
        }
    }

    fn touch_started(&mut self, finger: u64, location: Vec2) -> bool {
        if self.jump_button.contains(location) {
            self.jump_finger.get_or_insert(finger);
            false
        } else if self.interact_button.contains(location) {
            let pressed = self.interact_finger.is_none();
            self.interact_finger.get_or_insert(finger);
            pressed
        } else if self.stick_finger.is_none() && self.joystick.hits(location) {
            self.stick_finger = Some(finger);
            self.joystick.press();
            self.joystick.drag(location);
            false
        } else {
            false
        }
    }

    fn touch_ended(&mut self, finger: u64) {
        if self.stick_finger == Some(finger) {
            self.stick_finger = None;
            self.joystick.release();
        }
        if self.jump_finger == Some(finger) {
            self.jump_finger = None;
        }
        if self.interact_finger == Some(finger) {
            self.interact_finger = None;
        }
    }

    /// Let go of everything, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.stick_finger = None;
        self.jump_finger = None;
        self.interact_finger = None;
        self.joystick.release();
    }

    /// Knob offset while the stick is held.
    pub fn knob_offset(&self) -> Option<Vec2> {
        self.joystick.is_active().then(|| self.joystick.knob_offset())
    }

    pub fn signal(&self) -> InputSignal {
        let (forward, turn) = self.joystick.movement();
        InputSignal::from_touch(
            forward,
            turn,
            self.jump_finger.is_some(),
            self.interact_finger.is_some(),
        )
    }
}
