//! derived per‑action input signals
//!
//! Raw device state goes in once per frame; the rest of the game only reads
//! the derived signals.
use bevy::input::ButtonInput;
use bevy::prelude::*;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Down,
    Jump,
}

impl Action {
    /// also the order the mining driver checks held actions in
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Down, Action::Jump];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    fn keys(self) -> &'static [KeyCode] {
        match self {
            Action::Left => &[KeyCode::ArrowLeft, KeyCode::KeyA],
            Action::Right => &[KeyCode::ArrowRight, KeyCode::KeyD],
            Action::Down => &[KeyCode::ArrowDown, KeyCode::KeyS],
            Action::Jump => &[KeyCode::Space, KeyCode::KeyW, KeyCode::ArrowUp],
        }
    }

    fn pad_buttons(self) -> &'static [GamepadButton] {
        match self {
            Action::Left => &[GamepadButton::DPadLeft],
            Action::Right => &[GamepadButton::DPadRight],
            Action::Down => &[GamepadButton::DPadDown],
            Action::Jump => &[GamepadButton::DPadUp, GamepadButton::South],
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// max frames between two presses that still count as a double click
    pub double_click_frames: u64,
    /// frames a button must stay down before it counts as held
    pub hold_frames: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { double_click_frames: 10, hold_frames: 5 }
    }
}

/// raw state of one action for one frame
#[derive(Clone, Copy, Debug, Default)]
pub struct RawButton {
    pub just_pressed: bool,
    pub down: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionSignals {
    pub just_pressed: bool,
    /// currently down, no delay
    pub down: bool,
    /// down for at least `hold_frames` frames
    pub held: bool,
    pub double_click: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Tracker {
    signals: ActionSignals,
    hold_counter: u32,
    last_press: Option<u64>,
}

#[derive(Resource, Clone, Debug)]
pub struct ActionInput {
    config: InputConfig,
    frame: u64,
    trackers: [Tracker; 4],
}

impl ActionInput {
    pub fn new(config: InputConfig) -> Self {
        Self { config, frame: 0, trackers: [Tracker::default(); 4] }
    }

    /// advance one frame using `raw` for every action
    pub fn update(&mut self, mut raw: impl FnMut(Action) -> RawButton) {
        self.frame += 1;
        for action in Action::ALL {
            let now = raw(action);
            let t = &mut self.trackers[action.index()];

            let double_click = now.just_pressed
                && t.last_press
                    .is_some_and(|last| self.frame - last <= self.config.double_click_frames);
            if now.just_pressed {
                t.last_press = Some(self.frame);
            }

            if now.down {
                t.hold_counter = t.hold_counter.saturating_add(1);
            } else {
                t.hold_counter = 0;
            }

            t.signals = ActionSignals {
                just_pressed: now.just_pressed,
                down: now.down,
                held: now.down && t.hold_counter >= self.config.hold_frames,
                double_click,
            };
        }
    }

    #[inline]
    pub fn signals(&self, action: Action) -> ActionSignals {
        self.trackers[action.index()].signals
    }
    pub fn just_pressed(&self, action: Action) -> bool {
        self.signals(action).just_pressed
    }
    pub fn down(&self, action: Action) -> bool {
        self.signals(action).down
    }
    pub fn held(&self, action: Action) -> bool {
        self.signals(action).held
    }
    pub fn double_click(&self, action: Action) -> bool {
        self.signals(action).double_click
    }
}

impl Default for ActionInput {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

/* ===========================================================
   keyboard + gamepad polling
   =========================================================== */
pub fn input_system(
    keys: Res<ButtonInput<KeyCode>>,
    pads: Query<&Gamepad>,
    mut input: ResMut<ActionInput>,
) {
    input.update(|action| {
        let pad_just = pads
            .iter()
            .any(|p| action.pad_buttons().iter().any(|&b| p.just_pressed(b)));
        let pad_down = pads
            .iter()
            .any(|p| action.pad_buttons().iter().any(|&b| p.pressed(b)));
        RawButton {
            just_pressed: keys.any_just_pressed(action.keys().iter().copied()) || pad_just,
            down: keys.any_pressed(action.keys().iter().copied()) || pad_down,
        }
    });

    for action in Action::ALL {
        if input.double_click(action) {
            debug!("double click: {action:?}");
        }
    }
}
