use glam::Vec3;

use crate::scene_graph::ObjectId;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl_or_meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl_or_meta: false,
        shift: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        ctrl_or_meta: false,
        shift: true,
    };

    pub const CTRL_OR_META: Modifiers = Modifiers {
        ctrl_or_meta: true,
        shift: false,
    };

    /// Whether a click adds to the selection instead of replacing it.
    pub fn extends_selection(&self) -> bool {
        self.ctrl_or_meta || self.shift
    }
}

/// What the hit-tester resolved a click to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Nothing,
    Object(ObjectId),
    Vertex(usize),
}

/// Pointer events in world space, as delivered by the input layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down {
        point: Vec3,
        hit: Hit,
        modifiers: Modifiers,
    },
    Move {
        point: Vec3,
    },
    Up,
    Wheel {
        notches: f32,
    },
    /// The capture surface lost focus; any drag must end.
    FocusLost,
}
