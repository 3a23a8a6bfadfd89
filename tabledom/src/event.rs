use crate::node::NodeId;

/// Pointer input delivered by the host, already resolved to a target node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button pressed
    Press {
        target: Option<NodeId>,
        x: f32,
        y: f32,
        button: MouseButton,
    },
    /// Pointer moved
    Move {
        target: Option<NodeId>,
        x: f32,
        y: f32,
        button: MouseButton,
    },
    /// Button released
    Release {
        target: Option<NodeId>,
        x: f32,
        y: f32,
        button: MouseButton,
    },
}

impl PointerEvent {
    pub fn target(&self) -> Option<NodeId> {
        match self {
            PointerEvent::Press { target, .. }
            | PointerEvent::Move { target, .. }
            | PointerEvent::Release { target, .. } => *target,
        }
    }

    pub fn button(&self) -> MouseButton {
        match self {
            PointerEvent::Press { button, .. }
            | PointerEvent::Move { button, .. }
            | PointerEvent::Release { button, .. } => *button,
        }
    }

    pub fn position(&self) -> (f32, f32) {
        match self {
            PointerEvent::Press { x, y, .. }
            | PointerEvent::Move { x, y, .. }
            | PointerEvent::Release { x, y, .. } => (*x, *y),
        }
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}
