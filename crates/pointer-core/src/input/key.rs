//! Key event model.

use crate::domain::ids::{DeviceId, DisplayId};

use super::source::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A platform key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const A: KeyCode = KeyCode(29);
    pub const SPACE: KeyCode = KeyCode(62);
    pub const ALT_LEFT: KeyCode = KeyCode(57);
    pub const ALT_RIGHT: KeyCode = KeyCode(58);
    pub const SHIFT_LEFT: KeyCode = KeyCode(59);
    pub const SHIFT_RIGHT: KeyCode = KeyCode(60);
    pub const SYM: KeyCode = KeyCode(63);
    pub const CTRL_LEFT: KeyCode = KeyCode(113);
    pub const CTRL_RIGHT: KeyCode = KeyCode(114);
    pub const CAPS_LOCK: KeyCode = KeyCode(115);
    pub const SCROLL_LOCK: KeyCode = KeyCode(116);
    pub const META_LEFT: KeyCode = KeyCode(117);
    pub const META_RIGHT: KeyCode = KeyCode(118);
    pub const FUNCTION: KeyCode = KeyCode(119);
    pub const NUM_LOCK: KeyCode = KeyCode(143);

    /// Modifier and lock keys, which never dismiss the cursor while typing.
    pub fn is_meta_key(self) -> bool {
        matches!(
            self,
            KeyCode::ALT_LEFT
                | KeyCode::ALT_RIGHT
                | KeyCode::SHIFT_LEFT
                | KeyCode::SHIFT_RIGHT
                | KeyCode::SYM
                | KeyCode::FUNCTION
                | KeyCode::CTRL_LEFT
                | KeyCode::CTRL_RIGHT
                | KeyCode::META_LEFT
                | KeyCode::META_RIGHT
                | KeyCode::CAPS_LOCK
                | KeyCode::NUM_LOCK
                | KeyCode::SCROLL_LOCK
        )
    }
}

/// Active modifier and lock state at the time of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetaState(pub u32);

impl MetaState {
    pub const SHIFT_ON: u32 = 0x01;
    pub const ALT_ON: u32 = 0x02;
    pub const SHIFT_LEFT_ON: u32 = 0x40;
    pub const SHIFT_RIGHT_ON: u32 = 0x80;
    pub const CTRL_ON: u32 = 0x1000;
    pub const META_ON: u32 = 0x10000;
    pub const CAPS_LOCK_ON: u32 = 0x100000;
    pub const NUM_LOCK_ON: u32 = 0x200000;
    pub const SCROLL_LOCK_ON: u32 = 0x400000;

    /// Shift and lock states, which still allow the cursor to fade on typing.
    const TYPING_MASK: u32 = Self::CAPS_LOCK_ON
        | Self::NUM_LOCK_ON
        | Self::SCROLL_LOCK_ON
        | Self::SHIFT_LEFT_ON
        | Self::SHIFT_RIGHT_ON
        | Self::SHIFT_ON;

    /// Returns `true` if any modifier beyond shift and the lock keys is held.
    pub fn has_non_typing_modifiers(self) -> bool {
        self.0 & !Self::TYPING_MASK != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyArgs {
    pub event_time_ns: i64,
    pub device_id: DeviceId,
    pub source: Source,
    pub display_id: DisplayId,
    pub action: KeyAction,
    pub key_code: KeyCode,
    pub meta_state: MetaState,
}

impl KeyArgs {
    pub fn new(device_id: DeviceId, action: KeyAction, key_code: KeyCode) -> Self {
        Self {
            event_time_ns: 0,
            device_id,
            source: Source::KEYBOARD,
            display_id: DisplayId::INVALID,
            action,
            key_code,
            meta_state: MetaState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_and_locks_are_typing_modifiers() {
        let state = MetaState(MetaState::SHIFT_ON | MetaState::SHIFT_LEFT_ON | MetaState::CAPS_LOCK_ON);
        assert!(!state.has_non_typing_modifiers());
    }

    #[test]
    fn test_ctrl_is_not_a_typing_modifier() {
        assert!(MetaState(MetaState::CTRL_ON).has_non_typing_modifiers());
        assert!(MetaState(MetaState::ALT_ON | MetaState::SHIFT_ON).has_non_typing_modifiers());
    }

    #[test]
    fn test_letter_is_not_meta_key() {
        assert!(!KeyCode::A.is_meta_key());
        assert!(KeyCode::SHIFT_LEFT.is_meta_key());
        assert!(KeyCode::NUM_LOCK.is_meta_key());
    }
}
