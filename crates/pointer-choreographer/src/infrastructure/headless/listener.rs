//! The last stage of the headless pipeline.

use std::sync::Mutex;

use pointer_core::{MotionArgs, NotifyArgs};
use tracing::debug;

use super::lock;
use crate::application::interfaces::InputListener;

/// Records every notification it receives and logs it at debug level.
#[derive(Debug, Default)]
pub struct RecordingInputListener {
    events: Mutex<Vec<NotifyArgs>>,
}

impl RecordingInputListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NotifyArgs> {
        lock(&self.events).clone()
    }

    /// Only the motion events, in arrival order.
    pub fn motions(&self) -> Vec<MotionArgs> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                NotifyArgs::Motion(args) => Some(args.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_motion(&self) -> Option<MotionArgs> {
        self.motions().pop()
    }

    pub fn len(&self) -> usize {
        lock(&self.events).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InputListener for RecordingInputListener {
    fn notify(&self, args: NotifyArgs) {
        match &args {
            NotifyArgs::Motion(motion) => debug!(
                "motion {:?} from device {} on display {} cursor={:?}",
                motion.action, motion.device_id, motion.display_id, motion.cursor_position
            ),
            other => debug!("forwarded {other:?}"),
        }
        lock(&self.events).push(args);
    }
}
