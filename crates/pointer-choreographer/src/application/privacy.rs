//! Hides pointer indicators from screenshots of displays showing sensitive windows.
//!
//! The choreographer subscribes to the window-metadata feed only while at
//! least one pointer controller exists. Each update recomputes the set of
//! privacy-sensitive displays and, when it changes, re-applies the
//! skip-screenshot flags on every controller. The same updates carry the
//! display list used to synthesize a fallback topology.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use pointer_core::input::window::{DisplayInfo, WindowInfo, WindowInfosUpdate};
use pointer_core::{DisplayId, DisplayTopology};
use tracing::{debug, info, trace};

use super::interfaces::WindowInfosFeed;
use super::state::{lock_state, ChoreographerState};

/// Displays showing at least one visible window flagged sensitive for privacy.
pub fn privacy_sensitive_displays(window_infos: &[WindowInfo]) -> BTreeSet<DisplayId> {
    window_infos
        .iter()
        .filter(|window| window.hides_pointer_indicators())
        .map(|window| window.display_id)
        .collect()
}

/// Handle given to the window-metadata feed.
///
/// Holds only a weak reference to the choreographer state: once the
/// choreographer is dropped, updates delivered through a stale handle are
/// ignored.
#[derive(Clone)]
pub struct WindowInfosListener {
    state: Weak<Mutex<ChoreographerState>>,
}

impl WindowInfosListener {
    pub(crate) fn new(state: Weak<Mutex<ChoreographerState>>) -> Self {
        Self { state }
    }

    /// Delivers a window-metadata update.
    ///
    /// Must not be called from inside [`WindowInfosFeed::register`].
    pub fn on_window_infos_changed(&self, update: &WindowInfosUpdate) {
        let Some(state) = self.state.upgrade() else {
            trace!("window infos update after choreographer teardown; ignored");
            return;
        };
        lock_state(&state).on_window_infos_changed(update);
    }

    /// Whether the choreographer this handle points at still exists.
    pub fn is_attached(&self) -> bool {
        self.state.strong_count() > 0
    }
}

impl fmt::Debug for WindowInfosListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowInfosListener")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Subscription bookkeeping for the window-metadata feed.
pub(crate) struct PrivacyTracker {
    feed: Arc<dyn WindowInfosFeed>,
    listener: WindowInfosListener,
    registered: bool,
    pub(crate) sensitive_displays: BTreeSet<DisplayId>,
}

impl PrivacyTracker {
    pub(crate) fn new(feed: Arc<dyn WindowInfosFeed>, listener: WindowInfosListener) -> Self {
        Self {
            feed,
            listener,
            registered: false,
            sensitive_displays: BTreeSet::new(),
        }
    }

    pub(crate) fn is_registered(&self) -> bool {
        self.registered
    }

    /// Unsubscribes if subscribed. Used on teardown.
    pub(crate) fn unregister(&mut self) {
        if self.registered {
            self.registered = false;
            self.feed.unregister();
            debug!("window infos listener unregistered");
        }
    }
}

impl ChoreographerState {
    /// Keeps the feed subscription in step with controller existence and
    /// refreshes skip-screenshot flags on the current controllers.
    ///
    /// Called whenever a controller may have been created or destroyed.
    pub(crate) fn on_controller_added_or_removed(&mut self) {
        if !self.flags.needs_window_infos() {
            return;
        }

        let require_listener = self.has_any_controller();
        if require_listener && !self.privacy.registered {
            self.privacy.registered = true;
            let initial = self.privacy.feed.register(self.privacy.listener.clone());
            if self.flags.hide_pointer_indicators_for_secure_windows {
                self.privacy.sensitive_displays = privacy_sensitive_displays(&initial);
            }
            debug!(
                "window infos listener registered; {} sensitive display(s)",
                self.privacy.sensitive_displays.len()
            );
        } else if !require_listener && self.privacy.registered {
            self.privacy.unregister();
            self.privacy.sensitive_displays.clear();
            return;
        }

        if require_listener {
            self.apply_skip_screenshot_flags();
        }
    }

    pub(crate) fn on_window_infos_changed(&mut self, update: &WindowInfosUpdate) {
        if self.flags.hide_pointer_indicators_for_secure_windows {
            self.update_sensitive_displays(&update.window_infos);
        }
        self.populate_fallback_topology(&update.display_infos);
    }

    fn update_sensitive_displays(&mut self, window_infos: &[WindowInfo]) {
        let sensitive = privacy_sensitive_displays(window_infos);
        if sensitive != self.privacy.sensitive_displays {
            info!(
                "privacy-sensitive displays changed: {:?} -> {:?}",
                self.privacy.sensitive_displays, sensitive
            );
            self.privacy.sensitive_displays = sensitive;
            self.apply_skip_screenshot_flags();
        }
    }

    /// Clears and re-sets skip-screenshot flags on every controller.
    ///
    /// Touch controllers are flagged for every sensitive display; the other
    /// kinds only for the display they are currently shown on.
    pub(crate) fn apply_skip_screenshot_flags(&mut self) {
        let sensitive = &self.privacy.sensitive_displays;

        for controller in self.touch_pointers_by_device.values_mut() {
            controller.clear_skip_screenshot_flags();
            for &display_id in sensitive {
                controller.set_skip_screenshot_flag_for_display(display_id);
            }
        }

        for (&display_id, controller) in self.mouse_pointers_by_display.iter_mut() {
            controller.clear_skip_screenshot_flags();
            if sensitive.contains(&display_id) {
                controller.set_skip_screenshot_flag_for_display(display_id);
            }
        }

        let per_device = self
            .stylus_pointers_by_device
            .values_mut()
            .chain(self.drawing_tablet_pointers_by_device.values_mut());
        for controller in per_device {
            controller.clear_skip_screenshot_flags();
            let display_id = controller.display_id();
            if sensitive.contains(&display_id) {
                controller.set_skip_screenshot_flag_for_display(display_id);
            }
        }
    }

    /// Builds a fallback topology from the display list when none was supplied.
    fn populate_fallback_topology(&mut self, display_infos: &[DisplayInfo]) {
        if !self.flags.connected_displays_cursor || self.topology_supplied {
            return;
        }

        let displays: Vec<DisplayId> = display_infos.iter().map(|d| d.display_id).collect();
        if self.topology.covers_exactly(&displays) {
            return;
        }

        self.topology = DisplayTopology::synthesize_fallback(&displays);
        debug!("synthesized fallback topology for {} display(s)", displays.len());

        if !self.topology.contains(self.default_mouse_display_id) {
            debug!(
                "default mouse display {} left the topology; resetting to {}",
                self.default_mouse_display_id,
                DisplayId::DEFAULT
            );
            self.default_mouse_display_id = DisplayId::DEFAULT;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
