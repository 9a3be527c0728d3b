//! Face-recognition attendance toggle.
//!
//! Gates the two mutually exclusive attendance modes behind one persisted
//! preference. The preference survives reloads via a [`PreferenceStore`]
//! and defaults to disabled when absent.

use crate::ports::{PreferenceStore, PrefsError};
use crate::types::AttendanceMode;

/// Fixed storage key for the face-recognition preference.
pub const FACE_RECOGNITION_KEY: &str = "faceRecognitionEnabled";

/// Attendance toggle bound to a preference store.
///
/// While disabled, both mode controls are off and no mode is selectable.
/// Enabling always lands on time-in as the default mode.
pub struct AttendanceToggle<S> {
    store: S,
    enabled: bool,
    selected: Option<AttendanceMode>,
}

impl<S: PreferenceStore> AttendanceToggle<S> {
    /// Read the persisted preference and apply it. An absent key leaves
    /// the default (disabled). Applying persists the value back, so a
    /// hydrated toggle and a freshly flipped one behave identically.
    pub fn hydrate(store: S) -> Result<Self, PrefsError> {
        let enabled = match store.get(FACE_RECOGNITION_KEY)? {
            Some(value) => value == "true",
            None => false,
        };
        let mut toggle = Self {
            store,
            enabled: false,
            selected: None,
        };
        toggle.apply(enabled)?;
        Ok(toggle)
    }

    /// Flip the toggle. Enables or disables the time-in/time-out pair as
    /// a unit, forces time-in when turning on, and writes the new value
    /// to the store unconditionally, including `false`.
    pub fn apply(&mut self, enabled: bool) -> Result<(), PrefsError> {
        self.enabled = enabled;
        self.selected = if enabled {
            Some(AttendanceMode::TimeIn)
        } else {
            None
        };
        tracing::debug!(enabled, "attendance toggle applied");
        self.store.set(
            FACE_RECOGNITION_KEY,
            if enabled { "true" } else { "false" },
        )
    }

    /// Select an attendance mode. Dead while the toggle is disabled,
    /// like a disabled radio control; returns whether it took effect.
    pub fn select(&mut self, mode: AttendanceMode) -> bool {
        if self.enabled {
            self.selected = Some(mode);
            true
        } else {
            false
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the time-in/time-out controls respond. Both follow the
    /// toggle as a pair.
    pub fn mode_controls_enabled(&self) -> bool {
        self.enabled
    }

    pub fn selected(&self) -> Option<AttendanceMode> {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory store standing in for the client's durable storage.
    #[derive(Default)]
    struct MemStore {
        values: RefCell<HashMap<String, String>>,
    }

    impl PreferenceStore for &MemStore {
        fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn defaults_to_disabled_when_absent() {
        let store = MemStore::default();
        let toggle = AttendanceToggle::hydrate(&store).unwrap();
        assert!(!toggle.enabled());
        assert!(!toggle.mode_controls_enabled());
        assert_eq!(toggle.selected(), None);
    }

    #[test]
    fn enabling_selects_time_in_and_persists() {
        let store = MemStore::default();
        let mut toggle = AttendanceToggle::hydrate(&store).unwrap();
        toggle.apply(true).unwrap();
        assert!(toggle.mode_controls_enabled());
        assert_eq!(toggle.selected(), Some(AttendanceMode::TimeIn));
        assert_eq!(
            store.values.borrow().get(FACE_RECOGNITION_KEY).cloned(),
            Some("true".to_string())
        );
    }

    #[test]
    fn disabling_kills_both_mode_controls() {
        let store = MemStore::default();
        let mut toggle = AttendanceToggle::hydrate(&store).unwrap();
        toggle.apply(true).unwrap();
        toggle.select(AttendanceMode::TimeOut);
        toggle.apply(false).unwrap();
        assert!(!toggle.mode_controls_enabled());
        assert_eq!(toggle.selected(), None);
        // The write is unconditional, including false.
        assert_eq!(
            store.values.borrow().get(FACE_RECOGNITION_KEY).cloned(),
            Some("false".to_string())
        );
    }

    #[test]
    fn preference_round_trips_through_rehydration() {
        let store = MemStore::default();
        let mut toggle = AttendanceToggle::hydrate(&store).unwrap();
        toggle.apply(true).unwrap();
        drop(toggle);

        // Simulated reload: a fresh toggle over the same storage.
        let rehydrated = AttendanceToggle::hydrate(&store).unwrap();
        assert!(rehydrated.enabled());
        assert_eq!(rehydrated.selected(), Some(AttendanceMode::TimeIn));
    }

    #[test]
    fn select_is_dead_while_disabled() {
        let store = MemStore::default();
        let mut toggle = AttendanceToggle::hydrate(&store).unwrap();
        assert!(!toggle.select(AttendanceMode::TimeOut));
        assert_eq!(toggle.selected(), None);

        toggle.apply(true).unwrap();
        assert!(toggle.select(AttendanceMode::TimeOut));
        assert_eq!(toggle.selected(), Some(AttendanceMode::TimeOut));
    }
}
