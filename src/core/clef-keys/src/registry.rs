//! Per-algorithm key registry.
//!
//! The registry owns every key schedule it holds. Entries are keyed by the
//! handle's serial; the serial counter lives under the same lock as the map so
//! handle issue and insertion are one atomic step.
//!
//! Transforms run inside [`KeyRegistry::with_schedule`] while the read lock is
//! held, so a concurrent [`KeyRegistry::remove_and_release`] cannot release a
//! schedule that is in use.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use clef_cipher::KeySchedule;
use tracing::{debug, warn};

use crate::error::KeyError;
use crate::handle::KeyHandle;

#[derive(Default)]
struct RegistryState {
    last_serial: u64,
    entries: BTreeMap<u64, Box<dyn KeySchedule>>,
}

/// Mapping from key handles to live key schedules for one algorithm.
pub struct KeyRegistry {
    algorithm: &'static str,
    state: RwLock<RegistryState>,
}

impl KeyRegistry {
    /// Creates an empty registry for `algorithm`.
    pub fn new(algorithm: &'static str) -> Self {
        Self {
            algorithm,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Algorithm whose schedules this registry holds.
    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, handle: &str) -> Result<KeyHandle, KeyError> {
        KeyHandle::parse(self.algorithm, handle)
            .ok_or_else(|| KeyError::UnknownHandle(handle.to_string()))
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Stores `schedule` under a freshly generated handle.
    ///
    /// The counter is bumped before use, so the first handle of a registry is
    /// `<algorithm>key1`, and serials are never handed out twice.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::SerialsExhausted`] once the counter cannot advance.
    /// The schedule is released.
    pub fn issue(&self, schedule: Box<dyn KeySchedule>) -> Result<KeyHandle, KeyError> {
        let mut state = self.write();
        let Some(serial) = state.last_serial.checked_add(1) else {
            warn!(cipher = self.algorithm, "Key serials exhausted");
            release(schedule);
            return Err(KeyError::SerialsExhausted(self.algorithm));
        };
        state.last_serial = serial;
        let handle = KeyHandle::new(self.algorithm, serial);
        Self::insert_locked(&mut state, handle, schedule)?;
        Ok(handle)
    }

    /// Stores `schedule` under an explicit handle.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnknownHandle`] if the handle names another
    /// algorithm, [`KeyError::DuplicateHandle`] if it is already live. The
    /// rejected schedule is released, never leaked.
    pub fn insert(
        &self,
        handle: KeyHandle,
        schedule: Box<dyn KeySchedule>,
    ) -> Result<(), KeyError> {
        if handle.algorithm() != self.algorithm {
            release(schedule);
            return Err(KeyError::UnknownHandle(handle.to_string()));
        }

        let mut state = self.write();
        state.last_serial = state.last_serial.max(handle.serial());
        Self::insert_locked(&mut state, handle, schedule)
    }

    fn insert_locked(
        state: &mut RegistryState,
        handle: KeyHandle,
        schedule: Box<dyn KeySchedule>,
    ) -> Result<(), KeyError> {
        if state.entries.contains_key(&handle.serial()) {
            warn!(handle = %handle, "Duplicate key handle rejected");
            release(schedule);
            return Err(KeyError::DuplicateHandle(handle.to_string()));
        }

        state.entries.insert(handle.serial(), schedule);
        Ok(())
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Runs `f` against the schedule behind `handle`.
    ///
    /// The schedule stays pinned (the read lock is held) for the duration of
    /// `f`. `f` must not call back into this registry's mutating methods.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnknownHandle`] if the handle is not live.
    pub fn with_schedule<R>(
        &self,
        handle: &str,
        f: impl FnOnce(&dyn KeySchedule) -> R,
    ) -> Result<R, KeyError> {
        let key = self.resolve(handle)?;
        let state = self.read();
        let schedule = state
            .entries
            .get(&key.serial())
            .ok_or_else(|| KeyError::UnknownHandle(handle.to_string()))?;
        Ok(f(schedule.as_ref()))
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, handle: &str) -> bool {
        match KeyHandle::parse(self.algorithm, handle) {
            Some(key) => self.read().entries.contains_key(&key.serial()),
            None => false,
        }
    }

    /// Number of live schedules.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    /// Returns true if no schedule is live.
    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn handles(&self) -> Vec<KeyHandle> {
        self.read()
            .entries
            .keys()
            .map(|&serial| KeyHandle::new(self.algorithm, serial))
            .collect()
    }

    // ========================================================================
    // Release
    // ========================================================================

    /// Removes `handle` and releases its schedule.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::UnknownHandle`] if the handle is not live; a second
    /// release of the same handle is an error, not a no-op.
    pub fn remove_and_release(&self, handle: &str) -> Result<KeyHandle, KeyError> {
        let key = self.resolve(handle)?;
        let schedule = self
            .write()
            .entries
            .remove(&key.serial())
            .ok_or_else(|| KeyError::UnknownHandle(handle.to_string()))?;

        release(schedule);
        debug!(handle = %key, "Key schedule released");
        Ok(key)
    }

    /// Removes and releases every live schedule. Returns how many were released.
    pub fn drain_all(&self) -> usize {
        let entries = std::mem::take(&mut self.write().entries);
        let drained = entries.len();

        for (serial, schedule) in entries {
            debug!(
                handle = %KeyHandle::new(self.algorithm, serial),
                cipher = self.algorithm,
                "Deleting key schedule on drain"
            );
            release(schedule);
        }

        drained
    }
}

impl std::fmt::Debug for KeyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("KeyRegistry")
            .field("algorithm", &self.algorithm)
            .field("last_serial", &state.last_serial)
            .field("live", &state.entries.len())
            .finish()
    }
}

fn release(mut schedule: Box<dyn KeySchedule>) {
    schedule.done();
}
