//! Named-scenario registry with a current selection.

use std::io::Read;

use crate::{codec, Scenario};
use wildgrid_core::SimError;

/// Holds every loaded scenario by name and tracks which one is active.
///
/// Registration order is preserved; re-registering a name replaces the
/// scenario in place without changing its position. Exactly one scenario
/// is active at a time, always the most recently loaded or switched-to.
#[derive(Clone, Debug, Default)]
pub struct Session {
    scenarios: Vec<Scenario>,
    current: Option<String>,
}

impl Session {
    /// Creates an empty session with no current scenario.
    #[must_use]
    pub fn new() -> Session {
        Session::default()
    }

    /// Decodes a save from the stream and registers it as current.
    ///
    /// # Errors
    ///
    /// [`SimError::BadSave`] from the codec; the session is unchanged on
    /// failure.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SimError> {
        let scenario = codec::read_from(reader)?;
        self.register(scenario);
        Ok(())
    }

    /// Registers a scenario and makes it current. A scenario with the same
    /// name is replaced in place, keeping its registration position.
    pub fn register(&mut self, scenario: Scenario) {
        let name = scenario.name().to_string();
        match self
            .scenarios
            .iter_mut()
            .find(|registered| registered.name() == name)
        {
            Some(slot) => *slot = scenario,
            None => self.scenarios.push(scenario),
        }
        self.current = Some(name);
    }

    /// Makes the named scenario current.
    ///
    /// # Errors
    ///
    /// [`SimError::BadSave`] when no scenario of that name is registered;
    /// the current selection is unchanged.
    pub fn switch(&mut self, name: &str) -> Result<(), SimError> {
        if self
            .scenarios
            .iter()
            .any(|registered| registered.name() == name)
        {
            self.current = Some(name.to_string());
            Ok(())
        } else {
            Err(SimError::BadSave(format!(
                "no scenario named {name:?} is loaded"
            )))
        }
    }

    /// The current scenario, if any is loaded.
    #[must_use]
    pub fn current(&self) -> Option<&Scenario> {
        let name = self.current.as_deref()?;
        self.scenarios
            .iter()
            .find(|registered| registered.name() == name)
    }

    /// Mutable access to the current scenario.
    pub fn current_mut(&mut self) -> Option<&mut Scenario> {
        let name = self.current.clone()?;
        self.scenarios
            .iter_mut()
            .find(|registered| registered.name() == name)
    }

    /// Registered scenario names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.scenarios
            .iter()
            .map(|registered| registered.name())
            .collect()
    }

    /// Drops every registered scenario and the current selection.
    pub fn reset(&mut self) {
        self.scenarios.clear();
        self.current = None;
    }
}
