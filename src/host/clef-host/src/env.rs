//! Command environment.
//!
//! A [`CommandEnv`] is the minimal host a cipher registers into: a table of
//! named commands and a set of named record arrays.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::error::HostError;
use crate::value::Value;

/// A command callable through a [`CommandEnv`].
pub trait CommandHandler: Send + Sync {
    /// Runs the command.
    ///
    /// `name` is the name the command was invoked under and is used in
    /// usage errors.
    fn call(&self, name: &str, args: &[Value]) -> Result<Value, HostError>;
}

impl<F> CommandHandler for F
where
    F: Fn(&str, &[Value]) -> Result<Value, HostError> + Send + Sync,
{
    fn call(&self, name: &str, args: &[Value]) -> Result<Value, HostError> {
        self(name, args)
    }
}

/// Named commands plus published records.
///
/// Dropping the environment drops every command, which in turn releases
/// whatever the commands hold (cipher bindings and their key schedules).
#[derive(Default)]
pub struct CommandEnv {
    commands: BTreeMap<String, Box<dyn CommandHandler>>,
    records: BTreeMap<String, BTreeMap<String, Value>>,
}

impl CommandEnv {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous command.
    pub fn create_command(
        &mut self,
        name: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) {
        let name = name.into();
        trace!(command = %name, "Command created");
        if self.commands.insert(name, Box::new(handler)).is_some() {
            debug!("Replaced existing command");
        }
    }

    /// Removes the command registered under `name`.
    ///
    /// Returns false if there was none.
    pub fn delete_command(&mut self, name: &str) -> bool {
        let removed = self.commands.remove(name).is_some();
        if removed {
            trace!(command = name, "Command deleted");
        }
        removed
    }

    /// Returns true if a command is registered under `name`.
    pub fn has_command(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Invokes the command registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::UnknownCommand`] if no such command exists, or
    /// whatever the command itself reports.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, HostError> {
        let handler = self
            .commands
            .get(name)
            .ok_or_else(|| HostError::UnknownCommand(name.to_string()))?;
        handler.call(name, args)
    }

    /// Registered command names, sorted.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Publishes `value` as element `key` of record array `array`.
    pub fn set_record(&mut self, array: &str, key: &str, value: Value) {
        self.records
            .entry(array.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Reads element `key` of record array `array`.
    pub fn record(&self, array: &str, key: &str) -> Option<&Value> {
        self.records.get(array)?.get(key)
    }

    /// Removes element `key` of record array `array`.
    pub fn unset_record(&mut self, array: &str, key: &str) -> Option<Value> {
        let elements = self.records.get_mut(array)?;
        let removed = elements.remove(key);
        if elements.is_empty() {
            self.records.remove(array);
        }
        removed
    }

    /// Element names of record array `array`, sorted.
    pub fn record_keys(&self, array: &str) -> Vec<&str> {
        self.records
            .get(array)
            .map(|elements| elements.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for CommandEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEnv")
            .field("commands", &self.commands.len())
            .field("records", &self.records)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;

    fn echo(_name: &str, args: &[Value]) -> Result<Value, HostError> {
        Ok(Value::List(args.to_vec()))
    }

    #[test]
    fn test_invoke_and_delete() {
        let mut env = CommandEnv::new();
        env.create_command("echo", echo);

        let out = env.invoke("echo", &[Value::Int(1), Value::from("a")]).unwrap();
        assert_eq!(out.to_string(), "1 a");
        assert_eq!(env.command_names(), vec!["echo"]);

        assert!(env.delete_command("echo"));
        assert!(!env.delete_command("echo"));
        assert_eq!(
            env.invoke("echo", &[]),
            Err(HostError::UnknownCommand("echo".into()))
        );
    }

    #[test]
    fn test_closure_handler_sees_name() {
        let mut env = CommandEnv::new();
        env.create_command("who", |name: &str, _: &[Value]| -> Result<Value, HostError> {
            Ok(Value::from(name))
        });
        assert_eq!(env.invoke("who", &[]).unwrap(), Value::from("who"));
    }

    #[test]
    fn test_records() {
        let mut env = CommandEnv::new();
        env.set_record("clef::cipher", "aes", Value::Int(1));
        env.set_record("clef::cipher", "des", Value::Int(2));

        assert_eq!(env.record("clef::cipher", "aes"), Some(&Value::Int(1)));
        assert_eq!(env.record_keys("clef::cipher"), vec!["aes", "des"]);
        assert!(env.record("other", "aes").is_none());

        assert_eq!(env.unset_record("clef::cipher", "aes"), Some(Value::Int(1)));
        assert_eq!(env.record_keys("clef::cipher"), vec!["des"]);
    }
}
