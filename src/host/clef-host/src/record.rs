//! Published per-algorithm records.

use clef_cipher::CipherInfo;
use serde::Serialize;

use crate::config::HostConfig;
use crate::dispatch::Operation;
use crate::value::Value;

/// Read-only description of a registered cipher and its commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CipherRecord {
    /// Algorithm name.
    pub name: String,
    /// Numeric algorithm identifier.
    #[serde(rename = "ID")]
    pub id: u8,
    /// Smallest accepted key, in bytes.
    pub min_key_length: usize,
    /// Largest accepted key, in bytes.
    pub max_key_length: usize,
    /// Block size, in bytes.
    pub block_length: usize,
    /// Round count used when none is supplied.
    pub default_rounds: u32,
    /// Setup command name.
    pub setup: String,
    /// Encrypt command name.
    pub ecb_encrypt: String,
    /// Decrypt command name.
    pub ecb_decrypt: String,
    /// Done command name.
    pub done: String,
    /// Keysize command name.
    pub keysize: String,
}

impl CipherRecord {
    /// Builds the record for `info` under the naming in `config`.
    pub fn new(info: &CipherInfo, config: &HostConfig) -> Self {
        let command = |op: Operation| config.command_name(info.name, op.verb());
        Self {
            name: info.name.to_string(),
            id: info.id,
            min_key_length: info.min_key_length,
            max_key_length: info.max_key_length,
            block_length: info.block_length,
            default_rounds: info.default_rounds,
            setup: command(Operation::Setup),
            ecb_encrypt: command(Operation::EcbEncrypt),
            ecb_decrypt: command(Operation::EcbDecrypt),
            done: command(Operation::Done),
            keysize: command(Operation::Keysize),
        }
    }

    /// Command name for `operation`.
    pub fn command(&self, operation: Operation) -> &str {
        match operation {
            Operation::Setup => &self.setup,
            Operation::EcbEncrypt => &self.ecb_encrypt,
            Operation::EcbDecrypt => &self.ecb_decrypt,
            Operation::Done => &self.done,
            Operation::Keysize => &self.keysize,
        }
    }

    /// Flat key/value list form, as published in the environment.
    pub fn to_value(&self) -> Value {
        let mut items = vec![
            Value::from("name"),
            Value::from(self.name.as_str()),
            Value::from("ID"),
            Value::Int(i64::from(self.id)),
            Value::from("min_key_length"),
            Value::from(self.min_key_length),
            Value::from("max_key_length"),
            Value::from(self.max_key_length),
            Value::from("block_length"),
            Value::from(self.block_length),
            Value::from("default_rounds"),
            Value::Int(i64::from(self.default_rounds)),
        ];
        for op in Operation::ALL {
            items.push(Value::from(op.verb()));
            items.push(Value::from(self.command(op)));
        }
        Value::List(items)
    }
}
