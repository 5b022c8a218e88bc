//! Integration tests for Clef.
//!
//! These tests drive every compiled-in cipher through the host command surface,
//! from registration to key release.

// Allow unwrap() in tests - panics are acceptable for test assertions
#![allow(clippy::disallowed_methods)]

use anyhow::{bail, Context, Result};
use clef_cipher::{catalog, CipherInfo};
use clef_host::{init_ciphers, CipherRecord, CommandEnv, HostConfig, HostError, Value};
use rand::RngCore;

// ============================================================================
// Test Host
// ============================================================================

/// A command environment with every cipher registered.
pub struct TestHost {
    env: CommandEnv,
    config: HostConfig,
    records: Vec<CipherRecord>,
}

impl TestHost {
    /// Registers every cipher under the default configuration.
    pub fn start() -> Result<Self> {
        Self::with_config(HostConfig::default())
    }

    /// Registers every cipher under `config`.
    pub fn with_config(config: HostConfig) -> Result<Self> {
        let mut env = CommandEnv::new();
        let records = init_ciphers(&mut env, &config).context("Failed to register ciphers")?;
        Ok(Self {
            env,
            config,
            records,
        })
    }

    pub fn records(&self) -> &[CipherRecord] {
        &self.records
    }

    pub fn env(&self) -> &CommandEnv {
        &self.env
    }

    fn invoke(&self, cipher: &str, verb: &str, args: &[Value]) -> Result<Value, HostError> {
        self.env
            .invoke(&self.config.command_name(cipher, verb), args)
    }

    pub fn setup(&self, cipher: &str, key: &[u8], rounds: Option<i64>) -> Result<String, HostError> {
        let mut args = vec![Value::Bytes(key.to_vec())];
        args.extend(rounds.map(Value::Int));
        self.invoke(cipher, "setup", &args).map(|v| v.to_string())
    }

    pub fn encrypt(&self, cipher: &str, block: &[u8], handle: &str) -> Result<Vec<u8>, HostError> {
        let args = [Value::Bytes(block.to_vec()), Value::from(handle)];
        self.invoke(cipher, "ecb_encrypt", &args).map(|v| v.to_bytes())
    }

    pub fn decrypt(&self, cipher: &str, block: &[u8], handle: &str) -> Result<Vec<u8>, HostError> {
        let args = [Value::Bytes(block.to_vec()), Value::from(handle)];
        self.invoke(cipher, "ecb_decrypt", &args).map(|v| v.to_bytes())
    }

    pub fn done(&self, cipher: &str, handle: &str) -> Result<(), HostError> {
        self.invoke(cipher, "done", &[Value::from(handle)]).map(|_| ())
    }

    pub fn keysize(&self, cipher: &str, requested: i64) -> Result<i64, HostError> {
        self.invoke(cipher, "keysize", &[Value::Int(requested)])?
            .as_int()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Key lengths worth exercising for a cipher: bounds plus one in between.
pub fn key_lengths(info: &CipherInfo) -> Result<Vec<usize>> {
    let descriptor = catalog::find(info.name).context("cipher not in catalog")?;
    let mid = descriptor
        .keysize((info.min_key_length + info.max_key_length) / 2)
        .context("midpoint key size rejected")?;

    let mut lengths = vec![info.min_key_length, mid, info.max_key_length];
    lengths.dedup();
    if lengths.is_empty() {
        bail!("no key lengths for {}", info.name);
    }
    Ok(lengths)
}

pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clef_cipher::CipherError;
    use clef_host::{CipherCommand, Operation};
    use clef_keys::{AlgorithmBinding, KeyError};
    use rand::Rng;

    use super::*;

    fn infos() -> Vec<CipherInfo> {
        catalog::descriptors().iter().map(|d| d.info()).collect()
    }

    #[test]
    fn test_records_match_descriptors() {
        let host = TestHost::start().unwrap();
        let infos = infos();
        assert_eq!(host.records().len(), infos.len());

        for (record, info) in host.records().iter().zip(&infos) {
            assert_eq!(record.name, info.name);
            assert_eq!(record.id, info.id);
            assert_eq!(record.min_key_length, info.min_key_length);
            assert_eq!(record.max_key_length, info.max_key_length);
            assert_eq!(record.block_length, info.block_length);
            assert_eq!(record.default_rounds, info.default_rounds);
            assert_eq!(
                host.env().record("clef::cipher", info.name),
                Some(&record.to_value())
            );
        }
    }

    #[test]
    fn test_roundtrip_every_cipher() {
        let host = TestHost::start().unwrap();
        for info in infos() {
            for len in key_lengths(&info).unwrap() {
                let key = random_bytes(len);
                let handle = host.setup(info.name, &key, None).unwrap();
                assert!(handle.starts_with(&format!("{}key", info.name)));

                let block = random_bytes(info.block_length);
                let ciphertext = host.encrypt(info.name, &block, &handle).unwrap();
                assert_eq!(ciphertext.len(), info.block_length);
                assert_eq!(host.decrypt(info.name, &ciphertext, &handle).unwrap(), block);

                host.done(info.name, &handle).unwrap();
            }
        }
    }

    #[test]
    fn test_independent_schedules_agree() {
        let host = TestHost::start().unwrap();
        for info in infos() {
            let key = random_bytes(info.max_key_length);
            let a = host.setup(info.name, &key, None).unwrap();
            let b = host.setup(info.name, &key, None).unwrap();
            assert_ne!(a, b, "{}: handles must be distinct", info.name);

            let block = random_bytes(info.block_length);
            let ciphertext = host.encrypt(info.name, &block, &a).unwrap();
            assert_eq!(host.encrypt(info.name, &block, &b).unwrap(), ciphertext);
            assert_eq!(host.decrypt(info.name, &ciphertext, &b).unwrap(), block);
        }
    }

    #[test]
    fn test_wrong_block_length_every_cipher() {
        let host = TestHost::start().unwrap();
        for info in infos() {
            let handle = host.setup(info.name, &random_bytes(info.min_key_length), None).unwrap();
            for len in [0, info.block_length - 1, info.block_length + 1, 2 * info.block_length] {
                let expected = HostError::Key(KeyError::BlockLengthMismatch {
                    expected: info.block_length,
                    actual: len,
                });
                let block = vec![0u8; len];
                assert_eq!(host.encrypt(info.name, &block, &handle), Err(expected.clone()));
                // Length is checked before the handle is looked up.
                assert_eq!(host.decrypt(info.name, &block, "bogus"), Err(expected));
            }
        }
    }

    #[test]
    fn test_done_retires_handle() {
        let host = TestHost::start().unwrap();
        for info in infos() {
            let handle = host.setup(info.name, &random_bytes(info.max_key_length), None).unwrap();
            host.done(info.name, &handle).unwrap();

            let unknown = HostError::Key(KeyError::UnknownHandle(handle.clone()));
            let block = vec![0u8; info.block_length];
            assert_eq!(host.encrypt(info.name, &block, &handle), Err(unknown.clone()));
            assert_eq!(host.decrypt(info.name, &block, &handle), Err(unknown.clone()));
            assert_eq!(host.done(info.name, &handle), Err(unknown));

            // Retired handles are never issued again.
            let next = host.setup(info.name, &random_bytes(info.max_key_length), None).unwrap();
            assert_ne!(next, handle);
        }
    }

    #[test]
    fn test_concrete_scenario() {
        let host = TestHost::start().unwrap();
        for cipher in ["aes", "rijndael", "twofish"] {
            let key = [0x01u8; 16];
            assert_eq!(host.setup(cipher, &key, None).unwrap(), format!("{cipher}key1"));
            assert_eq!(host.setup(cipher, &key, None).unwrap(), format!("{cipher}key2"));

            let handle = format!("{cipher}key1");
            let zeros = [0u8; 16];
            let ciphertext = host.encrypt(cipher, &zeros, &handle).unwrap();
            assert_ne!(ciphertext, zeros);
            assert_eq!(host.decrypt(cipher, &ciphertext, &handle).unwrap(), zeros);

            let short = host.encrypt(cipher, &zeros[..15], &handle).unwrap_err();
            assert_eq!(short.to_string(), "bytes are shorter than cipher block length");

            assert!(host.done(cipher, &handle).is_ok());
            assert!(matches!(
                host.done(cipher, &handle),
                Err(HostError::Key(KeyError::UnknownHandle(_)))
            ));
        }
    }

    #[test]
    fn test_keysize_every_cipher() {
        let host = TestHost::start().unwrap();
        for info in infos() {
            let min = info.min_key_length as i64;
            let max = info.max_key_length as i64;

            assert_eq!(host.keysize(info.name, min).unwrap(), min);
            assert_eq!(host.keysize(info.name, max).unwrap(), max);
            assert_eq!(host.keysize(info.name, max + 100).unwrap(), max);
            assert_eq!(
                host.keysize(info.name, min - 1),
                Err(HostError::Key(KeyError::Algorithm(CipherError::InvalidKeySize(
                    info.min_key_length - 1
                ))))
            );

            let normalized = host.keysize(info.name, rand::thread_rng().gen_range(min..=max)).unwrap();
            let normalized = usize::try_from(normalized).unwrap();
            assert!(host.setup(info.name, &random_bytes(normalized), None).is_ok());
        }
    }

    #[test]
    fn test_invalid_keys_leave_no_handle() {
        let host = TestHost::start().unwrap();
        for info in infos() {
            let too_long = random_bytes(info.max_key_length + 1);
            assert!(matches!(
                host.setup(info.name, &too_long, None),
                Err(HostError::Key(KeyError::Algorithm(CipherError::InvalidKeySize(_))))
            ));
            assert!(matches!(
                host.setup(info.name, &random_bytes(info.max_key_length), Some(-1)),
                Err(HostError::InvalidArgumentType { .. })
            ));

            // Failures consumed no serial.
            let handle = host.setup(info.name, &random_bytes(info.max_key_length), None).unwrap();
            assert_eq!(handle, format!("{}key1", info.name));
        }
    }

    #[test]
    fn test_explicit_rounds() {
        let host = TestHost::start().unwrap();
        assert!(host.setup("aes", &[0u8; 24], Some(12)).is_ok());
        assert!(host.setup("aes", &[0u8; 24], Some(0)).is_ok());
        assert_eq!(
            host.setup("aes", &[0u8; 24], Some(10)),
            Err(HostError::Key(KeyError::Algorithm(CipherError::InvalidRounds(10))))
        );
        assert!(host.setup("cast5", &[0u8; 5], Some(12)).is_ok());
        assert!(host.setup("cast5", &[0u8; 5], Some(16)).is_ok());
        assert_eq!(
            host.setup("cast5", &[0u8; 16], Some(12)),
            Err(HostError::Key(KeyError::Algorithm(CipherError::InvalidRounds(12))))
        );
        assert!(host.setup("blowfish", &[0u8; 8], Some(16)).is_ok());
        assert!(host.setup("rc5", &[0u8; 8], Some(20)).is_ok());
        assert_eq!(
            host.setup("xtea", &[0u8; 16], Some(16)),
            Err(HostError::Key(KeyError::Algorithm(CipherError::InvalidRounds(16))))
        );
    }

    #[test]
    fn test_dropping_environment_releases_bindings() {
        let mut env = CommandEnv::new();
        let binding = AlgorithmBinding::new(&catalog::AES);
        for operation in Operation::ALL {
            env.create_command(
                format!("aes_{}", operation.verb()),
                CipherCommand::new(operation, binding.register_operation()),
            );
        }
        let weak = Arc::downgrade(&binding);
        drop(binding);

        for _ in 0..4 {
            env.invoke("aes_setup", &[Value::Bytes(random_bytes(32))]).unwrap();
        }
        assert_eq!(weak.upgrade().map(|b| b.live_keys()), Some(4));

        // Removing commands one at a time keeps the binding alive until the last.
        env.delete_command("aes_keysize");
        env.delete_command("aes_done");
        assert_eq!(weak.upgrade().map(|b| b.live_keys()), Some(4));

        drop(env);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let host = TestHost::with_config(HostConfig::with_namespace("tc")).unwrap();
        assert!(host.env().has_command("tc::des_setup"));
        assert!(!host.env().has_command("clef::des_setup"));
        assert!(host.env().record("tc::cipher", "des").is_some());
    }

    #[test]
    fn test_error_codes() {
        let host = TestHost::start().unwrap();
        let err = host.done("aes", "aeskey42").unwrap_err();
        assert_eq!(err.error_code(), vec!["CLEF", "SYMKEY", "UNKNOWN", "aeskey42"]);

        let err = host.encrypt("des", &[0u8; 9], "x").unwrap_err();
        assert_eq!(err.error_code(), vec!["CLEF", "BLOCK", "LONG"]);

        let err = host.keysize("aes", 3).unwrap_err();
        assert_eq!(err.error_code(), vec!["CLEF", "CIPHER", "INVALID_KEYSIZE"]);

        let err = host.keysize("aes", -1).unwrap_err();
        assert_eq!(err.error_code(), vec!["CLEF", "CIPHER", "INVALID_KEYSIZE"]);
    }
}
