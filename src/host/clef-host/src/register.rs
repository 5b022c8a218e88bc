//! Cipher registration.

use clef_cipher::{catalog, CipherDescriptor};
use clef_keys::AlgorithmBinding;
use tracing::{debug, info};

use crate::config::HostConfig;
use crate::dispatch::{CipherCommand, Operation};
use crate::env::CommandEnv;
use crate::error::HostError;
use crate::record::CipherRecord;

/// Registers every compiled-in cipher into `env`.
///
/// Stops at the first failure; ciphers registered before it stay registered.
///
/// # Errors
///
/// Returns [`HostError::RegistrationFailed`] if a cipher of the same name is
/// already registered under this configuration.
pub fn init_ciphers(
    env: &mut CommandEnv,
    config: &HostConfig,
) -> Result<Vec<CipherRecord>, HostError> {
    let records = catalog::descriptors()
        .into_iter()
        .map(|descriptor| register_cipher(env, config, descriptor))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        namespace = %config.namespace,
        ciphers = records.len(),
        "Ciphers registered"
    );

    Ok(records)
}

/// Registers one cipher: publishes its record, creates its binding and its
/// five commands.
pub fn register_cipher(
    env: &mut CommandEnv,
    config: &HostConfig,
    descriptor: &'static dyn CipherDescriptor,
) -> Result<CipherRecord, HostError> {
    let info = descriptor.info();
    let array = config.record_array_name();

    if env.record(&array, info.name).is_some() {
        return Err(HostError::RegistrationFailed(info.name.to_string()));
    }

    let record = CipherRecord::new(&info, config);
    env.set_record(&array, info.name, record.to_value());

    let binding = AlgorithmBinding::new(descriptor);
    for operation in Operation::ALL {
        env.create_command(
            record.command(operation),
            CipherCommand::new(operation, binding.register_operation()),
        );
    }

    debug!(cipher = info.name, id = info.id, "Cipher registered");

    Ok(record)
}

/// Deletes the commands and record of cipher `name`.
///
/// The cipher's binding, and every key schedule still registered with it, is
/// released with its last command. Returns false if the cipher was not
/// registered.
pub fn unregister_cipher(env: &mut CommandEnv, config: &HostConfig, name: &str) -> bool {
    if env.unset_record(&config.record_array_name(), name).is_none() {
        return false;
    }

    for operation in Operation::ALL {
        env.delete_command(&config.command_name(name, operation.verb()));
    }

    debug!(cipher = name, "Cipher unregistered");
    true
}
