//! Line-oriented script interpreter over a [`CommandEnv`].
//!
//! One command per line. Tokens are separated by whitespace:
//! - `x:<hex>` is a byte string
//! - a decimal number (optionally negative) is an integer
//! - `$name` is the value of a variable
//! - anything else is text
//!
//! Built-ins: `set name <command...>` stores a command result (or a single
//! literal), `puts <token>` prints a value. Lines starting with `#` are
//! comments. Command names may omit the namespace prefix.

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clef_host::{CommandEnv, HostConfig, Value};
use tracing::debug;

/// Script interpreter state: the command environment plus variables.
pub struct Interpreter {
    env: CommandEnv,
    config: HostConfig,
    vars: HashMap<String, Value>,
}

/// What a line evaluated to.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Blank line or comment.
    Nothing,
    /// A variable was assigned; nothing to print.
    Assigned,
    /// A command or `puts` produced this value.
    Value(Value),
}

impl Interpreter {
    /// Creates an interpreter over an already populated environment.
    pub fn new(env: CommandEnv, config: HostConfig) -> Self {
        Self {
            env,
            config,
            vars: HashMap::new(),
        }
    }

    /// Reads variable `name`.
    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Evaluates one line.
    pub fn eval_line(&mut self, line: &str) -> Result<Outcome> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Outcome::Nothing);
        }

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["set", name, rest @ ..] => {
                let value = match rest {
                    [] => bail!("wrong # args: should be \"set varName command ?arg ...?\""),
                    [single] if self.resolve(single).is_none() => self.token(single)?,
                    [command, args @ ..] => self.call(command, args)?,
                };
                debug!(var = name, "Variable set");
                self.vars.insert((*name).to_string(), value);
                Ok(Outcome::Assigned)
            },
            ["puts", token] => Ok(Outcome::Value(self.token(token)?)),
            ["puts", ..] => bail!("wrong # args: should be \"puts value\""),
            [command, args @ ..] => Ok(Outcome::Value(self.call(command, args)?)),
            [] => Ok(Outcome::Nothing),
        }
    }

    /// Runs a whole script, writing non-empty results to `out`.
    ///
    /// Stops at the first failing line.
    pub fn run(&mut self, source: &str, out: &mut impl Write) -> Result<()> {
        for (index, line) in source.lines().enumerate() {
            let outcome = self
                .eval_line(line)
                .with_context(|| format!("line {}: {}", index + 1, line.trim()))?;
            write_outcome(out, &outcome)?;
        }
        Ok(())
    }

    /// Runs the script stored at `path`.
    pub fn run_file(&mut self, path: &Path, out: &mut impl Write) -> Result<()> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        self.run(&source, out)
            .with_context(|| format!("Script {} failed", path.display()))
    }

    /// Interactive loop: errors are reported on `err` and the loop goes on.
    pub fn shell(
        &mut self,
        input: impl BufRead,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<()> {
        write!(out, "clef> ")?;
        out.flush()?;

        for line in input.lines() {
            let line = line.context("Failed to read input")?;
            if matches!(line.trim(), "exit" | "quit") {
                break;
            }
            match self.eval_line(&line) {
                Ok(outcome) => write_outcome(out, &outcome)?,
                Err(e) => writeln!(err, "error: {e:#}")?,
            }
            write!(out, "clef> ")?;
            out.flush()?;
        }

        writeln!(out)?;
        Ok(())
    }

    fn resolve(&self, command: &str) -> Option<String> {
        if self.env.has_command(command) {
            return Some(command.to_string());
        }
        let qualified = format!("{}::{}", self.config.namespace, command);
        self.env.has_command(&qualified).then_some(qualified)
    }

    fn call(&self, command: &str, args: &[&str]) -> Result<Value> {
        let name = self
            .resolve(command)
            .ok_or_else(|| anyhow!("invalid command name \"{command}\""))?;
        let args = args
            .iter()
            .map(|token| self.token(token))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.env.invoke(&name, &args)?)
    }

    fn token(&self, token: &str) -> Result<Value> {
        if let Some(digits) = token.strip_prefix("x:") {
            let bytes = hex::decode(digits).with_context(|| format!("Invalid hex: {digits}"))?;
            return Ok(Value::Bytes(bytes));
        }
        if let Some(name) = token.strip_prefix('$') {
            return self
                .vars
                .get(name)
                .cloned()
                .ok_or_else(|| anyhow!("can't read \"{name}\": no such variable"));
        }
        if let Ok(n) = token.parse::<i64>() {
            return Ok(Value::Int(n));
        }
        Ok(Value::from(token))
    }
}

fn write_outcome(out: &mut impl Write, outcome: &Outcome) -> Result<()> {
    if let Outcome::Value(value) = outcome {
        if !value.is_empty() {
            writeln!(out, "{value}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use clef_host::init_ciphers;

    use super::*;

    fn interpreter() -> Interpreter {
        let mut env = CommandEnv::new();
        let config = HostConfig::default();
        init_ciphers(&mut env, &config).unwrap();
        Interpreter::new(env, config)
    }

    fn run(script: &str) -> (Result<()>, String) {
        let mut interp = interpreter();
        let mut out = Vec::new();
        let result = interp.run(script, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_tokens() {
        let mut interp = interpreter();
        assert_eq!(
            interp.token("x:00ff").unwrap(),
            Value::Bytes(vec![0x00, 0xff])
        );
        assert_eq!(interp.token("-4").unwrap(), Value::Int(-4));
        assert_eq!(interp.token("aeskey1").unwrap(), Value::from("aeskey1"));
        assert!(interp.token("$missing").is_err());
        assert!(interp.token("x:0").is_err());

        interp.eval_line("set k 5").unwrap();
        assert_eq!(interp.token("$k").unwrap(), Value::Int(5));
    }

    #[cfg(feature = "aes")]
    #[test]
    fn test_aes_roundtrip_script() {
        let (result, out) = run("\
# setup, roundtrip, release
set k aes_setup x:000102030405060708090a0b0c0d0e0f
puts $k
set c clef::aes_ecb_encrypt x:00112233445566778899aabbccddeeff $k
puts $c
aes_ecb_decrypt $c $k
aes_done $k
");
        result.unwrap();
        assert_eq!(
            out,
            "aeskey1\n69c4e0d86a7b0430d8cdb78070b4c55a\n00112233445566778899aabbccddeeff\n"
        );
    }

    #[cfg(feature = "des")]
    #[test]
    fn test_script_stops_at_first_error() {
        let (result, out) = run("\
set k des_setup x:133457799bbcdff1
des_ecb_encrypt x:00000000000000 $k
puts unreachable
");
        let err = result.unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "line 2: des_ecb_encrypt x:00000000000000 $k: \
             bytes are shorter than cipher block length"
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_command() {
        let (result, _) = run("kasumi_setup x:00");
        assert!(format!("{:#}", result.unwrap_err()).contains("invalid command name"));
    }

    #[cfg(feature = "des")]
    #[test]
    fn test_shell_continues_after_errors() {
        let mut interp = interpreter();
        let input = b"des_keysize 3\ndes_keysize 64\nexit\ndes_keysize 8\n";
        let mut out = Vec::new();
        let mut err = Vec::new();
        interp.shell(&input[..], &mut out, &mut err).unwrap();

        let out = String::from_utf8(out).unwrap();
        let err = String::from_utf8(err).unwrap();
        assert_eq!(out, "clef> clef> 8\nclef> \n");
        assert_eq!(err, "error: invalid key size given: 3 bytes\n");
    }

    #[cfg(feature = "blowfish")]
    #[test]
    fn test_run_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "set k blowfish_setup x:0000000000000000").unwrap();
        writeln!(file, "blowfish_ecb_encrypt x:0000000000000000 $k").unwrap();

        let mut interp = interpreter();
        let mut out = Vec::new();
        interp.run_file(file.path(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "4ef997456198dd78\n");
        assert_eq!(interp.var("k"), Some(&Value::from("blowfishkey1")));
    }

    #[test]
    fn test_run_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut interp = interpreter();
        let err = interp
            .run_file(&dir.path().join("absent.clef"), &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed to read script"));
    }
}
