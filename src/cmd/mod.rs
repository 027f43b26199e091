use anyhow::Context;
use clap::{ArgMatches, Command};
use rsa::{KeyFormat, PrivateKey, PublicKey};
use std::io::{Read, Write};
use std::path::PathBuf;

mod crypt;
mod keygen;
mod priv2pub;
mod sign;

pub use crypt::{DecryptCmd, EncryptCmd};
pub use keygen::KeygenCmd;
pub use priv2pub::Priv2PubCmd;
pub use sign::{SignCmd, VerifyCmd};

pub trait Cmd {
    const NAME: &'static str;

    fn cmd() -> Command;

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()>;
}

/// Reads the whole input: a file when a path is given, stdin otherwise.
fn read_input(path: Option<&PathBuf>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut data = Vec::new();
            std::io::stdin()
                .read_to_end(&mut data)
                .context("reading stdin")?;
            Ok(data)
        }
    }
}

/// Writes to a file when a path is given, stdout otherwise.
fn write_output(path: Option<&PathBuf>, data: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))
        }
        None => std::io::stdout().write_all(data).context("writing stdout"),
    }
}

fn key_format(m: &ArgMatches, arg: &str) -> KeyFormat {
    m.get_one::<String>(arg)
        .expect("the format argument has a default")
        .parse()
        .expect("clap restricts the format to PEM or DER")
}

fn load_public_key(m: &ArgMatches) -> anyhow::Result<PublicKey> {
    let path = m.get_one::<PathBuf>("key").expect("the key is required");
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    PublicKey::load_pkcs1(&data, key_format(m, "keyform"))
        .with_context(|| format!("loading the public key from {}", path.display()))
}

fn load_private_key(m: &ArgMatches) -> anyhow::Result<PrivateKey> {
    let path = m.get_one::<PathBuf>("key").expect("the key is required");
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    PrivateKey::load_pkcs1(&data, key_format(m, "keyform"))
        .with_context(|| format!("loading the private key from {}", path.display()))
}
