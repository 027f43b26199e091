use crate::cmd::{load_private_key, load_public_key, read_input, write_output, Cmd};
use clap::{value_parser, Arg, ArgMatches, Command};
use rand::DefaultRand;
use std::path::PathBuf;

fn io_args(cmd: Command, input_help: &'static str, output_help: &'static str) -> Command {
    cmd.arg(
        Arg::new("key")
            .short('k')
            .long("key")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("key file path"),
    )
    .arg(
        Arg::new("keyform")
            .long("keyform")
            .value_parser(["PEM", "DER"])
            .default_value("PEM")
            .help("format of the key file"),
    )
    .arg(
        Arg::new("input")
            .short('i')
            .long("input")
            .value_parser(value_parser!(PathBuf))
            .help(input_help),
    )
    .arg(
        Arg::new("output")
            .short('o')
            .long("output")
            .value_parser(value_parser!(PathBuf))
            .help(output_help),
    )
}

pub struct EncryptCmd;

impl Cmd for EncryptCmd {
    const NAME: &'static str = "encrypt";

    fn cmd() -> Command {
        io_args(
            Command::new(Self::NAME).about("Encrypt a message with a public key"),
            "message file; stdin when absent (at most k-11 bytes for a k-byte key)",
            "ciphertext file; stdout when absent",
        )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let key = load_public_key(m)?;
        let message = read_input(m.get_one::<PathBuf>("input"))?;

        let mut rng = DefaultRand::default();
        let cipher = rsa::encrypt(&message, &key, &mut rng)?;
        write_output(m.get_one::<PathBuf>("output"), &cipher)
    }
}

pub struct DecryptCmd;

impl Cmd for DecryptCmd {
    const NAME: &'static str = "decrypt";

    fn cmd() -> Command {
        io_args(
            Command::new(Self::NAME).about("Decrypt a ciphertext with a private key"),
            "ciphertext file; stdin when absent",
            "message file; stdout when absent",
        )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let key = load_private_key(m)?;
        let cipher = read_input(m.get_one::<PathBuf>("input"))?;

        let mut rng = DefaultRand::default();
        let message = rsa::decrypt(&cipher, &key, &mut rng)?;
        write_output(m.get_one::<PathBuf>("output"), &message)
    }
}
