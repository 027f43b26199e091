use crate::cmd::{key_format, read_input, write_output, Cmd};
use clap::{value_parser, Arg, ArgMatches, Command};
use rsa::PrivateKey;
use std::path::PathBuf;

pub struct Priv2PubCmd;

impl Cmd for Priv2PubCmd {
    const NAME: &'static str = "priv2pub";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("Derive the public key from a private key")
            .arg(
                Arg::new("input")
                    .short('i')
                    .long("input")
                    .value_parser(value_parser!(PathBuf))
                    .help("private key file; stdin when absent"),
            )
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_parser(value_parser!(PathBuf))
                    .help("public key file; stdout when absent"),
            )
            .arg(
                Arg::new("inform")
                    .long("inform")
                    .value_parser(["PEM", "DER"])
                    .default_value("PEM")
                    .help("format of the private key"),
            )
            .arg(
                Arg::new("outform")
                    .long("outform")
                    .value_parser(["PEM", "DER"])
                    .default_value("PEM")
                    .help("format of the written public key"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let data = read_input(m.get_one::<PathBuf>("input"))?;
        let private = PrivateKey::load_pkcs1(&data, key_format(m, "inform"))?;

        let public = private.public_key().save_pkcs1(key_format(m, "outform"));
        write_output(m.get_one::<PathBuf>("output"), &public)
    }
}
