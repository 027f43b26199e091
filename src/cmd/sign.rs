use crate::cmd::{load_private_key, load_public_key, read_input, write_output, Cmd};
use clap::{value_parser, Arg, ArgMatches, Command};
use rand::DefaultRand;
use rsa::HashAlg;
use std::path::PathBuf;

const HASH_NAMES: [&str; 6] = ["MD5", "SHA-1", "SHA-224", "SHA-256", "SHA-384", "SHA-512"];

pub struct SignCmd;

impl Cmd for SignCmd {
    const NAME: &'static str = "sign";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("Sign a message with a private key")
            .arg(
                Arg::new("key")
                    .short('k')
                    .long("key")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("private key file path"),
            )
            .arg(
                Arg::new("keyform")
                    .long("keyform")
                    .value_parser(["PEM", "DER"])
                    .default_value("PEM")
                    .help("format of the key file"),
            )
            .arg(
                Arg::new("hash")
                    .long("hash")
                    .value_parser(HASH_NAMES)
                    .default_value("SHA-256")
                    .help("digest algorithm to sign with"),
            )
            .arg(
                Arg::new("input")
                    .short('i')
                    .long("input")
                    .value_parser(value_parser!(PathBuf))
                    .help("message file; stdin when absent"),
            )
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_parser(value_parser!(PathBuf))
                    .help("signature file; stdout when absent"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let key = load_private_key(m)?;
        let alg: HashAlg = m
            .get_one::<String>("hash")
            .expect("the hash argument has a default")
            .parse()?;
        let message = read_input(m.get_one::<PathBuf>("input"))?;

        let mut rng = DefaultRand::default();
        let signature = rsa::sign(&message, &key, alg, &mut rng)?;
        write_output(m.get_one::<PathBuf>("output"), &signature)
    }
}

pub struct VerifyCmd;

impl Cmd for VerifyCmd {
    const NAME: &'static str = "verify";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("Verify a signature against a message with a public key")
            .arg(
                Arg::new("key")
                    .short('k')
                    .long("key")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("public key file path"),
            )
            .arg(
                Arg::new("keyform")
                    .long("keyform")
                    .value_parser(["PEM", "DER"])
                    .default_value("PEM")
                    .help("format of the key file"),
            )
            .arg(
                Arg::new("signature")
                    .short('s')
                    .long("signature")
                    .required(true)
                    .value_parser(value_parser!(PathBuf))
                    .help("signature file path"),
            )
            .arg(
                Arg::new("input")
                    .short('i')
                    .long("input")
                    .value_parser(value_parser!(PathBuf))
                    .help("message file; stdin when absent"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let key = load_public_key(m)?;
        let signature = std::fs::read(
            m.get_one::<PathBuf>("signature")
                .expect("the signature is required"),
        )?;
        let message = read_input(m.get_one::<PathBuf>("input"))?;

        let alg = rsa::verify(&message, &signature, &key)?;
        println!("Verification OK, {alg}");
        Ok(())
    }
}
