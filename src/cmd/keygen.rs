use crate::cmd::{key_format, write_output, Cmd};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use rand::DefaultRand;
use rsa::CancelFlag;
use std::path::PathBuf;

pub struct KeygenCmd;

impl Cmd for KeygenCmd {
    const NAME: &'static str = "keygen";

    fn cmd() -> Command {
        Command::new(Self::NAME)
            .about("Generate a new RSA key pair of the given bit size")
            .arg(
                Arg::new("keysize")
                    .value_name("KEYSIZE")
                    .required(true)
                    .value_parser(value_parser!(usize))
                    .help("size of the modulus in bits, e.g. 2048"),
            )
            .arg(
                Arg::new("pubout")
                    .long("pubout")
                    .value_parser(value_parser!(PathBuf))
                    .help(
                        "output file for the public key; without it the public key is \
                         not saved (it can be derived later with priv2pub)",
                    ),
            )
            .arg(
                Arg::new("privout")
                    .long("privout")
                    .value_parser(value_parser!(PathBuf))
                    .help("output file for the private key; stdout when absent"),
            )
            .arg(
                Arg::new("form")
                    .long("form")
                    .value_parser(["PEM", "DER"])
                    .default_value("PEM")
                    .help("format of the written keys"),
            )
            .arg(
                Arg::new("exponent")
                    .long("exponent")
                    .short('e')
                    .value_parser(value_parser!(u64))
                    .default_value("65537")
                    .help("public exponent; leave alone unless you know what you are doing"),
            )
            .arg(
                Arg::new("fast")
                    .long("fast")
                    .action(ArgAction::SetTrue)
                    .help("allow the modulus to fall one bit short of KEYSIZE"),
            )
    }

    fn run(&self, m: &ArgMatches) -> anyhow::Result<()> {
        let keysize = *m.get_one::<usize>("keysize").expect("keysize is required");
        let exponent = *m.get_one::<u64>("exponent").expect("exponent has a default");
        let form = key_format(m, "form");

        log::info!("generating a {keysize}-bit key");
        let mut rng = DefaultRand::default();
        let (public, private) = rsa::new_keys_with(
            keysize,
            !m.get_flag("fast"),
            exponent,
            &mut rng,
            &CancelFlag::default(),
        )?;

        if let Some(path) = m.get_one::<PathBuf>("pubout") {
            log::info!("writing the public key to {}", path.display());
            write_output(Some(path), &public.save_pkcs1(form))?;
        }

        let privout = m.get_one::<PathBuf>("privout");
        match privout {
            Some(path) => log::info!("writing the private key to {}", path.display()),
            None => log::info!("writing the private key to stdout"),
        }
        write_output(privout, &private.save_pkcs1(form))
    }
}
