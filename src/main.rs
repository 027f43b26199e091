use clap::{crate_version, Command};
use log::LevelFilter;

mod cmd;
use cmd::{Cmd, DecryptCmd, EncryptCmd, KeygenCmd, Priv2PubCmd, SignCmd, VerifyCmd};

fn main() {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let app = Command::new("rsakit")
        .version(crate_version!())
        .about("RSA key generation, PKCS#1 v1.5 encryption and signing")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(KeygenCmd::cmd())
        .subcommand(EncryptCmd::cmd())
        .subcommand(DecryptCmd::cmd())
        .subcommand(SignCmd::cmd())
        .subcommand(VerifyCmd::cmd())
        .subcommand(Priv2PubCmd::cmd())
        .get_matches();

    let result = match app.subcommand() {
        Some((KeygenCmd::NAME, m)) => KeygenCmd.run(m),
        Some((EncryptCmd::NAME, m)) => EncryptCmd.run(m),
        Some((DecryptCmd::NAME, m)) => DecryptCmd.run(m),
        Some((SignCmd::NAME, m)) => SignCmd.run(m),
        Some((VerifyCmd::NAME, m)) => VerifyCmd.run(m),
        Some((Priv2PubCmd::NAME, m)) => Priv2PubCmd.run(m),
        _ => unreachable!("subcommand is required"),
    };

    if let Err(e) = result {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
