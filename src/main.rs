use clap::{Arg, ArgMatches, Command}; // Command-line parsing for the serve and provisioning commands

use pilot_portal::auth::password::{generate_random_salt, hash_password};
use pilot_portal::utils::logging::initialize_logging;
use pilot_portal::{gateway, AppConfig, Credential};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    initialize_logging();

    // Define the command-line interface using clap
    let matches = Command::new("pilot-portal")
        .about("Login and session gateway for the pilot portal")
        .subcommand_required(true)
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP gateway")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .help("Bind address (overrides PORTAL_HOST)"),
                )
                .arg(
                    Arg::new("port")
                        .long("port")
                        .value_parser(clap::value_parser!(u16))
                        .help("Bind port (overrides PORTAL_PORT)"),
                ),
        )
        .subcommand(
            Command::new("hash-password")
                .about("Derive a credential entry for offline provisioning")
                .arg(
                    Arg::new("email")
                        .long("email")
                        .required(true)
                        .help("Login email for the new credential"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .required(true)
                        .help("Display name; must match the owner field in the record store"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("serve", sub_matches)) => run_serve(sub_matches).await,
        Some(("hash-password", sub_matches)) => run_hash_password(sub_matches),
        _ => unreachable!("subcommand is required"),
    }
}

/// Load configuration, apply CLI overrides, and run the gateway.
async fn run_serve(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut config = AppConfig::from_env()?;

    if let Some(host) = matches.get_one::<String>("host") {
        config.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        config.port = *port;
    }

    gateway::run(config).await
}

/// Interactive provisioning: prompt for a password and print the credential
/// JSON object ready to splice into the PILOT_CREDENTIALS array.
fn run_hash_password(matches: &ArgMatches) -> anyhow::Result<()> {
    let email = matches
        .get_one::<String>("email")
        .expect("email is a required argument");
    let name = matches
        .get_one::<String>("name")
        .expect("name is a required argument");

    println!("Enter password for {}:", email);
    let password = rpassword::read_password()?;
    println!("Confirm password:");
    let confirmation = rpassword::read_password()?;
    if password != confirmation {
        anyhow::bail!("Passwords do not match");
    }

    let salt = generate_random_salt();
    let credential = Credential {
        email: email.clone(),
        name: name.clone(),
        password_hash: hash_password(&password, &salt),
        salt: hex::encode(&salt),
    };

    println!("{}", serde_json::to_string_pretty(&credential)?);
    Ok(())
}
