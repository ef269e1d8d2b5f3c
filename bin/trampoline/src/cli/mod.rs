use clap::{value_parser, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod commands;

/// The main Trampoline CLI interface
#[derive(Debug, Parser)]
#[command(author, version, about = "Trampoline", long_about = None)]
pub struct Cli {
    /// The command to execute
    #[clap(subcommand)]
    command: Commands,

    /// The verbosity level
    #[clap(long, short, global = true, default_value_t = 2, value_parser = value_parser!(u8).range(..=4))]
    verbosity: u8,
}

impl Cli {
    /// Get the log level based on the verbosity level
    pub fn get_log_level(&self) -> String {
        match self.verbosity {
            0 => "error",
            1 => "warn",
            2 => "info",
            3 => "debug",
            _ => "trace",
        }
        .into()
    }
}

/// Commands to be executed
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the account identity (owner key) in the data directory
    #[command(name = "create-account")]
    CreateAccount(commands::CreateAccountCommand),

    /// Print the counterfactual address of the account
    #[command(name = "address")]
    Address(commands::AddressCommand),

    /// Build the unsigned user operation of a transaction intent
    #[command(name = "build")]
    Build(Box<commands::BuildCommand>),

    /// Build and sign the user operation of a transaction intent
    #[command(name = "sign")]
    Sign(Box<commands::SignCommand>),

    /// Build, sign and send the user operation of a transaction intent
    #[command(name = "send")]
    Send(Box<commands::SendCommand>),

    /// Compute the prefund of gas values
    #[command(name = "prefund")]
    Prefund(commands::PrefundCommand),
}

pub fn run() -> eyre::Result<()> {
    let cli = Cli::parse();

    let level = cli.get_log_level();
    let rust_log = match std::env::var("RUST_LOG") {
        Ok(val) => format!("{val},trampoline={level},trampoline_account={level}"),
        Err(_) => format!("trampoline={level},trampoline_account={level}"),
    };
    std::env::set_var("RUST_LOG", rust_log);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    rt.block_on(async move {
        match cli.command {
            Commands::CreateAccount(command) => command.execute(),
            Commands::Address(command) => command.execute().await,
            Commands::Build(command) => command.execute().await,
            Commands::Sign(command) => command.execute().await,
            Commands::Send(command) => command.execute().await,
            Commands::Prefund(command) => command.execute(),
        }
    })
}
