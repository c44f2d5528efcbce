use clap::Parser;
use clap_complete::{generate, Shell};
use elcc_cli::cli::{build_cli_command, Cli, Commands};
use elcc_cli::config::{save_config, ElccConfig};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

mod commands;

fn generate_completions(shell: Shell, out: Option<&Path>) -> anyhow::Result<()> {
    let mut cmd = build_cli_command();
    if let Some(path) = out {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        generate(shell, &mut cmd, "elcc", &mut file);
        println!("Wrote {shell:?} completion to {}", path.display());
    } else {
        let stdout = &mut io::stdout();
        generate(shell, &mut cmd, "elcc", stdout);
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a global tracing subscriber was already installed");
    }

    let result = match &cli.command {
        Some(Commands::Run(args)) => commands::run::handle(args),
        Some(Commands::InitConfig { out }) => {
            save_config(out, &ElccConfig::default()).map(|_| {
                println!("Wrote default config to {}", out.display());
            })
        }
        Some(Commands::Completions { shell, out }) => {
            let result = generate_completions(*shell, out.as_deref());
            if result.is_ok() {
                info!("Completions generated");
            }
            result
        }
        None => {
            info!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Command failed: {:?}", e);
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
