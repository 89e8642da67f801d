use anyhow::Context;
use clap::{Parser, Subcommand};
use eml::RenderOptions;
use eml_core::{
    indent_from_env_value, resolve_snapshot_path, CoreConfig, EmlError, EmlService,
    SnapshotStore,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "eml")]
#[command(about = "Produce EML metadata records for published data packages")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce the EML record for a data package
    Produce {
        /// Data package ID
        #[arg(allow_negative_numbers = true)]
        data_package_id: i64,
        /// Dataset title (defaults to the data package UUID)
        #[arg(long)]
        title: Option<String>,
        /// Snapshot file (defaults to ./eml-snapshot.yaml)
        #[arg(long, env = "EML_SNAPSHOT")]
        snapshot: Option<PathBuf>,
        /// Write the record to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
        /// Write the record on a single line
        #[arg(long)]
        compact: bool,
        /// Omit the XML declaration
        #[arg(long)]
        no_declaration: bool,
        /// Spaces per nesting level
        #[arg(long, env = "EML_INDENT")]
        indent: Option<String>,
    },
    /// List the resolved system constants
    Constants {
        /// Snapshot file (defaults to ./eml-snapshot.yaml)
        #[arg(long, env = "EML_SNAPSHOT")]
        snapshot: Option<PathBuf>,
    },
}

fn render_options(
    compact: bool,
    no_declaration: bool,
    indent: Option<String>,
) -> anyhow::Result<RenderOptions> {
    if compact {
        return Ok(RenderOptions {
            declaration: !no_declaration,
            ..RenderOptions::compact()
        });
    }
    Ok(RenderOptions {
        pretty: true,
        indent: indent_from_env_value(indent)?,
        declaration: !no_declaration,
    })
}

/// 2 when the data package cannot yield a record, 1 when the store itself failed.
fn failure_code(err: &EmlError) -> u8 {
    if err.is_client_error() {
        2
    } else {
        1
    }
}

/// Resolves configuration and loads the snapshot it names.
fn build_service(
    snapshot: Option<PathBuf>,
    options: RenderOptions,
) -> anyhow::Result<EmlService> {
    let snapshot_path = resolve_snapshot_path(snapshot)?;
    let cfg = CoreConfig::new(snapshot_path, options)?;
    let store = SnapshotStore::load(cfg.snapshot_path())
        .with_context(|| format!("loading snapshot {}", cfg.snapshot_path().display()))?;

    tracing::debug!(snapshot = %cfg.snapshot_path().display(), "loaded snapshot");
    Ok(EmlService::new(Arc::new(cfg), Arc::new(store)))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    // stdout carries the record; diagnostics go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eml_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Produce {
            data_package_id,
            title,
            snapshot,
            output,
            compact,
            no_declaration,
            indent,
        }) => {
            let options = render_options(compact, no_declaration, indent)?;
            let service = build_service(snapshot, options)?;

            match service
                .produce_eml(Some(data_package_id), title.as_deref())
                .await
            {
                Ok(xml) => match output {
                    Some(path) => {
                        std::fs::write(&path, &xml)
                            .with_context(|| format!("writing {}", path.display()))?;
                        println!("Wrote EML record to {}", path.display());
                    }
                    None => println!("{xml}"),
                },
                Err(e) => {
                    eprintln!("Error producing EML for data package {data_package_id}: {e}");
                    return Ok(ExitCode::from(failure_code(&e)));
                }
            }
        }
        Some(Commands::Constants { snapshot }) => {
            let service = build_service(snapshot, RenderOptions::default())?;
            for (name, value) in service.system_constants().await.entries() {
                println!("{name}: {value}");
            }
        }
        None => {
            println!("Use 'eml --help' for commands");
        }
    }

    Ok(ExitCode::SUCCESS)
}
