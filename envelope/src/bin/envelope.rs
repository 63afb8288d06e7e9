// Copyright (c) 2024 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use envelope::{config::EnvelopeConfig, Envelope};
use log::info;
use tokio::{fs, io::AsyncWriteExt};

#[derive(Parser)]
#[command(name = "envelope")]
#[command(bin_name = "envelope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path of the configuration file selecting the key service.
    ///
    /// Falls back to env `ENVELOPE_CONFIG_PATH`.
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seal the given file into an envelope, printed to stdout
    Seal(SealArgs),

    /// Open the given envelope
    Open(OpenArgs),
}

#[derive(Args)]
struct SealArgs {
    /// path of the file which contains the content to be sealed
    #[arg(short, long)]
    file_path: String,

    /// print the compact single line form instead of json
    #[arg(long)]
    compact: bool,
}

#[derive(Args)]
struct OpenArgs {
    /// path of the file which contains the envelope, json or compact form
    #[arg(short, long)]
    file_path: String,

    /// path of the output file. Defaults to `<file_path>.opened`
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let config = EnvelopeConfig::new(cli.config)?;
    let encrypter = envelope::new_encrypter(&config.provider, config.provider_settings)
        .await
        .context("create envelope encrypter")?;

    match cli.command {
        Command::Seal(seal_args) => {
            let blob = fs::read(&seal_args.file_path)
                .await
                .context("failed to read the file to seal")?;
            let envelope = encrypter.encrypt(&blob).await.context("seal failed")?;

            let output = if seal_args.compact {
                envelope.to_compact_string()
            } else {
                serde_json::to_string(&envelope).context("serialize envelope failed")?
            };
            println!("{output}");
        }
        Command::Open(open_args) => {
            let content = fs::read_to_string(&open_args.file_path)
                .await
                .context("failed to read envelope")?;
            let content = content.trim();
            let envelope: Envelope = if content.starts_with('{') {
                serde_json::from_str(content)
                    .context("illegal envelope format (json deserialization failed)")?
            } else {
                Envelope::from_compact_string(content)?
            };

            let blob = encrypter.decrypt(&envelope).await.context("open failed")?;

            let output_file_name = PathBuf::from(
                open_args
                    .output
                    .unwrap_or_else(|| format!("{}.opened", open_args.file_path)),
            );
            let mut output_file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&output_file_name)
                .await
                .with_context(|| format!("failed to create output file {output_file_name:?}"))?;
            output_file
                .write_all(&blob)
                .await
                .context("failed to write opened payload")?;

            info!("open success, payload is saved in newly generated file: {output_file_name:?}");
        }
    }

    Ok(())
}
