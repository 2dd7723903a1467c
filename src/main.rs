use clap::{Parser, Subcommand};
use imageupload::upload::{LocalFile, Uploader};
use imageupload::{config, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once; only called at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "imageupload")]
#[command(about = "Store images and generate thumbnails")]
#[command(long_about = "\
Store images and generate thumbnails

Each upload is re-encoded into the configured base path under a derived
filename, and every thumbnail listed under [dimensions] in the config is
generated next to it.

Layout with suffix_thumbnails = true (default):

  public/uploads/images/
  ├── photo.jpg
  ├── photo_small.jpg
  └── photo_square.jpg

Layout with suffix_thumbnails = false:

  public/uploads/images/
  ├── photo.jpg
  ├── small/photo.jpg
  └── square/photo.jpg

Set RUST_LOG=imageupload=debug for step-by-step logs.

Run 'imageupload gen-config' to generate a documented imageupload.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file
    #[arg(long, default_value = "imageupload.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store an image and generate its thumbnails
    Upload {
        /// Image file to store
        file: PathBuf,
        /// Filename as sent by the client (defaults to FILE's name)
        #[arg(long)]
        client_name: Option<String>,
        /// Basename for the `custom` naming strategy
        #[arg(long)]
        name: Option<String>,
        /// Sub path below base_path; its directory portion is used
        #[arg(long)]
        sub_path: Option<String>,
        /// Print the result manifest as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print a stock imageupload.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Upload {
            file,
            client_name,
            name,
            sub_path,
            json,
        } => {
            let upload_config = config::load_config(&cli.config)?;
            let uploader = Uploader::new(upload_config)?;
            let upload = match client_name {
                Some(client_name) => LocalFile::with_client_name(&file, &client_name)?,
                None => LocalFile::open(&file)?,
            };

            let result = uploader.upload(&upload, name.as_deref(), sub_path.as_deref());

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                output::print_upload_output(&result);
            }
            if !result.is_complete() {
                std::process::exit(1);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
