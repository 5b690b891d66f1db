//! hidr 命令行入口
//!
//! 用法：
//!   hidr share [SECRET] [-f FILE] [-t TTL] [-l COUNT]
//!   hidr view <TOKEN> [-o FILE]
//!
//! 设计原则：
//! - 参数解析交给 clap
//! - 所有实际逻辑都委托给库（share / view / store）
//! - 日志只写 stderr，stdout 只留给 token 与 secret

use std::io::Write;
use std::path::PathBuf;
use std::process::exit;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use hidr::config::{self, Config};
use hidr::{HttpStore, ShareOptions, ShareToken, fs, input, share_secret, view_secret};

#[derive(Parser)]
#[command(name = "hidr")]
#[command(about = "A CLI tool for securely sharing secrets")]
#[command(version)]
struct Cli {
    /// Storage backend URL
    #[arg(long, global = true, env = "HIDR_BACKEND_URL", default_value = config::DEFAULT_BACKEND_URL)]
    backend_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "HIDR_TIMEOUT", default_value_t = 30, value_name = "SECS")]
    timeout: u64,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Share a secret or a text file
    Share {
        /// Secret text (ignored when --file is given; prompted for when neither is)
        secret: Option<String>,

        /// Path to a text file containing the secret
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// Time-to-live (e.g. 1m, 2h, 1d)
        #[arg(short, long)]
        ttl: Option<String>,

        /// Number of times the secret can be read
        #[arg(short, long, value_name = "COUNT")]
        limit: Option<u32>,
    },
    /// Retrieve a shared secret
    View {
        /// Share token printed by `hidr share`
        secret_id: String,

        /// Save output to a file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "hidr=debug" } else { "hidr=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::new(cli.backend_url, Duration::from_secs(cli.timeout))?;
    let store = HttpStore::new(&config)?;

    match cli.command {
        Command::Share {
            secret,
            file,
            ttl,
            limit,
        } => {
            let options = share_options(ttl.as_deref(), limit)?;
            share(&store, secret, file, options).await
        }
        Command::View { secret_id, output } => view(&store, &secret_id, output).await,
    }
}

/// TTL 与读取次数在读取 secret 之前校验，错误统一走 `Error:` + exit 1
fn share_options(ttl: Option<&str>, limit: Option<u32>) -> Result<ShareOptions> {
    if limit == Some(0) {
        bail!("Invalid limit. The secret must be readable at least once");
    }

    let ttl = ttl.map(hidr::parse_ttl).transpose()?;

    Ok(ShareOptions { reads: limit, ttl })
}

async fn share(
    store: &HttpStore,
    secret: Option<String>,
    file: Option<PathBuf>,
    options: ShareOptions,
) -> Result<()> {
    let content = Zeroizing::new(match (secret, file) {
        (_, Some(path)) => input::read_secret_file(&path)?,
        (Some(text), None) => text.into_bytes(),
        (None, None) => input::prompt_secret()?,
    });

    if content.is_empty() {
        bail!("Provide a secret text or a file.");
    }

    let token = share_secret(store, &content, &options)
        .await
        .context("Failed to store secret")?;

    println!("\nTo view this secret, run:");
    println!("hidr view {token}");

    Ok(())
}

async fn view(store: &HttpStore, secret_id: &str, output: Option<PathBuf>) -> Result<()> {
    let token = ShareToken::decode(secret_id).context("Failed to retrieve secret")?;

    let revealed = view_secret(store, &token)
        .await
        .context("Failed to retrieve secret")?;
    let plaintext = Zeroizing::new(revealed.plaintext);

    match output {
        Some(path) => {
            fs::write_atomic(&path, &plaintext)?;
            println!("Successfully saved secret to: {}", path.display());
        }
        None => print_secret(&plaintext)?,
    }

    if let Some(remaining) = revealed.remaining_reads {
        println!("\nRemaining reads: {remaining}");
    }

    Ok(())
}

/// 文本原样输出一行；非 UTF-8 内容按原始字节写出
fn print_secret(plaintext: &[u8]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();

    match std::str::from_utf8(plaintext) {
        Ok(text) => writeln!(stdout, "{text}")?,
        Err(_) => stdout.write_all(plaintext)?,
    }

    stdout.flush()?;
    Ok(())
}
