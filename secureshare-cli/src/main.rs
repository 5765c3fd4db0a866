//! SecureShare CLI - encrypt and decrypt short messages with a shared key.
//!
//! The binary owns the session state (the key the user is holding on to);
//! the codec itself is stateless. Messages and envelopes can be passed as
//! arguments or piped on stdin.

use std::io::{self, IsTerminal, Read};

use anyhow::Context;
use clap::{Parser, Subcommand};
use secureshare_crypto::{
    decrypt_message, encrypt_message_with_params, generate_key, KdfParams, LEGACY_ITERATIONS,
};

/// SecureShare - passphrase-encrypted messages you can paste anywhere
#[derive(Parser)]
#[command(name = "secureshare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh encryption key
    Keygen,

    /// Encrypt a message into a shareable envelope
    Encrypt {
        /// Message text (reads stdin when omitted)
        #[arg(value_name = "MESSAGE")]
        message: Option<String>,

        /// Encryption key
        #[arg(short, long, env = "SECURESHARE_KEY")]
        key: String,

        /// Optional salt, embedded in the envelope
        #[arg(short, long, default_value = "")]
        salt: String,

        /// PBKDF2 iteration count (default keeps envelopes compatible
        /// with existing ones; raise it when that doesn't matter)
        #[arg(long, default_value_t = LEGACY_ITERATIONS)]
        iterations: u32,
    },

    /// Decrypt an envelope back into the message
    Decrypt {
        /// Envelope text (reads stdin when omitted)
        #[arg(value_name = "ENVELOPE")]
        envelope: Option<String>,

        /// Encryption key
        #[arg(short, long, env = "SECURESHARE_KEY")]
        key: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Keygen => {
            println!("{}", generate_key());
            if !cli.quiet {
                eprintln!("Keep this key safe; it is the only way to decrypt your messages.");
            }
        }
        Commands::Encrypt {
            message,
            key,
            salt,
            iterations,
        } => {
            let message = read_input(message, "message")?;
            let params = KdfParams { iterations };
            let envelope = encrypt_message_with_params(&message, &key, &salt, &params)
                .context("could not encrypt message")?;
            println!("{envelope}");
            if !cli.quiet && !salt.is_empty() {
                eprintln!("Salt is embedded in the envelope; only the key is needed to decrypt.");
            }
        }
        Commands::Decrypt { envelope, key } => {
            let envelope = read_input(envelope, "envelope")?;
            let message =
                decrypt_message(envelope.trim(), &key).context("could not decrypt envelope")?;
            println!("{message}");
        }
    }

    Ok(())
}

/// Returns the argument if given, otherwise reads stdin to EOF.
fn read_input(arg: Option<String>, what: &str) -> anyhow::Result<String> {
    match arg {
        Some(value) => Ok(value),
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                anyhow::bail!("no {what} given: pass it as an argument or pipe it on stdin");
            }
            let mut buf = String::new();
            stdin
                .lock()
                .read_to_string(&mut buf)
                .with_context(|| format!("failed to read {what} from stdin"))?;
            Ok(strip_trailing_newline(&buf).to_owned())
        }
    }
}

/// Removes the single trailing newline that `echo` and closing pipes leave,
/// so piping a message through encrypt and back yields the message itself.
/// Interior whitespace and any further trailing newlines are preserved.
fn strip_trailing_newline(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}
