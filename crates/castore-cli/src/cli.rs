use std::path::PathBuf;

use castore_crypto::HashKind;
use castore_types::ObjectKey;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "castore",
    about = "Content-addressed storage: store bytes under the hash of their content",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub store: StoreArgs,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Store location and layout. Flags override values from `--config`.
#[derive(Args, Debug, Default)]
pub struct StoreArgs {
    /// TOML store configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Root directory of the store
    #[arg(short = 'd', long, global = true)]
    pub base_path: Option<PathBuf>,
    /// Directory bucketing depth (0 for a flat layout)
    #[arg(long, global = true)]
    pub depth: Option<usize>,
    /// Hash algorithm: sha256 or blake3
    #[arg(long, global = true)]
    pub hash: Option<HashKind>,
    /// Maximum object size in bytes
    #[arg(long, global = true)]
    pub max_size: Option<i64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a file (or stdin) and print its key
    Put(PutArgs),
    /// Write an object's content to stdout or a file
    Get(GetArgs),
    /// Print the size of an object in bytes
    Size(KeyArgs),
    /// Print where an object is (or would be) stored
    Path(KeyArgs),
}

#[derive(Args)]
pub struct PutArgs {
    /// File to store; reads stdin when omitted or `-`
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: ObjectKey,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: ObjectKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "c3ab8ff13720e8ad9047dd39466b3c8974e592c2fa383d4a3960714caef0c4f2";

    #[test]
    fn parse_put_stdin() {
        let cli = Cli::try_parse_from(["castore", "put"]).unwrap();
        if let Command::Put(args) = cli.command {
            assert!(args.path.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_put_file() {
        let cli = Cli::try_parse_from(["castore", "put", "notes.txt"]).unwrap();
        if let Command::Put(args) = cli.command {
            assert_eq!(args.path, Some("notes.txt".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_get_with_output() {
        let cli = Cli::try_parse_from(["castore", "get", KEY, "-o", "out.bin"]).unwrap();
        if let Command::Get(args) = cli.command {
            assert_eq!(args.key, KEY);
            assert_eq!(args.output, Some("out.bin".into()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_size() {
        let cli = Cli::try_parse_from(["castore", "size", KEY]).unwrap();
        assert!(matches!(cli.command, Command::Size(_)));
    }

    #[test]
    fn parse_path() {
        let cli = Cli::try_parse_from(["castore", "path", KEY]).unwrap();
        assert!(matches!(cli.command, Command::Path(_)));
    }

    #[test]
    fn rejects_malformed_key() {
        assert!(Cli::try_parse_from(["castore", "get", "not-a-key"]).is_err());
        assert!(Cli::try_parse_from(["castore", "size", "ABCD"]).is_err());
    }

    #[test]
    fn parse_store_flags() {
        let cli = Cli::try_parse_from([
            "castore", "put", "-d", "/srv/cas", "--depth", "2", "--hash", "blake3",
            "--max-size", "4096", "-v", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.store.base_path, Some("/srv/cas".into()));
        assert_eq!(cli.store.depth, Some(2));
        assert_eq!(cli.store.hash, Some(HashKind::Blake3));
        assert_eq!(cli.store.max_size, Some(4096));
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn rejects_unknown_hash() {
        assert!(Cli::try_parse_from(["castore", "put", "--hash", "md5"]).is_err());
    }

    #[test]
    fn parse_config_flag() {
        let cli = Cli::try_parse_from(["castore", "-c", "store.toml", "size", KEY]).unwrap();
        assert_eq!(cli.store.config, Some("store.toml".into()));
    }
}
