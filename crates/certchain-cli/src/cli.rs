use std::net::SocketAddr;
use std::path::PathBuf;

use certchain_server::ServerConfig;
use certchain_types::Grade;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "certchain",
    about = "certchain: issue, seal and verify certificates on a toy blockchain",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the verification server
    Serve(ServeArgs),
    /// Interactive admin console over an in-memory ledger
    Console(ConsoleArgs),
    /// Render a certificate PDF without recording it
    Render(RenderArgs),
}

/// Settings shared by every subcommand. Flags override the config file.
#[derive(Args, Clone, Debug, Default)]
pub struct SettingsArgs {
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Address the HTTP server binds to
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Leading zero hex digits required of a proof
    #[arg(long)]
    pub difficulty: Option<u32>,
    /// Directory rendered certificates are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Verification endpoint encoded in QR codes
    #[arg(long)]
    pub base_url: Option<String>,
}

impl SettingsArgs {
    pub fn resolve(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_toml_file(path)?,
            None => ServerConfig::default(),
        };
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(difficulty) = self.difficulty {
            config.registry.difficulty = difficulty;
        }
        if let Some(dir) = &self.output_dir {
            config.registry.render.output_dir = dir.clone();
        }
        if let Some(url) = &self.base_url {
            config.registry.render.verification_base_url = url.clone();
        }
        Ok(config)
    }
}

#[derive(Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct ConsoleArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
    /// Also serve HTTP on the same ledger, optionally at ADDR
    #[arg(long, value_name = "ADDR")]
    pub serve: Option<Option<SocketAddr>>,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub cert_id: String,
    #[arg(long)]
    pub course: String,
    #[arg(long)]
    pub institution: String,
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub remarks: Option<String>,
    /// One of A+, A, B+, B, C, D
    #[arg(long)]
    pub grade: Option<Grade>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["certchain", "serve", "--bind", "0.0.0.0:8080"]).unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.settings.bind, Some("0.0.0.0:8080".parse().unwrap()));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_serve_rejects_bad_address() {
        assert!(Cli::try_parse_from(["certchain", "serve", "--bind", "nowhere"]).is_err());
    }

    #[test]
    fn parse_console_plain() {
        let cli = Cli::try_parse_from(["certchain", "console"]).unwrap();
        if let Command::Console(args) = cli.command {
            assert_eq!(args.serve, None);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_console_serve_default_address() {
        let cli = Cli::try_parse_from(["certchain", "console", "--serve"]).unwrap();
        if let Command::Console(args) = cli.command {
            assert_eq!(args.serve, Some(None));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_console_serve_address() {
        let cli = Cli::try_parse_from(["certchain", "console", "--serve", "127.0.0.1:9000"]).unwrap();
        if let Command::Console(args) = cli.command {
            assert_eq!(args.serve, Some(Some("127.0.0.1:9000".parse().unwrap())));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_render() {
        let cli = Cli::try_parse_from([
            "certchain", "render", "--name", "Alice", "--cert-id", "c1", "--course", "Rust",
            "--institution", "IFET", "--grade", "b+",
        ])
        .unwrap();
        if let Command::Render(args) = cli.command {
            assert_eq!(args.name, "Alice");
            assert_eq!(args.cert_id, "c1");
            assert_eq!(args.grade, Some(Grade::BPlus));
            assert!(args.date.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_render_requires_fields() {
        assert!(Cli::try_parse_from(["certchain", "render", "--name", "Alice"]).is_err());
    }

    #[test]
    fn parse_render_rejects_unknown_grade() {
        assert!(Cli::try_parse_from([
            "certchain", "render", "--name", "A", "--cert-id", "c", "--course", "R",
            "--institution", "I", "--grade", "Z",
        ])
        .is_err());
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::try_parse_from(["certchain", "--verbose", "console"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn parse_json_format() {
        let cli = Cli::try_parse_from(["certchain", "--format", "json", "console"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn settings_override_defaults() {
        let settings = SettingsArgs {
            difficulty: Some(2),
            output_dir: Some("out".into()),
            base_url: Some("https://example.org/verify".into()),
            ..SettingsArgs::default()
        };
        let config = settings.resolve().unwrap();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.registry.difficulty, 2);
        assert_eq!(config.registry.render.output_dir, PathBuf::from("out"));
        assert_eq!(config.registry.render.verification_base_url, "https://example.org/verify");
    }

    #[test]
    fn settings_flags_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certchain.toml");
        std::fs::write(&path, "bind_addr = \"0.0.0.0:7000\"\n[registry]\ndifficulty = 5\n").unwrap();
        let settings = SettingsArgs {
            config: Some(path),
            difficulty: Some(1),
            ..SettingsArgs::default()
        };
        let config = settings.resolve().unwrap();
        assert_eq!(config.bind_addr.port(), 7000);
        assert_eq!(config.registry.difficulty, 1);
    }
}
