//! Command line [`Args`] of the storefront server.

use clap::Parser;

/// GraphQL API server of the storefront.
#[derive(Debug, Parser)]
#[command(name = "storefront", version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML configuration file.
    ///
    /// A missing file is not an error: `CONF.`-prefixed environment variables
    /// and defaults are used instead.
    #[arg(
        short,
        long,
        env = "STOREFRONT_CONFIG",
        default_value = "config.toml",
        value_name = "PATH"
    )]
    pub config: String,

    /// Applies pending database migrations and exits without serving
    /// requests.
    #[arg(long)]
    pub migrate_only: bool,
}

impl Args {
    /// Reads [`Args`] from the process command line.
    ///
    /// # Errors
    ///
    /// If the command line is malformed, or `--help`/`--version` was
    /// requested.
    pub fn from_env() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;

    use super::Args;

    #[test]
    fn defaults_to_local_config() {
        let args = Args::try_parse_from(["storefront"]).unwrap();

        assert_eq!(args.config, "config.toml");
        assert!(!args.migrate_only);
    }

    #[test]
    fn accepts_flags() {
        let args = Args::try_parse_from([
            "storefront",
            "-c",
            "/etc/storefront.toml",
            "--migrate-only",
        ])
        .unwrap();

        assert_eq!(args.config, "/etc/storefront.toml");
        assert!(args.migrate_only);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Args::try_parse_from(["storefront", "--verbose"]).is_err());
    }
}
