use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ripe-tomatoes")]
#[command(about = "Movie and actor catalog API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database tables
    Create,
    /// Insert the fixture movies, actors and user
    Seed,
    /// Drop the database tables
    Drop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["ripe-tomatoes"]).unwrap();
        assert_eq!(cli.command, None);

        let cli = Cli::try_parse_from(["ripe-tomatoes", "seed"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Seed));

        assert!(Cli::try_parse_from(["ripe-tomatoes", "migrate"]).is_err());
    }
}
