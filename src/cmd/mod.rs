use clap::{Parser, Subcommand};

pub mod seed;

/// Command line interface; without a subcommand the HTTP server starts
#[derive(Debug, Parser)]
#[command(name = "job-tracker", about = "Job application tracking service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending database migrations and exit
    Migrate,

    /// Load jobs from a JSON file into one user's account
    Seed(seed::SeedArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_serve() {
        let cli = Cli::parse_from(["job-tracker"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn migrate_subcommand_parses() {
        let cli = Cli::parse_from(["job-tracker", "migrate"]);
        assert!(matches!(cli.command, Some(Command::Migrate)));
    }

    #[test]
    fn seed_subcommand_takes_email_file_and_fresh() {
        let cli = Cli::parse_from([
            "job-tracker",
            "seed",
            "--email",
            "demo@example.com",
            "--file",
            "jobs.json",
            "--fresh",
        ]);
        match cli.command {
            Some(Command::Seed(args)) => {
                assert_eq!(args.email, "demo@example.com");
                assert_eq!(args.file, "jobs.json");
                assert!(args.fresh);
            }
            other => panic!("expected seed subcommand, got {:?}", other),
        }
    }

    #[test]
    fn seed_file_has_a_default() {
        let cli = Cli::parse_from(["job-tracker", "seed", "--email", "demo@example.com"]);
        match cli.command {
            Some(Command::Seed(args)) => {
                assert_eq!(args.file, "data/mock-jobs.json");
                assert!(!args.fresh);
            }
            other => panic!("expected seed subcommand, got {:?}", other),
        }
    }
}
