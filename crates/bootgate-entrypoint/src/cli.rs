use clap::Parser;

use bootgate_model::Role;

/// Container entrypoint: waits for the database, prepares the runtime
/// directories and replaces itself with the application process.
#[derive(Debug, Parser)]
#[command(name = "bootgate", version, about)]
pub struct Cli {
    /// Role to dispatch to (web, worker, beat, exec). Overrides `APP_ROLE`;
    /// when neither is set the role is guessed from the command line.
    #[arg(long, value_name = "ROLE")]
    pub role: Option<Role>,

    /// Command to run, e.g. `celery -A config worker`.
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "ARGV"
    )]
    pub argv: Vec<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn argv_after_separator_is_taken_verbatim() {
        let cli = Cli::try_parse_from(["bootgate", "--", "celery", "-A", "config", "worker"]).unwrap();

        assert!(cli.role.is_none());
        assert_eq!(cli.argv, ["celery", "-A", "config", "worker"]);
    }

    #[test]
    fn argv_without_separator_keeps_its_flags() {
        let cli = Cli::try_parse_from(["bootgate", "gunicorn", "--bind", "0.0.0.0:9000"]).unwrap();
        assert_eq!(cli.argv, ["gunicorn", "--bind", "0.0.0.0:9000"]);
    }

    #[test]
    fn explicit_role_is_parsed() {
        let cli = Cli::try_parse_from(["bootgate", "--role", "beat", "--", "celery", "beat"]).unwrap();
        assert_eq!(cli.role, Some(Role::Scheduler));
    }

    #[test]
    fn unknown_role_and_missing_argv_are_rejected() {
        assert!(Cli::try_parse_from(["bootgate", "--role", "cron", "--", "true"]).is_err());
        assert!(Cli::try_parse_from(["bootgate"]).is_err());
    }
}
