use clap::{Args, Parser, Subcommand};
use grantdeck_domain::Locale;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "grantdeck")]
#[command(about = "Review and edit subject permissions held by a permission authority")]
pub struct GrantdeckCli {
    #[command(flatten)]
    pub global: GlobalArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Options that override the environment configuration.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Authority base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_base_url: Option<Url>,
    /// Anti-forgery token sent with every mutation
    #[arg(long, global = true, value_name = "TOKEN")]
    pub csrf_token: Option<String>,
    /// Interface language (en or tr)
    #[arg(long, global = true)]
    pub locale: Option<Locale>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the permission list of a subject
    Show {
        /// Subject id or `#permissions-<id>` fragment
        subject: String,
        /// Print the display model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Grant one permission immediately
    Grant {
        /// Subject id or `#permissions-<id>` fragment
        subject: String,
        /// Permission name
        permission: String,
    },
    /// Revoke one permission immediately
    Revoke {
        /// Subject id or `#permissions-<id>` fragment
        subject: String,
        /// Permission name
        permission: String,
    },
    /// Stage several edits and save them as one batch
    Apply {
        /// Subject id or `#permissions-<id>` fragment
        subject: String,
        /// Permission to grant; repeatable
        #[arg(long = "grant", value_name = "NAME")]
        grants: Vec<String>,
        /// Permission to revoke; repeatable
        #[arg(long = "revoke", value_name = "NAME")]
        revokes: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use clap::error::ErrorKind;
    use grantdeck_domain::Locale;

    use super::{Command, GrantdeckCli};

    fn parse(args: &[&str]) -> GrantdeckCli {
        match GrantdeckCli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(error) => panic!("{error}"),
        }
    }

    #[test]
    fn cli_requires_subcommand() {
        let err = match GrantdeckCli::try_parse_from(["grantdeck"]) {
            Ok(_) => panic!("expected missing subcommand parse error"),
            Err(err) => err,
        };
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn apply_collects_repeated_grants_and_revokes() {
        let cli = parse(&[
            "grantdeck",
            "apply",
            "#permissions-4",
            "--grant",
            "user_view",
            "--revoke",
            "cost_delete",
            "--grant",
            "tour_view",
        ]);

        let Command::Apply {
            subject,
            grants,
            revokes,
        } = cli.command
        else {
            panic!("expected apply");
        };
        assert_eq!(subject, "#permissions-4");
        assert_eq!(grants, vec!["user_view", "tour_view"]);
        assert_eq!(revokes, vec!["cost_delete"]);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = parse(&[
            "grantdeck",
            "show",
            "7",
            "--json",
            "--locale",
            "tr",
            "--api-base-url",
            "http://authority.test",
        ]);

        assert!(matches!(cli.command, Command::Show { json: true, .. }));
        assert_eq!(cli.global.locale, Some(Locale::Tr));
        assert_eq!(
            cli.global.api_base_url.map(|url| url.to_string()),
            Some("http://authority.test/".to_owned())
        );
    }

    #[test]
    fn unsupported_locale_is_a_value_error() {
        let err = match GrantdeckCli::try_parse_from(["grantdeck", "--locale", "de", "show", "1"])
        {
            Ok(_) => panic!("expected locale parse error"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
