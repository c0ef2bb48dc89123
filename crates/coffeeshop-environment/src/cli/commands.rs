use clap::{Subcommand, ValueEnum};

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load and validate the environment
    Check,

    /// Print the environment in the given format
    Render {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Print one value, e.g. `auth0.clientId`
    Get {
        /// Key of the flat form
        key: String,
    },

    /// Print the Auth0 login link
    LoginLink {
        /// Path appended to the callback URL
        #[arg(long, default_value = "")]
        callback_path: String,
    },

    /// Print the Auth0 logout link
    LogoutLink,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Toml,
    Properties,
    Typescript,
}
