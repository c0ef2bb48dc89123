use crate::cli::OutputFormat;
use crate::environment::Environment;
use crate::error::Result;
use std::path::PathBuf;
use tracing::debug;

/// An explicit file must exist; the default one is optional
pub fn load(config: Option<PathBuf>) -> Result<Environment> {
    match config {
        Some(path) => {
            debug!("Loading environment from {}", path.display());
            Environment::load_from_file(&path)
        }
        None => Environment::load(None),
    }
}

pub fn handle_check(env: &Environment) -> String {
    format!(
        "ok: production={} apiServerUrl={} auth0.domain={} callbackURL={}",
        env.production(),
        env.api_server_url(),
        env.auth0().domain(),
        env.auth0().callback_url()
    )
}

pub fn handle_render(env: &Environment, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => env.to_json(),
        OutputFormat::Toml => env.to_toml(),
        OutputFormat::Properties => Ok(env.render_properties()),
        OutputFormat::Typescript => env.render_typescript(),
    }
}

pub fn handle_get(env: &Environment, key: &str) -> Result<String> {
    env.get(key)
}

pub fn handle_login_link(env: &Environment, callback_path: &str) -> Result<String> {
    Ok(env.auth0().login_link(callback_path)?.to_string())
}

pub fn handle_logout_link(env: &Environment) -> Result<String> {
    Ok(env.auth0().logout_link()?.to_string())
}
