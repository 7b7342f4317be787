//! Configuration loading helpers.
//!
//! Wraps `ortho_config` so a missing `id` in configuration falls back to the
//! command-line value, then turns merged arguments into client settings.
//!
//! Sub-command values merge with precedence defaults < config file
//! (`[cmds.<name>]`) < environment (`GHQLCMDS_<NAME>_*`) < command line. The
//! file is discovered by `ortho_config` unless `GHQL_CONFIG_PATH` names one
//! explicitly.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::error::{Error as FigmentError, Kind as FigmentKind};
use figment::providers::Env;
use ortho_config::{
    OrthoConfig, OrthoError, load_and_merge_subcommand_for, load_config_file, sanitized_provider,
};
use thiserror::Error;

use crate::api::retry::RetryConfig;
use crate::api::{
    DEFAULT_BODY_LIMIT, DEFAULT_TIMEOUT, Endpoint, GraphQLClient, ReqwestExecutor,
    RetryingExecutor, Token,
};
use crate::auth::resolve_github_token;
use crate::cli_args::NodeArgs;
use crate::environment;
use crate::error::TransportError;

/// Environment variable naming a configuration file to load instead of the
/// discovered ones.
pub const CONFIG_PATH_ENV: &str = "GHQL_CONFIG_PATH";

/// Prefix of per-sub-command environment overrides.
const CMDS_ENV_PREFIX: &str = "GHQLCMDS_";

/// Failures while turning arguments and configuration into a client.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(Box<OrthoError>),
    #[error("invalid endpoint '{url}': {source}")]
    Endpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("no node ID given")]
    MissingId,
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<OrthoError> for ConfigError {
    fn from(err: OrthoError) -> Self {
        Self::Load(Box::new(err))
    }
}

fn missing_id(err: &FigmentError) -> bool {
    // FigmentError yields its causes only by value; clone to inspect without ownership.
    err.clone()
        .into_iter()
        .any(|e| matches!(e.kind, FigmentKind::MissingField(ref f) if f == "id"))
}

/// Merge `cli` over the `[cmds.<name>]` section of the file at `path` and
/// the sub-command's environment overrides.
#[expect(
    clippy::result_large_err,
    reason = "configuration loading errors can be verbose"
)]
fn merge_with_file<T>(cli: &T, path: &Path) -> Result<T, OrthoError>
where
    T: serde::Serialize + serde::de::DeserializeOwned + clap::CommandFactory,
{
    let Some(file) = load_config_file(path)? else {
        return Err(OrthoError::File {
            path: path.to_path_buf(),
            source: Box::new(io::Error::new(
                io::ErrorKind::NotFound,
                "configuration file not found",
            )),
        });
    };
    let command = T::command();
    let name = command.get_name();
    let env_prefix = format!(
        "{CMDS_ENV_PREFIX}{}_",
        name.replace('-', "_").to_ascii_uppercase()
    );
    Figment::new()
        .merge(file.focus(&format!("cmds.{name}")))
        .merge(Env::prefixed(&env_prefix).split("__"))
        .merge(sanitized_provider(cli)?)
        .extract()
        .map_err(OrthoError::merge)
}

/// Load configuration for a set of CLI arguments, falling back when `id` is
/// omitted.
///
/// When `GHQL_CONFIG_PATH` is set, that file replaces file discovery and must
/// exist.
///
/// # Errors
///
/// Returns an [`OrthoError`] if configuration gathering fails for reasons other
/// than a missing `id` field.
#[expect(
    clippy::result_large_err,
    reason = "configuration loading errors can be verbose"
)]
pub fn load_with_id_fallback<T>(cli_args: T) -> Result<T, OrthoError>
where
    T: OrthoConfig + serde::Serialize + Default + clap::CommandFactory + Clone,
{
    let merged = match environment::non_empty_var(CONFIG_PATH_ENV) {
        Some(path) => merge_with_file(&cli_args, &PathBuf::from(path)),
        None => load_and_merge_subcommand_for::<T>(&cli_args),
    };
    match merged {
        Ok(v) => Ok(v),
        Err(OrthoError::Gathering(e)) => {
            if missing_id(&e) {
                Ok(cli_args)
            } else {
                Err(OrthoError::Gathering(e))
            }
        }
        Err(e) => Err(e),
    }
}

/// Resolved settings for building a [`GraphQLClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub token: Token,
    pub endpoint: Endpoint,
    pub body_limit: usize,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl ClientSettings {
    /// Resolve settings from merged arguments and the environment.
    ///
    /// The endpoint comes from the arguments, then `GITHUB_GRAPHQL_URL`, then
    /// the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Endpoint`] if the endpoint is not an absolute
    /// HTTP(S) URL.
    pub fn from_args(args: &NodeArgs) -> Result<Self, ConfigError> {
        let endpoint = match args
            .endpoint
            .clone()
            .filter(|url| !url.is_empty())
            .or_else(|| environment::non_empty_var("GITHUB_GRAPHQL_URL"))
        {
            Some(url) => {
                Endpoint::parse(&url).map_err(|source| ConfigError::Endpoint { url, source })?
            }
            None => Endpoint::default(),
        };
        let defaults = RetryConfig::default();
        Ok(Self {
            token: resolve_github_token(args),
            endpoint,
            body_limit: args.body_limit.unwrap_or(DEFAULT_BODY_LIMIT),
            timeout: args
                .http_timeout
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            retry: RetryConfig {
                retries: args.retries.unwrap_or(defaults.retries),
                ..defaults
            },
        })
    }

    /// Build a client over an authenticated, retrying `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Transport`] if the HTTP client cannot be built.
    pub fn build_client(
        &self,
    ) -> Result<GraphQLClient<RetryingExecutor<ReqwestExecutor>>, ConfigError> {
        let executor = ReqwestExecutor::with_timeout(self.token.clone(), self.timeout)?;
        let executor = RetryingExecutor::new(executor, self.retry);
        Ok(GraphQLClient::with_endpoint(executor, self.endpoint.clone())
            .with_body_limit(self.body_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::{CONFIG_PATH_ENV, ClientSettings, ConfigError, load_with_id_fallback};
    use crate::api::DEFAULT_BODY_LIMIT;
    use crate::cli_args::NodeArgs;
    use crate::environment::{remove_var, set_var, var};
    use rstest::rstest;
    use serial_test::serial;
    use std::time::Duration;

    /// Run `op` with `key` set to `value` (or removed), restoring it after.
    fn with_env<F: FnOnce()>(key: &str, value: Option<&str>, op: F) {
        let old = var(key).ok();
        match value {
            Some(v) => set_var(key, v),
            None => remove_var(key),
        }
        op();
        match old {
            Some(v) => set_var(key, v),
            None => remove_var(key),
        }
    }

    #[test]
    #[serial]
    fn defaults_match_public_api() {
        with_env("GITHUB_GRAPHQL_URL", None, || {
            let settings = ClientSettings::from_args(&NodeArgs::default()).expect("settings");
            assert_eq!(settings.endpoint.as_str(), "https://api.github.com/graphql");
            assert_eq!(settings.body_limit, DEFAULT_BODY_LIMIT);
            assert_eq!(settings.timeout, Duration::from_secs(30));
            assert_eq!(settings.retry.retries, 3);
        });
    }

    #[test]
    #[serial]
    fn explicit_values_override_defaults() {
        with_env("GITHUB_GRAPHQL_URL", Some("http://127.0.0.1:7/graphql"), || {
            let args = NodeArgs {
                endpoint: Some("http://127.0.0.1:9/graphql".into()),
                body_limit: Some(64),
                http_timeout: Some(2),
                retries: Some(0),
                ..NodeArgs::default()
            };
            let settings = ClientSettings::from_args(&args).expect("settings");
            assert_eq!(settings.endpoint.as_str(), "http://127.0.0.1:9/graphql");
            assert_eq!(settings.body_limit, 64);
            assert_eq!(settings.timeout, Duration::from_secs(2));
            assert_eq!(settings.retry.retries, 0);
            let client = settings.build_client().expect("client");
            assert_eq!(client.body_limit(), 64);
        });
    }

    #[rstest]
    #[case::unset(None)]
    #[case::empty(Some(""))]
    #[serial]
    fn missing_endpoint_falls_back_to_environment(#[case] endpoint: Option<&str>) {
        with_env("GITHUB_GRAPHQL_URL", Some("http://127.0.0.1:9/graphql"), || {
            let args = NodeArgs {
                endpoint: endpoint.map(str::to_string),
                ..NodeArgs::default()
            };
            let settings = ClientSettings::from_args(&args).expect("settings");
            assert_eq!(settings.endpoint.as_str(), "http://127.0.0.1:9/graphql");
        });
    }

    #[test]
    #[serial]
    fn invalid_endpoint_is_reported() {
        let args = NodeArgs {
            endpoint: Some("not a url".into()),
            ..NodeArgs::default()
        };
        let err = ClientSettings::from_args(&args).expect_err("invalid endpoint");
        assert!(matches!(err, ConfigError::Endpoint { .. }));
        assert!(err.to_string().starts_with("invalid endpoint 'not a url'"));
    }

    #[test]
    #[serial]
    fn config_path_section_is_loaded() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[cmds.node]\nid = \"R_file\"\nretries = 1\n")
            .expect("write config");
        let path = path.to_str().expect("utf-8 path").to_string();
        with_env(CONFIG_PATH_ENV, Some(&path), || {
            let merged = load_with_id_fallback(NodeArgs::default()).expect("merge");
            assert_eq!(merged.id.as_deref(), Some("R_file"));
            assert_eq!(merged.retries, Some(1));
        });
    }

    #[test]
    #[serial]
    fn missing_config_path_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("absent.toml");
        let path = path.to_str().expect("utf-8 path").to_string();
        with_env(CONFIG_PATH_ENV, Some(&path), || {
            let err = load_with_id_fallback(NodeArgs::default()).expect_err("missing file");
            let err = ConfigError::from(err);
            assert!(err.to_string().starts_with("configuration error:"), "{err}");
            assert!(err.to_string().contains("not found"), "{err}");
        });
    }
}
