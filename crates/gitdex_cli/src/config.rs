//! Configuration file support for gitdex.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. Environment variables (prefixed with `GITDEX_`, e.g., `GITDEX_GITHUB_TOKEN`)
//! 2. Local config file (./gitdex.toml)
//! 3. XDG config file (~/.config/gitdex/config.toml)
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."       # or GITDEX_GITHUB_TOKEN
//! owner = "acme"
//! repo = "widgets"
//! # host = "https://github.example.com/api/v3"   # optional, GHE
//!
//! [graph]
//! token = "eyJ..."        # or GITDEX_GRAPH_TOKEN
//! placeholder_user_id = "00000000-0000-0000-0000-000000000000"
//! # host = "https://graph.microsoft.com/v1.0"    # optional
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use gitdex::Settings;
use gitdex::config::{DEFAULT_GITHUB_HOST, DEFAULT_GRAPH_HOST};
use serde::Deserialize;

/// Top-level configuration as it appears on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    github: GitHubSection,
    graph: GraphSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GitHubSection {
    token: Option<String>,
    owner: Option<String>,
    repo: Option<String>,
    host: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GraphSection {
    token: Option<String>,
    placeholder_user_id: Option<String>,
    host: Option<String>,
}

/// Load layered configuration and validate it into core [`Settings`].
pub(crate) fn load() -> Result<Settings, Box<dyn std::error::Error>> {
    let mut builder = ConfigBuilder::builder();

    if let Some(proj_dirs) = ProjectDirs::from("", "", "gitdex") {
        let xdg_config = proj_dirs.config_dir().join("config.toml");
        if xdg_config.exists() {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }
    }

    let local_config = PathBuf::from("gitdex.toml");
    if local_config.exists() {
        tracing::debug!("Loading config from ./gitdex.toml");
        builder = builder.add_source(
            File::from(local_config)
                .format(FileFormat::Toml)
                .required(false),
        );
    }

    // GITDEX_GITHUB__TOKEN -> github.token (config-crate style nesting)
    builder = builder.add_source(
        Environment::with_prefix("GITDEX")
            .separator("__")
            .try_parsing(true),
    );

    let mut file_config: FileConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides(&mut file_config);

    let settings = Settings {
        github_token: file_config.github.token.unwrap_or_default(),
        owner: file_config.github.owner.unwrap_or_default(),
        repo: file_config.github.repo.unwrap_or_default(),
        graph_token: file_config.graph.token.unwrap_or_default(),
        placeholder_user_id: file_config.graph.placeholder_user_id.unwrap_or_default(),
        github_host: file_config
            .github
            .host
            .unwrap_or_else(|| DEFAULT_GITHUB_HOST.to_string()),
        graph_host: file_config
            .graph
            .host
            .unwrap_or_else(|| DEFAULT_GRAPH_HOST.to_string()),
    };
    settings.validate()?;
    Ok(settings)
}

/// Flat, documented environment variables, taking precedence over files.
fn apply_env_overrides(config: &mut FileConfig) {
    let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

    if let Some(token) = env("GITDEX_GITHUB_TOKEN") {
        config.github.token = Some(token);
    }
    if let Some(owner) = env("GITDEX_GITHUB_OWNER") {
        config.github.owner = Some(owner);
    }
    if let Some(repo) = env("GITDEX_GITHUB_REPO") {
        config.github.repo = Some(repo);
    }
    if let Some(host) = env("GITDEX_GITHUB_HOST") {
        config.github.host = Some(host);
    }
    if let Some(token) = env("GITDEX_GRAPH_TOKEN") {
        config.graph.token = Some(token);
    }
    if let Some(user_id) = env("GITDEX_GRAPH_PLACEHOLDER_USER_ID") {
        config.graph.placeholder_user_id = Some(user_id);
    }
    if let Some(host) = env("GITDEX_GRAPH_HOST") {
        config.graph.host = Some(host);
    }
}
