//! Application configuration for ProjectBook.
//!
//! User config lives at `~/.projectbook/projectbook.toml`.
//! CLI flags override environment variables, which override config file
//! values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ProjectBookError, Result};
use crate::types::{Credentials, PageSize};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "projectbook.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".projectbook";

/// Environment variable consulted for the SSO username.
pub const USERNAME_ENV: &str = "PROJECTBOOK_USERNAME";

// ---------------------------------------------------------------------------
// Config structs (matching projectbook.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// SSO gateway settings.
    #[serde(default)]
    pub sso: SsoConfig,

    /// Listing page settings.
    #[serde(default)]
    pub listing: ListingConfig,

    /// Credential sources.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Rendered document settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Markup signatures used to locate data on the listing and detail pages.
    #[serde(default)]
    pub markup: MarkupConfig,
}

/// `[sso]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsoConfig {
    /// Login endpoint. The listing URL is appended as the `service` parameter.
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// If set, the login response body must contain this text to count as success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_marker: Option<String>,
}

impl Default for SsoConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            success_marker: None,
        }
    }
}

fn default_login_url() -> String {
    "https://login.manchester.ac.uk/cas/login".into()
}

/// `[listing]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Listing page URL without the `year` parameter.
    #[serde(default = "default_listing_url")]
    pub url: String,

    /// Academic year whose projects are listed.
    #[serde(default = "default_year")]
    pub year: u16,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            url: default_listing_url(),
            year: default_year(),
        }
    }
}

fn default_listing_url() -> String {
    "https://studentnet.cs.manchester.ac.uk/ugt/year3/project/projectbooktitles.php".into()
}
fn default_year() -> u16 {
    2024
}

/// `[credentials]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// SSO username. May be overridden by `PROJECTBOOK_USERNAME` or `--username`.
    #[serde(default)]
    pub username: String,

    /// Name of the env var holding the password (never store the password itself).
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password_env: default_password_env(),
        }
    }
}

fn default_password_env() -> String {
    "PROJECTBOOK_PASSWORD".into()
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the PDF is written.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Page size of the rendered document.
    #[serde(default)]
    pub page_size: PageSize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            page_size: PageSize::default(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("projects.pdf")
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds. `0` disables the timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum redirects followed per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_max_redirects() -> usize {
    10
}

/// `[markup]` section.
///
/// The listing site exposes no semantic hooks for project containers, so they
/// are matched by their exact inline `style` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupConfig {
    /// Exact `style` attribute of each project container `div`.
    #[serde(default = "default_container_style")]
    pub container_style: String,

    /// Attribute on the container's first `<p>` holding the project id.
    #[serde(default = "default_id_attribute")]
    pub id_attribute: String,

    /// Attribute marking the description element on a detail page.
    #[serde(default = "default_description_attribute")]
    pub description_attribute: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            container_style: default_container_style(),
            id_attribute: default_id_attribute(),
            description_attribute: default_description_attribute(),
        }
    }
}

fn default_container_style() -> String {
    "padding : 15px 15px; background-color : #F0F0F0; margin : 15px 10px 15px 10px; \
     border : 1px dashed #A0A0A0; clear : right;"
        .into()
}
fn default_id_attribute() -> String {
    "data-project-title".into()
}
fn default_description_attribute() -> String {
    "data-project-details-description".into()
}

// ---------------------------------------------------------------------------
// Derived endpoints
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Listing URL for the given year (`<listing.url>?year=<year>`).
    pub fn listing_url_for(&self, year: u16) -> Result<Url> {
        let mut url = Url::parse(&self.listing.url).map_err(|e| {
            ProjectBookError::config(format!("invalid listing.url '{}': {e}", self.listing.url))
        })?;
        url.query_pairs_mut()
            .append_pair("year", &year.to_string());
        Ok(url)
    }

    /// SSO login URL that returns to `service` after authentication.
    pub fn login_url_for(&self, service: &Url) -> Result<Url> {
        let mut url = Url::parse(&self.sso.login_url).map_err(|e| {
            ProjectBookError::config(format!("invalid sso.login_url '{}': {e}", self.sso.login_url))
        })?;
        url.query_pairs_mut()
            .append_pair("service", service.as_str());
        Ok(url)
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Resolve credentials from an explicit username, the environment, and config.
pub fn resolve_credentials(config: &AppConfig, username: Option<&str>) -> Result<Credentials> {
    resolve_credentials_with(config, username, |name| std::env::var(name).ok())
}

/// Same as [`resolve_credentials`] with a caller-supplied env lookup.
pub fn resolve_credentials_with(
    config: &AppConfig,
    username: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials> {
    let username = username
        .map(String::from)
        .or_else(|| lookup(USERNAME_ENV).filter(|v| !v.is_empty()))
        .unwrap_or_else(|| config.credentials.username.clone());

    let var_name = &config.credentials.password_env;
    let password = lookup(var_name).unwrap_or_default();

    let credentials = Credentials::new(username, password);
    validate_credentials(&credentials, var_name)?;
    Ok(credentials)
}

/// Check that both the username and the password are non-empty.
pub fn validate_credentials(credentials: &Credentials, password_env: &str) -> Result<()> {
    if credentials.username.is_empty() {
        return Err(ProjectBookError::config(format!(
            "SSO username not set. Pass --username, set {USERNAME_ENV}, \
             or set credentials.username in the config file"
        )));
    }
    if credentials.password.is_empty() {
        return Err(ProjectBookError::config(format!(
            "SSO password not found. Set the {password_env} environment variable"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.projectbook/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| ProjectBookError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.projectbook/projectbook.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ProjectBookError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        ProjectBookError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| ProjectBookError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| ProjectBookError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ProjectBookError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
