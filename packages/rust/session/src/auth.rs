//! SSO credential exchange.
//!
//! The gateway serves a login form carrying two hidden tokens (`lt` and
//! `execution`) that must be echoed back with the credentials. Logging in is
//! a GET of the form followed by a POST of the filled-in payload.

use std::sync::LazyLock;

use reqwest::StatusCode;
use scraper::{Html, Selector};
use tracing::{info, instrument, trace, warn};
use url::Url;

use projectbook_shared::{Credentials, ProjectBookError, Result};

use crate::client::{Page, Session};

/// Value of the `_eventId` field the gateway expects on submission.
pub const SUBMIT_EVENT: &str = "submit";

static LT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[name="lt"]"#).expect("valid selector"));
static EXECUTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[name="execution"]"#).expect("valid selector"));

// ---------------------------------------------------------------------------
// LoginForm
// ---------------------------------------------------------------------------

/// Hidden tokens scraped from the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub lt: String,
    pub execution: String,
}

impl LoginForm {
    /// Extract both hidden tokens from the login page.
    ///
    /// Fails with [`ProjectBookError::FormFieldMissing`] if either input is absent.
    pub fn parse(html: &str) -> Result<Self> {
        let doc = Html::parse_document(html);
        Ok(Self {
            lt: hidden_value(&doc, &LT_SEL, "lt")?,
            execution: hidden_value(&doc, &EXECUTION_SEL, "execution")?,
        })
    }

    /// The form body to POST back to the gateway.
    pub fn payload(&self, credentials: &Credentials) -> Vec<(&'static str, String)> {
        vec![
            ("username", credentials.username.clone()),
            ("password", credentials.password.clone()),
            ("lt", self.lt.clone()),
            ("execution", self.execution.clone()),
            ("_eventId", SUBMIT_EVENT.to_string()),
        ]
    }
}

fn hidden_value(doc: &Html, selector: &Selector, field: &str) -> Result<String> {
    let input = doc
        .select(selector)
        .next()
        .ok_or_else(|| ProjectBookError::FormFieldMissing {
            field: field.to_string(),
        })?;
    Ok(input.value().attr("value").unwrap_or_default().to_string())
}

// ---------------------------------------------------------------------------
// Login checks
// ---------------------------------------------------------------------------

/// Decides whether the response to the credential POST means "logged in".
pub trait LoginCheck: Send + Sync {
    fn accepts(&self, response: &Page) -> bool;

    /// Human-readable check name for tracing.
    fn name(&self) -> &str;
}

/// Accepts any response with status exactly 200.
///
/// The gateway answers bad credentials with a 200 page too, so this cannot
/// tell them apart. Configure [`MarkerCheck`] when that matters.
pub struct StatusCheck;

impl LoginCheck for StatusCheck {
    fn accepts(&self, response: &Page) -> bool {
        response.status == StatusCode::OK
    }

    fn name(&self) -> &str {
        "status"
    }
}

/// Requires status 200 and a known piece of text in the response body.
pub struct MarkerCheck {
    marker: String,
}

impl MarkerCheck {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl LoginCheck for MarkerCheck {
    fn accepts(&self, response: &Page) -> bool {
        response.status == StatusCode::OK && response.body.contains(&self.marker)
    }

    fn name(&self) -> &str {
        "marker"
    }
}

/// Pick the check for an optional `sso.success_marker`.
pub fn login_check_for(success_marker: Option<&str>) -> Box<dyn LoginCheck> {
    match success_marker {
        Some(marker) if !marker.is_empty() => Box::new(MarkerCheck::new(marker)),
        _ => Box::new(StatusCheck),
    }
}

// ---------------------------------------------------------------------------
// authenticate
// ---------------------------------------------------------------------------

/// Log in through the SSO gateway, leaving the auth cookies in `session`.
#[instrument(skip_all, fields(login_url = %login_url, check = check.name()))]
pub async fn authenticate(
    session: &Session,
    login_url: &Url,
    credentials: &Credentials,
    check: &dyn LoginCheck,
) -> Result<()> {
    let login_page = session.get(login_url).await?;
    trace!(status = %login_page.status, body = %login_page.body, "login page");

    let form = match LoginForm::parse(&login_page.body) {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "required form elements not found");
            return Err(e);
        }
    };

    let response = session
        .post_form(login_url, &form.payload(credentials))
        .await?;

    if !check.accepts(&response) {
        warn!(status = %response.status, "login rejected");
        return Err(ProjectBookError::LoginRejected {
            status: response.status.as_u16(),
        });
    }

    info!(username = %credentials.username, "login successful");
    Ok(())
}
