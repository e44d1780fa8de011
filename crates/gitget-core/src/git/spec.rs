//! Repository identity and credential types.

use std::borrow::Cow;
use std::fmt;

use url::Url;

use crate::error::{Error, Result};

/// Host every repository is fetched from unless configured otherwise.
pub const DEFAULT_HOST: &str = "github.com";

/// An account/repository pair on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepoId {
    /// Account (user or organization) owning the repository
    pub account: String,
    /// Repository name, without the `.git` suffix
    pub repository: String,
}

impl RepoId {
    pub fn new(account: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            repository: repository.into(),
        }
    }

    /// Plain clone URL, e.g. `https://github.com/org/repo.git`.
    pub fn https_url(&self, host: &str) -> String {
        format!("https://{}/{}/{}.git", host, self.account, self.repository)
    }

    /// Clone URL with the user (and password, if any) embedded as userinfo.
    pub fn authenticated_url(&self, host: &str, credentials: &Credentials) -> Result<Url> {
        let plain = self.https_url(host);
        let mut url = Url::parse(&plain).map_err(|source| Error::InvalidUrl {
            url: plain.clone(),
            source,
        })?;
        let invalid = || Error::InvalidCredentials {
            user: credentials.user.clone(),
            url: plain.clone(),
        };
        url.set_username(&credentials.user).map_err(|()| invalid())?;
        url.set_password(credentials.password.as_deref())
            .map_err(|()| invalid())?;
        Ok(url)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account, self.repository)
    }
}

/// Account credentials used to authenticate the clone.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Replace the password of an `http(s)` URL argument with `***`.
///
/// Anything that is not such a URL is returned untouched.
pub(crate) fn redact_url(arg: &str) -> Cow<'_, str> {
    if !arg.starts_with("http://") && !arg.starts_with("https://") {
        return Cow::Borrowed(arg);
    }
    match Url::parse(arg) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("***")).is_ok() {
                Cow::Owned(url.to_string())
            } else {
                Cow::Borrowed(arg)
            }
        }
        _ => Cow::Borrowed(arg),
    }
}
