//! Live checkouts through libgit2
//!
//! Authentication is delegated to git's native credential system:
//! - SSH agent and keys from ~/.ssh/
//! - Git credential helpers
//! - Anonymous access for public mirrors

use std::borrow::Cow;
use std::path::Path;

use git2::{
    Cred, CredentialType, Error, ErrorClass, ErrorCode, FetchOptions, RemoteCallbacks,
    build::RepoBuilder,
};
use tracing::debug;

use super::Checkout;
use crate::error::{self, Result};

/// Clones repositories with libgit2
#[derive(Debug, Clone)]
pub struct GitCheckout {
    /// Fetch only the tip commit of remote repositories
    pub shallow: bool,
}

impl Default for GitCheckout {
    fn default() -> Self {
        Self { shallow: true }
    }
}

impl Checkout for GitCheckout {
    fn checkout(&self, url: &str, dest: &Path) -> Result<()> {
        let mut callbacks = RemoteCallbacks::new();
        setup_auth_callbacks(&mut callbacks);

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        // Shallow clones are not supported for local repositories
        if self.shallow && !is_local_url(url) {
            fetch_options.depth(1);
        }

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options);

        let clone_url = normalize_ssh_url(url);
        debug!(url = %clone_url, dest = %dest.display(), shallow = self.shallow, "git clone");
        builder
            .clone(clone_url.as_ref(), dest)
            .map(|_| ())
            .map_err(|e| error::checkout_failed(url, interpret_git_error(&e)))
    }
}

fn is_local_url(url: &str) -> bool {
    url.starts_with("file://") || Path::new(url).is_absolute()
}

/// Rewrite SCP-style `git@host:path` into `ssh://git@host/path`, which
/// libgit2 parses reliably
fn normalize_ssh_url(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }
    match url.split_once(':') {
        Some((host, path)) => {
            let path = path.strip_prefix('/').unwrap_or(path);
            Cow::Owned(format!("ssh://{host}/{path}"))
        }
        None => Cow::Borrowed(url),
    }
}

/// Turn a libgit2 error into a short, user-facing reason
fn interpret_git_error(err: &Error) -> String {
    let message = err.message().to_lowercase();

    if message.contains("not found") || message.contains("404") {
        "Repository not found".to_string()
    } else if message.contains("authentication") || message.contains("credentials") {
        "Authentication failed".to_string()
    } else if message.contains("exists and is not an empty directory") {
        "Destination is not empty".to_string()
    } else if message.contains("connection")
        || message.contains("timed out")
        || message.contains("network")
    {
        "Network error".to_string()
    } else {
        match err.class() {
            ErrorClass::Http => format!("HTTP error: {}", err.message()),
            ErrorClass::Ssh => format!("SSH error: {}", err.message()),
            _ => err.message().to_string(),
        }
    }
}

fn auth_error(message: &str) -> Error {
    Error::new(ErrorCode::Auth, ErrorClass::Http, message)
}

fn ssh_key_credentials(username: &str) -> std::result::Result<Cred, Error> {
    let ssh_dir = dirs::home_dir().unwrap_or_default().join(".ssh");

    for key_name in ["id_ed25519", "id_rsa", "id_ecdsa"] {
        let private_key = ssh_dir.join(key_name);
        if !private_key.exists() {
            continue;
        }
        let public_key = ssh_dir.join(format!("{key_name}.pub"));
        let public_key = public_key.exists().then_some(public_key.as_path());
        if let Ok(cred) = Cred::ssh_key(username, public_key, &private_key, None) {
            return Ok(cred);
        }
    }

    Err(auth_error("SSH key not found"))
}

fn user_pass_credentials(
    url: &str,
    username_from_url: Option<&str>,
) -> std::result::Result<Cred, Error> {
    if let Ok(config) = git2::Config::open_default() {
        if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
            return Ok(cred);
        }
    }
    // Anonymous access lets the server answer with the real error
    Cred::userpass_plaintext(username_from_url.unwrap_or(""), "")
}

fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks) {
    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            let username = username_from_url.unwrap_or("git");
            return Cred::ssh_key_from_agent(username).or_else(|_| ssh_key_credentials(username));
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            return user_pass_credentials(url, username_from_url);
        }

        Err(auth_error("authentication failed"))
    });
}
