//! Release archive downloads over HTTP(S)

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::debug;

use super::Fetch;
use crate::error::{self, Result};

/// Connection setup timeout; transfers themselves are not time-limited
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Downloads with a blocking `reqwest` client
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("llvm-setup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| error::fetch_failed("<client>", e.to_string()))?;
        Ok(Self { client })
    }
}

/// Download target used until the transfer completes
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Stream the body into `partial`, then move it to `dest`
fn write_body(response: &mut Response, partial: &Path, dest: &Path) -> std::io::Result<()> {
    let mut file = File::create(partial)?;
    response.copy_to(&mut file).map_err(std::io::Error::other)?;
    file.flush()?;
    fs::rename(partial, dest)
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(url, dest = %dest.display(), "Downloading");
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| error::fetch_failed(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error::fetch_failed(url, format!("HTTP {status}")));
        }

        let partial = partial_path(dest);
        if let Err(e) = write_body(&mut response, &partial, dest) {
            let _ = fs::remove_file(&partial);
            return Err(error::fetch_failed(url, e.to_string()));
        }

        Ok(())
    }
}
