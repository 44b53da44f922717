//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Besides temp directories and git repos this module provides
//! [`RecordingTools`], a [`Toolset`] whose primitives never touch the
//! network. They record every call, write real `.tar.xz` archives on fetch
//! and create the destination directory on checkout, so the resource
//! handler can be exercised end to end.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{RecordingTools, create_temp_dir};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let tools = RecordingTools::new();
//!     let toolset = tools.toolset();
//!     // ... drive a handler with &toolset ...
//!     assert!(tools.calls().is_empty());
//! }
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::env;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::thread;

use tempfile::TempDir;

use crate::acquire::{Checkout, Extract, Fetch, TarXzExtractor, Toolset};
use crate::error::{self, Result};

/// Absolute base for temp directories, even when `TMPDIR` is relative
pub fn temp_dir_base() -> PathBuf {
    let dir = env::temp_dir();
    if dir.is_absolute() {
        dir
    } else {
        PathBuf::from("/tmp")
    }
}

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(temp_dir_base()).expect("Failed to create temp directory")
}

/// Create a git repository holding one committed file.
///
/// Returns the `TempDir` (which cleans up on drop) and the path to the repo.
///
/// # Panics
///
/// Panics if the repository cannot be created or committed to.
#[must_use]
pub fn create_git_repo_with_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp = create_temp_dir();
    let path = temp.path().to_path_buf();
    let repo = git2::Repository::init(&path).expect("Failed to init git repository");

    fs::write(path.join(name), content).expect("Failed to write file");
    let mut index = repo.index().expect("Failed to open index");
    index
        .add_path(Path::new(name))
        .expect("Failed to stage file");
    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let signature =
        git2::Signature::now("Test", "test@example.com").expect("Failed to create signature");
    repo.commit(Some("HEAD"), &signature, &signature, "Initial", &tree, &[])
        .expect("Failed to commit");

    (temp, path)
}

/// Write an xz-compressed tarball with the given (path, content) entries.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_tar_xz(path: &Path, files: &[(&str, &str)]) {
    let file = File::create(path).expect("Failed to create archive");
    let mut builder = tar::Builder::new(xz2::write::XzEncoder::new(file, 6));
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .expect("Failed to append archive entry");
    }
    builder
        .into_inner()
        .expect("Failed to finish tar stream")
        .finish()
        .expect("Failed to finish xz stream");
}

/// A raw tar entry, written without the path checks of `tar::Builder`
#[derive(Debug, Clone, Copy)]
pub enum TarEntry<'a> {
    File(&'a str, &'a str),
    /// Symlink at a path pointing to a target
    Symlink(&'a str, &'a str),
    HardLink(&'a str, &'a str),
}

fn set_raw(field: &mut [u8; 100], value: &str) {
    let bytes = value.as_bytes();
    assert!(bytes.len() < field.len(), "tar name too long: {value}");
    field[..bytes.len()].copy_from_slice(bytes);
}

/// Write an xz-compressed tarball holding `entries` verbatim, including
/// absolute paths, `..` and links that leave the archive.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_tar_entries(path: &Path, entries: &[TarEntry]) {
    let file = File::create(path).expect("Failed to create archive");
    let mut builder = tar::Builder::new(xz2::write::XzEncoder::new(file, 6));
    for entry in entries {
        let mut header = tar::Header::new_old();
        header.set_mode(0o644);
        let (name, link, kind, content) = match *entry {
            TarEntry::File(name, content) => (name, None, tar::EntryType::Regular, content),
            TarEntry::Symlink(name, target) => (name, Some(target), tar::EntryType::Symlink, ""),
            TarEntry::HardLink(name, target) => (name, Some(target), tar::EntryType::Link, ""),
        };
        header.set_entry_type(kind);
        header.set_size(content.len() as u64);
        set_raw(&mut header.as_old_mut().name, name);
        if let Some(link) = link {
            set_raw(&mut header.as_old_mut().linkname, link);
        }
        header.set_cksum();
        builder
            .append(&header, content.as_bytes())
            .expect("Failed to append archive entry");
    }
    builder
        .into_inner()
        .expect("Failed to finish tar stream")
        .finish()
        .expect("Failed to finish xz stream");
}

/// Serve `files` (URL path to body) over HTTP on a loopback port.
///
/// Unknown paths answer 404. Returns the base URL; the server lives until
/// the test process exits.
///
/// # Panics
///
/// Panics if no loopback port can be bound.
#[must_use]
pub fn serve_files(files: HashMap<String, Vec<u8>>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let request = String::from_utf8_lossy(&request);
            let path = request.split_whitespace().nth(1).unwrap_or("/");
            let (status, body) = match files.get(path) {
                Some(body) => ("200 OK", body.as_slice()),
                None => ("404 Not Found", &b"not found"[..]),
            };
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
    });

    format!("http://{addr}")
}

/// One primitive invocation seen by [`RecordingTools`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch(String),
    /// Destination directory and strip count
    Extract(PathBuf, usize),
    /// Git checkout of a URL into a directory
    Checkout(String, PathBuf),
    SvnCheckout(String, PathBuf),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
    fail_on: Option<String>,
    corrupt: Option<String>,
}

impl Recorder {
    fn fails(&self, url: &str) -> bool {
        self.fail_on.as_deref().is_some_and(|s| url.contains(s))
    }

    fn corrupts(&self, url: &str) -> bool {
        self.corrupt.as_deref().is_some_and(|s| url.contains(s))
    }
}

/// Handle on the shared call log of a fake [`Toolset`]
#[derive(Clone, Default)]
pub struct RecordingTools {
    recorder: Rc<RefCell<Recorder>>,
}

impl RecordingTools {
    pub fn new() -> Self {
        Self::default()
    }

    /// A toolset whose primitives all report to this handle
    pub fn toolset(&self) -> Toolset {
        Toolset {
            fetcher: Box::new(FakeFetch(self.clone())),
            extractor: Box::new(FakeExtract(self.clone())),
            git: Box::new(FakeCheckout {
                tools: self.clone(),
                svn: false,
            }),
            svn: Box::new(FakeCheckout {
                tools: self.clone(),
                svn: true,
            }),
        }
    }

    /// Fail every fetch or checkout whose URL contains `pattern`
    pub fn fail_on(&self, pattern: &str) {
        self.recorder.borrow_mut().fail_on = Some(pattern.to_string());
    }

    /// Serve unreadable archives for URLs containing `pattern`
    pub fn corrupt_archives_for(&self, pattern: &str) {
        self.recorder.borrow_mut().corrupt = Some(pattern.to_string());
    }

    pub fn repair_archives(&self) {
        self.recorder.borrow_mut().corrupt = None;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.recorder.borrow().calls.clone()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Fetch(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.recorder.borrow_mut().calls.clear();
    }

    fn record(&self, call: Call) {
        self.recorder.borrow_mut().calls.push(call);
    }
}

struct FakeFetch(RecordingTools);

impl Fetch for FakeFetch {
    /// Writes a release-shaped archive: `<stem>/CMakeLists.txt` holding the stem
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        self.0.record(Call::Fetch(url.to_string()));
        let recorder = self.0.recorder.borrow();
        if recorder.fails(url) {
            return Err(error::fetch_failed(url, "HTTP 404 Not Found"));
        }
        if recorder.corrupts(url) {
            fs::write(dest, b"truncated download")?;
            return Ok(());
        }

        let file_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name.strip_suffix(".tar.xz").unwrap_or(&file_name);
        write_tar_xz(dest, &[(&format!("{stem}/CMakeLists.txt"), stem)]);
        Ok(())
    }
}

struct FakeExtract(RecordingTools);

impl Extract for FakeExtract {
    fn extract(&self, archive: &Path, dest: &Path, strip: usize) -> Result<()> {
        self.0.record(Call::Extract(dest.to_path_buf(), strip));
        TarXzExtractor.extract(archive, dest, strip)
    }
}

struct FakeCheckout {
    tools: RecordingTools,
    svn: bool,
}

impl Checkout for FakeCheckout {
    fn checkout(&self, url: &str, dest: &Path) -> Result<()> {
        let call = if self.svn {
            Call::SvnCheckout(url.to_string(), dest.to_path_buf())
        } else {
            Call::Checkout(url.to_string(), dest.to_path_buf())
        };
        self.tools.record(call);
        if self.tools.recorder.borrow().fails(url) {
            return Err(error::checkout_failed(url, "Repository not found"));
        }
        fs::create_dir_all(dest)?;
        fs::write(dest.join(".checkout"), url)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
        assert!(temp.path().is_absolute());
    }

    #[test]
    fn test_create_git_repo_with_file() {
        let (temp, path) = create_git_repo_with_file("README.txt", "hello");
        assert!(path.join(".git").exists());
        assert!(temp.path().join("README.txt").is_file());
        let repo = git2::Repository::open(&path).expect("Failed to open");
        assert!(repo.head().is_ok());
    }

    #[test]
    fn test_fake_fetch_writes_release_archive() {
        let temp = create_temp_dir();
        let tools = RecordingTools::new();
        let toolset = tools.toolset();
        let archive = temp.path().join("cfe-7.0.1.src.tar.xz");
        let out = temp.path().join("out");
        fs::create_dir(&out).expect("Failed to create dir");

        toolset
            .fetcher
            .fetch("https://example.org/cfe-7.0.1.src.tar.xz", &archive)
            .expect("fetch");
        toolset.extractor.extract(&archive, &out, 0).expect("extract");

        assert_eq!(
            fs::read_to_string(out.join("cfe-7.0.1.src/CMakeLists.txt")).expect("read"),
            "cfe-7.0.1.src"
        );
        assert_eq!(tools.calls().len(), 2);
    }
}
