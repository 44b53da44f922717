//! Common test utilities for llvm-setup integration tests

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread;

use tempfile::TempDir;

/// A test workspace for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Create a new test workspace
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) -> PathBuf {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Create a directory in workspace
    pub fn create_dir(&self, path: &str) -> PathBuf {
        let dir = self.path.join(path);
        std::fs::create_dir_all(&dir).expect("Failed to create directory");
        dir
    }

    /// Initialize a managed root by hand, with the given ledger content
    pub fn create_root(&self, path: &str, ledger: &str) -> PathBuf {
        let root = self.create_dir(path);
        for dir in ["archive", "build", "install", "src"] {
            std::fs::create_dir_all(root.join(dir)).expect("Failed to create root directory");
        }
        std::fs::write(root.join(".llvm-setup"), ledger).expect("Failed to write ledger");
        root
    }

    /// Create a git repository with one committed `CMakeLists.txt`
    pub fn create_git_repo(&self, path: &str, content: &str) -> PathBuf {
        let dir = self.create_dir(path);
        let repo = git2::Repository::init(&dir).expect("Failed to init git repository");
        std::fs::write(dir.join("CMakeLists.txt"), content).expect("Failed to write file");
        let mut index = repo.index().expect("Failed to open index");
        index
            .add_path(Path::new("CMakeLists.txt"))
            .expect("Failed to stage file");
        index.write().expect("Failed to write index");
        let tree = repo
            .find_tree(index.write_tree().expect("Failed to write tree"))
            .expect("Failed to find tree");
        let signature =
            git2::Signature::now("Test", "test@example.com").expect("Failed to create signature");
        repo.commit(Some("HEAD"), &signature, &signature, "Initial", &tree, &[])
            .expect("Failed to commit");
        dir
    }

    /// Path to llvm-setup binary
    pub fn llvm_setup_bin() -> PathBuf {
        PathBuf::from(env!("CARGO_BIN_EXE_llvm-setup"))
    }
}

/// Build a release-shaped `.tar.xz`: every entry below `<name>-<version>.src/`
#[allow(dead_code)]
pub fn release_archive(name: &str, version: &str, files: &[(&str, &str)]) -> Vec<u8> {
    let encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
    let mut builder = tar::Builder::new(encoder);
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                format!("{name}-{version}.src/{path}"),
                content.as_bytes(),
            )
            .expect("Failed to append archive entry");
    }
    builder
        .into_inner()
        .expect("Failed to finish tar stream")
        .finish()
        .expect("Failed to finish xz stream")
}

/// Serve `files` (URL path to body) over HTTP on a loopback port
///
/// Unknown paths answer 404. Returns the base URL; the server lives until
/// the test process exits.
#[allow(dead_code)]
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
