//! Release archive extraction (`.tar.xz`)
//!
//! Release archives wrap their content in a single `name-version.src/`
//! folder; callers pass `strip = 1` to drop it, like `tar --strip 1`.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use super::Extract;
use crate::error::{self, Result};

/// Extracts xz-compressed tarballs with `tar` + `xz2`
#[derive(Debug, Clone, Copy, Default)]
pub struct TarXzExtractor;

impl Extract for TarXzExtractor {
    fn extract(&self, archive: &Path, dest: &Path, strip: usize) -> Result<()> {
        let fail = |reason: String| error::extract_failed(archive.display().to_string(), reason);

        if !dest.is_dir() {
            return Err(fail(format!(
                "destination {} is not a directory",
                dest.display()
            )));
        }

        let file = File::open(archive).map_err(|e| fail(e.to_string()))?;
        let decoder = xz2::read::XzDecoder::new(BufReader::new(file));
        let count = unpack_stripped(decoder, dest, strip).map_err(|e| fail(e.to_string()))?;

        debug!(
            archive = %archive.display(),
            dest = %dest.display(),
            entries = count,
            "Extraction complete"
        );
        Ok(())
    }
}

/// Drop the first `count` normal components of `path`
///
/// Returns `None` when nothing is left (the wrapper directory itself) or
/// when the path is absolute or climbs out with `..`.
pub fn strip_components(path: &Path, count: usize) -> Option<PathBuf> {
    let mut kept = PathBuf::new();
    let mut skipped = 0;
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(_) if skipped < count => skipped += 1,
            Component::Normal(part) => kept.push(part),
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!kept.as_os_str().is_empty()).then_some(kept)
}

/// Whether a symlink at `location` (relative to the destination) pointing to
/// `link_target` resolves inside the destination
fn symlink_stays_inside(location: &Path, link_target: &Path) -> bool {
    let mut depth = location.components().count().saturating_sub(1);
    for component in link_target.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(_) => depth += 1,
            Component::ParentDir if depth > 0 => depth -= 1,
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Whether any directory between `dest` and `dest/relative` is a symlink
fn crosses_symlink(dest: &Path, relative: &Path) -> bool {
    let mut current = dest.to_path_buf();
    let Some(parent) = relative.parent() else {
        return false;
    };
    parent.components().any(|component| {
        current.push(component);
        fs::symlink_metadata(&current).is_ok_and(|meta| meta.file_type().is_symlink())
    })
}

fn unpack_stripped<R: Read>(reader: R, dest: &Path, strip: usize) -> std::io::Result<usize> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    let mut count = 0;

    for entry in archive.entries()? {
        let mut entry = entry?;
        let raw_path = entry.path()?.into_owned();

        let Some(relative) = strip_components(&raw_path, strip) else {
            if raw_path.components().any(|c| c == Component::ParentDir) || raw_path.is_absolute() {
                warn!(path = %raw_path.display(), "Skipping unsafe archive entry");
            }
            continue;
        };
        if crosses_symlink(dest, &relative) {
            warn!(path = %raw_path.display(), "Skipping archive entry below a symlink");
            continue;
        }
        let target = dest.join(&relative);

        let entry_type = entry.header().entry_type();
        let link = entry.link_name()?.map(|l| l.into_owned());

        if entry_type.is_symlink() {
            let inside = link
                .as_deref()
                .is_some_and(|l| symlink_stays_inside(&relative, l));
            if !inside {
                warn!(path = %raw_path.display(), "Skipping symlink pointing outside archive root");
                continue;
            }
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        // Never write through a link left behind by an earlier entry
        if fs::symlink_metadata(&target).is_ok_and(|meta| meta.file_type().is_symlink()) {
            fs::remove_file(&target)?;
        }

        if entry_type.is_hard_link() {
            // Link targets are archive paths and need the same stripping
            match link.as_deref().and_then(|l| strip_components(l, strip)) {
                Some(source) if !crosses_symlink(dest, &source) => {
                    let _ = fs::remove_file(&target);
                    fs::hard_link(dest.join(source), &target)?;
                }
                _ => {
                    warn!(path = %raw_path.display(), "Skipping hard link outside archive root");
                    continue;
                }
            }
        } else {
            entry.unpack(&target)?;
        }
        count += 1;
    }

    Ok(count)
}
