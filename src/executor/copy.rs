//! Metadata-preserving file and tree copies

use crate::types::SnagError;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

/// Copy a file using the write-then-rename strategy
///
/// 1. Write to a temporary `<name>.part` file next to `dest`
/// 2. Flush and sync to disk
/// 3. Preserve metadata (permissions, mtime)
/// 4. Rename over `dest`, replacing any existing file
///
/// The `.part` file is removed if any step fails.
///
/// # Returns
/// * `Ok(u64)` - Number of bytes copied
/// * `Err(SnagError)` - IO error, including sharing violations on `src`
///
/// # Example
/// ```no_run
/// use snag::executor::copy_file_atomic;
/// use std::path::Path;
///
/// let bytes = copy_file_atomic(Path::new("source.txt"), Path::new("dest.txt"))?;
/// # Ok::<(), snag::SnagError>(())
/// ```
pub fn copy_file_atomic(src: &Path, dest: &Path) -> Result<u64, SnagError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SnagError::from_io(parent, e))?;
    }

    let mut part_name = dest.file_name().map(OsStr::to_os_string).unwrap_or_default();
    part_name.push(".part");
    let part_path = dest.with_file_name(part_name);

    let result = write_part(src, &part_path).and_then(|bytes| {
        fs::rename(&part_path, dest).map_err(|e| SnagError::from_io(dest, e))?;
        Ok(bytes)
    });

    if result.is_err() {
        let _ = fs::remove_file(&part_path);
    }
    result
}

fn write_part(src: &Path, part_path: &Path) -> Result<u64, SnagError> {
    let mut src_file = File::open(src).map_err(|e| SnagError::from_io(src, e))?;
    let mut part_file = File::create(part_path).map_err(|e| SnagError::from_io(part_path, e))?;

    let mut buffer = vec![0u8; 128 * 1024];
    let mut total_bytes = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .map_err(|e| SnagError::from_io(src, e))?;

        if bytes_read == 0 {
            break; // EOF
        }

        part_file.write_all(&buffer[0..bytes_read])?;
        total_bytes += bytes_read as u64;
    }

    part_file.sync_all()?;

    // Drop the file handle before rename (required on Windows)
    drop(part_file);

    let src_metadata = fs::metadata(src).map_err(|e| SnagError::from_io(src, e))?;
    fs::set_permissions(part_path, src_metadata.permissions())?;

    let mtime = filetime::FileTime::from_last_modification_time(&src_metadata);
    filetime::set_file_mtime(part_path, mtime)?;

    Ok(total_bytes)
}

/// Copy `src` into `dest_dir`, keeping its file name
pub fn copy_into(src: &Path, dest_dir: &Path) -> Result<u64, SnagError> {
    let name = src.file_name().ok_or_else(|| {
        SnagError::Validation(format!("Path has no file name: {}", src.display()))
    })?;
    copy_file_atomic(src, &dest_dir.join(name))
}

/// Recursively copy directory `src` to `dest`, merging into `dest` if it exists
///
/// Symlinks are followed. Entries that are neither files nor directories are
/// skipped. Returns the number of files copied.
pub fn copy_tree(src: &Path, dest: &Path) -> Result<u64, SnagError> {
    if !src.is_dir() {
        return Err(SnagError::Validation(format!(
            "Not a directory: {}",
            src.display()
        )));
    }

    let walker = ignore::WalkBuilder::new(src)
        .standard_filters(false)
        .follow_links(true)
        .build();

    let mut files = 0u64;
    for result in walker {
        let entry = result.map_err(|e| SnagError::Io(io::Error::other(e.to_string())))?;

        let relative = entry.path().strip_prefix(src).map_err(|_| {
            SnagError::Validation(format!(
                "Entry escaped the copied tree: {}",
                entry.path().display()
            ))
        })?;
        let target = dest.join(relative);

        match entry.file_type() {
            Some(ft) if ft.is_dir() => {
                fs::create_dir_all(&target).map_err(|e| SnagError::from_io(&target, e))?;
            }
            Some(ft) if ft.is_file() => {
                copy_file_atomic(entry.path(), &target)?;
                files += 1;
            }
            _ => {
                tracing::debug!("skipping special entry {}", entry.path().display());
            }
        }
    }

    Ok(files)
}
