//! Archive extraction helpers
//!
//! Native tar.gz and zip extraction (no external tools needed) with
//! path-traversal and link-escape checks.
//!
//! [`unpack_into`] stages the archive in a temporary directory inside the
//! destination and moves its top-level entries into place afterwards, the
//! marker directory last. The marker therefore only appears once extraction
//! has fully succeeded.

use crate::catalog::ArchiveKind;
use crate::core::output;
use crate::error::{AcquireError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use super::internal::fs_utils;

// ============================================================================
// Native archive extraction
// ============================================================================

fn normalize_lexical(path: &Path) -> PathBuf {
    // Lexical only; never touches the filesystem, so symlinks are not followed.
    let mut out = PathBuf::new();
    let mut has_root = false;

    for c in path.components() {
        match c {
            Component::Prefix(p) => {
                out.clear();
                out.push(p.as_os_str());
                has_root = true;
            }
            Component::RootDir => {
                out.push(Component::RootDir.as_os_str());
                has_root = true;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = out
                    .components()
                    .next_back()
                    .is_some_and(|last| matches!(last, Component::Normal(_)));
                if popped {
                    out.pop();
                } else if !has_root {
                    out.push("..");
                }
            }
            Component::Normal(seg) => out.push(seg),
        }
    }

    out
}

fn ensure_no_symlink_components(archive: &Path, dest: &Path, full_path: &Path) -> Result<()> {
    let rel = full_path.strip_prefix(dest).map_err(|_| {
        AcquireError::extract(
            archive,
            format!("entry outside destination: {}", full_path.display()),
        )
    })?;

    let mut cur = dest.to_path_buf();
    for comp in rel.components() {
        cur.push(comp);
        let is_symlink = std::fs::symlink_metadata(&cur)
            .map(|md| md.file_type().is_symlink())
            .unwrap_or(false);
        if is_symlink {
            return Err(AcquireError::extract(
                archive,
                format!("symlink in path component: {}", cur.display()),
            ));
        }
    }

    Ok(())
}

fn ensure_link_target_within_dest(
    archive: &Path,
    dest: &Path,
    link_parent: &Path,
    link_name: &Path,
) -> Result<()> {
    if link_name.is_absolute()
        || link_name
            .components()
            .any(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
    {
        return Err(AcquireError::extract(
            archive,
            format!("unsafe link target (absolute): {}", link_name.display()),
        ));
    }

    let candidate = normalize_lexical(&link_parent.join(link_name));
    let norm_dest = normalize_lexical(dest);
    if candidate.strip_prefix(&norm_dest).is_err() {
        return Err(AcquireError::extract(
            archive,
            format!(
                "unsafe link target (escapes destination): {} -> {}",
                link_parent.display(),
                link_name.display()
            ),
        ));
    }

    Ok(())
}

/// Extract a tar stream into `dest`, returning the number of entries written.
fn extract_tar<R: Read>(archive_path: &Path, reader: R, dest: &Path) -> Result<usize> {
    let mut archive = tar::Archive::new(reader);
    let mut count = 0;

    let entries = archive
        .entries()
        .map_err(|e| AcquireError::extract(archive_path, format!("tar read error: {}", e)))?;

    for entry in entries {
        let mut entry = entry
            .map_err(|e| AcquireError::extract(archive_path, format!("tar entry error: {}", e)))?;

        let path = entry
            .path()
            .map_err(|e| AcquireError::extract(archive_path, format!("tar path error: {}", e)))?
            .into_owned();

        if !fs_utils::is_safe_path(&path) {
            return Err(AcquireError::extract(
                archive_path,
                format!("unsafe path: {}", path.display()),
            ));
        }

        // Some archives contain a "." entry.
        if path.as_os_str().is_empty() || path == Path::new(".") {
            continue;
        }

        let full_path = dest.join(&path);
        ensure_no_symlink_components(archive_path, dest, &full_path)?;

        let entry_type = entry.header().entry_type();
        let mut hard_link_target = None;
        if entry_type == tar::EntryType::Symlink || entry_type == tar::EntryType::Link {
            let link_name = entry
                .link_name()
                .map_err(|e| {
                    AcquireError::extract(archive_path, format!("tar link_name error: {}", e))
                })?
                .map(|l| l.into_owned())
                .ok_or_else(|| {
                    AcquireError::extract(
                        archive_path,
                        format!("link without target: {}", path.display()),
                    )
                })?;

            // Symlink targets are relative to the link; hard link targets to the archive root.
            if entry_type == tar::EntryType::Link {
                ensure_link_target_within_dest(archive_path, dest, dest, &link_name)?;
                let target = dest.join(&link_name);
                ensure_no_symlink_components(archive_path, dest, &target)?;
                hard_link_target = Some(target);
            } else {
                let link_parent = full_path.parent().unwrap_or(dest);
                ensure_link_target_within_dest(archive_path, dest, link_parent, &link_name)?;
            }
        }

        if let Some(parent) = full_path.parent() {
            if parent.starts_with(dest) {
                ensure_no_symlink_components(archive_path, dest, parent)?;
            }
            fs_utils::ensure_dir(parent)?;
        }

        if let Some(target) = hard_link_target {
            std::fs::hard_link(&target, &full_path).map_err(|e| {
                AcquireError::extract(
                    archive_path,
                    format!(
                        "hard link error for {} -> {}: {}",
                        path.display(),
                        target.display(),
                        e
                    ),
                )
            })?;
            count += 1;
            continue;
        }

        entry.unpack(&full_path).map_err(|e| {
            AcquireError::extract(
                archive_path,
                format!("unpack error for {}: {}", path.display(), e),
            )
        })?;
        count += 1;
    }

    Ok(count)
}

fn open_archive(archive_path: &Path) -> Result<File> {
    File::open(archive_path).map_err(|e| AcquireError::io(archive_path, e))
}

/// Extract a tar.gz archive
fn extract_tar_gz(archive_path: &Path, dest: &Path) -> Result<usize> {
    let reader = BufReader::new(open_archive(archive_path)?);
    let decoder = flate2::read::GzDecoder::new(reader);
    extract_tar(archive_path, decoder, dest)
}

/// Extract a zip archive
fn extract_zip(archive_path: &Path, dest: &Path) -> Result<usize> {
    let file = open_archive(archive_path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AcquireError::extract(archive_path, format!("zip read error: {}", e)))?;
    let mut count = 0;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| AcquireError::extract(archive_path, format!("zip entry error: {}", e)))?;

        let outpath = match file.enclosed_name() {
            Some(path) => dest.join(path),
            None => {
                return Err(AcquireError::extract(
                    archive_path,
                    format!("unsafe path: {}", file.name()),
                ));
            }
        };

        if file.is_dir() {
            fs_utils::ensure_dir(&outpath)?;
            continue;
        }

        fs_utils::ensure_parent_dir(&outpath)?;
        let mut outfile = File::create(&outpath).map_err(|e| AcquireError::io(&outpath, e))?;
        std::io::copy(&mut file, &mut outfile).map_err(|e| AcquireError::io(&outpath, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = file.unix_mode() {
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode)).ok();
            }
        }
        count += 1;
    }

    Ok(count)
}

// ============================================================================
// Public API
// ============================================================================

/// Extract an archive of the given kind directly into `dest`.
///
/// Returns the number of entries written. `ArchiveKind::None` is a no-op.
pub fn extract(kind: ArchiveKind, archive: &Path, dest: &Path) -> Result<usize> {
    fs_utils::ensure_dir(dest)?;

    match kind {
        ArchiveKind::None => Ok(0),
        ArchiveKind::TarGz => extract_tar_gz(archive, dest),
        ArchiveKind::Zip => extract_zip(archive, dest),
    }
}

/// Extract `archive` into `dest`, staged so that `dest/marker` only appears
/// once everything has been unpacked.
///
/// Top-level entries already present in `dest` are left untouched. Fails with
/// [`AcquireError::MissingMarker`] if the archive does not produce `marker`.
pub fn unpack_into(kind: ArchiveKind, archive: &Path, dest: &Path, marker: &str) -> Result<()> {
    let filename = archive
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "archive".to_string());

    fs_utils::ensure_dir(dest)?;
    let staging = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(dest)
        .map_err(|e| AcquireError::io(dest, e))?;

    let pb = output::spinner(&format!("extracting {}", filename));
    let result = extract(kind, archive, staging.path());
    output::progress_done(pb);
    let count = result?;

    let staged_marker = staging.path().join(marker);
    if !staged_marker.exists() {
        return Err(AcquireError::MissingMarker {
            archive: archive.to_path_buf(),
            marker: marker.to_string(),
        });
    }

    let staged = std::fs::read_dir(staging.path()).map_err(|e| AcquireError::io(staging.path(), e))?;
    for entry in staged {
        let entry = entry.map_err(|e| AcquireError::io(staging.path(), e))?;
        let name = entry.file_name();
        if name.as_os_str() == std::ffi::OsStr::new(marker) {
            continue;
        }
        let target = dest.join(&name);
        if !target.exists() {
            fs_utils::move_into_place(&entry.path(), &target)?;
        }
    }
    fs_utils::move_into_place(&staged_marker, &dest.join(marker))?;

    output::detail(&format!(
        "extracted {} ({} entries) to {}",
        filename,
        count,
        dest.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use walkdir::WalkDir;

    fn write_tar_gz(path: &Path, files: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *content).unwrap();
        }
        let encoder = builder.into_inner().unwrap();
        encoder.finish().unwrap();
    }

    fn relative_files(root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_extract_tar_gz_nested() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("nested.tar.gz");
        let extract_dir = temp_dir.path().join("extracted");
        write_tar_gz(&archive_path, &[("foo/bar/baz.txt", b"nested content")]);

        let count = extract(ArchiveKind::TarGz, &archive_path, &extract_dir).unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            std::fs::read_to_string(extract_dir.join("foo/bar/baz.txt")).unwrap(),
            "nested content"
        );
    }

    #[test]
    fn test_extract_zip_nested() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("nested.zip");
        let extract_dir = temp_dir.path().join("extracted");

        let file = File::create(&archive_path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        zip.add_directory("foo/bar/", options).unwrap();
        zip.start_file("foo/bar/baz.txt", options).unwrap();
        zip.write_all(b"nested zip content").unwrap();
        zip.finish().unwrap();

        extract(ArchiveKind::Zip, &archive_path, &extract_dir).unwrap();

        assert_eq!(
            std::fs::read_to_string(extract_dir.join("foo/bar/baz.txt")).unwrap(),
            "nested zip content"
        );
    }

    #[test]
    fn test_extract_none_is_noop() {
        let temp_dir = tempfile::tempdir().unwrap();
        let count = extract(
            ArchiveKind::None,
            &temp_dir.path().join("waves.csv"),
            temp_dir.path(),
        )
        .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_extract_corrupt_archive_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("broken.tar.gz");
        std::fs::write(&archive_path, b"definitely not gzip").unwrap();

        let err = extract(ArchiveKind::TarGz, &archive_path, &temp_dir.path().join("out"))
            .unwrap_err();
        assert!(matches!(err, AcquireError::Extract { .. }));
    }

    #[test]
    fn test_extract_tar_blocks_symlink_escape() {
        let temp_dir = tempfile::tempdir().unwrap();
        let archive_path = temp_dir.path().join("escape.tar.gz");
        let extract_dir = temp_dir.path().join("extracted");

        let file = File::create(&archive_path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);

        let mut link_header = tar::Header::new_gnu();
        link_header.set_entry_type(tar::EntryType::Symlink);
        link_header.set_size(0);
        link_header.set_mode(0o777);
        link_header.set_link_name("/").unwrap();
        link_header.set_cksum();
        builder
            .append_data(&mut link_header, "a", std::io::empty())
            .unwrap();

        let content = b"pwned";
        let mut file_header = tar::Header::new_gnu();
        file_header.set_size(content.len() as u64);
        file_header.set_mode(0o644);
        file_header.set_cksum();
        builder
            .append_data(&mut file_header, "a/evil.txt", &content[..])
            .unwrap();

        let encoder = builder.into_inner().unwrap();
        encoder.finish().unwrap();

        let err = extract(ArchiveKind::TarGz, &archive_path, &extract_dir).unwrap_err();
        let msg = err.to_string();
        assert!(
            msg.contains("unsafe link target") || msg.contains("symlink"),
            "expected link/symlink safety error, got: {msg}"
        );
        assert!(!extract_dir.join("a/evil.txt").exists());
    }

    #[test]
    fn test_unpack_into_is_complete() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("data");
        let archive_path = temp_dir.path().join("nycflights.tar.gz");
        write_tar_gz(
            &archive_path,
            &[
                ("nycflights/1990.csv", b"Year,Month\n1990,1\n"),
                ("nycflights/1991.csv", b"Year,Month\n1991,1\n"),
                ("nycflights/meta/README", b"flights"),
            ],
        );

        unpack_into(ArchiveKind::TarGz, &archive_path, &data_dir, "nycflights").unwrap();

        assert_eq!(
            relative_files(&data_dir),
            vec![
                PathBuf::from("nycflights/1990.csv"),
                PathBuf::from("nycflights/1991.csv"),
                PathBuf::from("nycflights/meta/README"),
            ]
        );
        // Staging directory removed
        let leftovers: Vec<_> = std::fs::read_dir(&data_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".extract-"))
            .collect();
        assert!(leftovers.is_empty());
    }

    fn append_hard_link<W: std::io::Write>(builder: &mut tar::Builder<W>, name: &str, target: &str) {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Link);
        header.set_size(0);
        header.set_mode(0o644);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        builder
            .append_data(&mut header, name, std::io::empty())
            .unwrap();
    }

    #[test]
    fn test_unpack_into_resolves_hard_links_inside_archive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("data");
        let archive_path = temp_dir.path().join("nycflights.tar.gz");

        let file = File::create(&archive_path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        let content = b"Year,Month\n1990,1\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "nycflights/1990.csv", &content[..])
            .unwrap();
        append_hard_link(&mut builder, "nycflights/1991.csv", "nycflights/1990.csv");
        builder.into_inner().unwrap().finish().unwrap();

        unpack_into(ArchiveKind::TarGz, &archive_path, &data_dir, "nycflights").unwrap();

        assert_eq!(
            relative_files(&data_dir),
            vec![
                PathBuf::from("nycflights/1990.csv"),
                PathBuf::from("nycflights/1991.csv"),
            ]
        );
        assert_eq!(
            std::fs::read(data_dir.join("nycflights/1991.csv")).unwrap(),
            content
        );
    }

    #[test]
    fn test_extract_tar_blocks_hardlink_outside_dest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let extract_dir = temp_dir.path().join("extracted");

        for target in ["/etc/passwd", "../outside.txt"] {
            let archive_path = temp_dir.path().join("hardlink.tar.gz");
            let file = File::create(&archive_path).unwrap();
            let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
            let mut builder = tar::Builder::new(encoder);
            append_hard_link(&mut builder, "hl", target);
            builder.into_inner().unwrap().finish().unwrap();

            let err = extract(ArchiveKind::TarGz, &archive_path, &extract_dir).unwrap_err();
            let msg = err.to_string();
            assert!(
                msg.contains("unsafe link target"),
                "expected unsafe link target error for {target}, got: {msg}"
            );
            assert!(!extract_dir.join("hl").exists());
        }
    }

    #[test]
    fn test_unpack_into_moves_sibling_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("data");
        let archive_path = temp_dir.path().join("bundle.tar.gz");
        write_tar_gz(
            &archive_path,
            &[("bundle/a.csv", b"a"), ("NOTICE", b"notice")],
        );

        unpack_into(ArchiveKind::TarGz, &archive_path, &data_dir, "bundle").unwrap();

        assert!(data_dir.join("bundle/a.csv").is_file());
        assert_eq!(
            std::fs::read_to_string(data_dir.join("NOTICE")).unwrap(),
            "notice"
        );
    }

    #[test]
    fn test_unpack_into_missing_marker() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("data");
        let archive_path = temp_dir.path().join("other.tar.gz");
        write_tar_gz(&archive_path, &[("somethingelse/x.csv", b"x")]);

        let err = unpack_into(ArchiveKind::TarGz, &archive_path, &data_dir, "nycflights")
            .unwrap_err();

        assert!(matches!(err, AcquireError::MissingMarker { .. }));
        assert!(!data_dir.join("nycflights").exists());
        assert!(!data_dir.join("somethingelse").exists());
    }

    #[test]
    fn test_unpack_into_failure_leaves_no_marker() {
        let temp_dir = tempfile::tempdir().unwrap();
        let data_dir = temp_dir.path().join("data");
        let archive_path = temp_dir.path().join("nycflights.tar.gz");
        std::fs::write(&archive_path, b"truncated").unwrap();

        let result = unpack_into(ArchiveKind::TarGz, &archive_path, &data_dir, "nycflights");

        assert!(result.is_err());
        assert!(!data_dir.join("nycflights").exists());
    }
}
