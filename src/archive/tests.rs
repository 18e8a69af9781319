use super::*;
use std::io::Write;
use zip::write::SimpleFileOptions;

fn write_zip(path: &Path, entries: &[(&str, Option<&[u8]>)]) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for &(name, content) in entries {
        match content {
            Some(bytes) => {
                zip.start_file(name, options).unwrap();
                zip.write_all(bytes).unwrap();
            }
            None => zip.add_directory(name, options).unwrap(),
        }
    }
    zip.finish().unwrap();
}

#[test]
fn test_safe_join_plain_and_nested() {
    let root = Path::new("/scratch/extracted");
    assert_eq!(safe_join(root, "a.jar").unwrap(), root.join("a.jar"));
    assert_eq!(
        safe_join(root, "jars/./lib/b.jar").unwrap(),
        root.join("jars").join("lib").join("b.jar")
    );
    assert_eq!(safe_join(root, "jars/../c.jar").unwrap(), root.join("c.jar"));
}

#[test]
fn test_safe_join_rejects_escapes() {
    let root = Path::new("/scratch/extracted");
    for name in [
        "../evil.jar",
        "jars/../../evil.jar",
        "/etc/evil.jar",
        "..\\..\\evil.jar",
        "./../extracted-sibling/evil.jar",
    ] {
        let err = safe_join(root, name).unwrap_err();
        assert!(
            matches!(err, Error::PathTraversal(ref n) if n == name),
            "{name} should be rejected, got {err}"
        );
    }
}

#[test]
fn test_extract_nested_entries() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("jars.zip");
    write_zip(
        &zip_path,
        &[
            ("jars/", None),
            ("jars/maestro-cli.jar", Some(b"cli")),
            ("jars/deep/maestro-client.jar", Some(b"client")),
            ("README.txt", Some(b"hi")),
        ],
    );

    let dest = dir.path().join("extracted");
    let written = extract(&zip_path, &dest).unwrap();

    assert_eq!(written, 3);
    assert_eq!(std::fs::read(dest.join("jars/maestro-cli.jar")).unwrap(), b"cli");
    assert_eq!(
        std::fs::read(dest.join("jars/deep/maestro-client.jar")).unwrap(),
        b"client"
    );
    assert!(dest.join("README.txt").is_file());
}

#[test]
fn test_extract_rejects_zip_slip() {
    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("jars.zip");
    write_zip(
        &zip_path,
        &[
            ("maestro-cli.jar", Some(b"ok")),
            ("../evil.jar", Some(b"pwned")),
            ("../../evil2.jar", Some(b"pwned")),
        ],
    );

    let scratch = dir.path().join("scratch");
    let dest = scratch.join("extracted");
    let err = extract(&zip_path, &dest).unwrap_err();

    assert!(matches!(err, Error::PathTraversal(_)));
    assert!(!scratch.join("evil.jar").exists());
    assert!(!dir.path().join("evil2.jar").exists());
    assert!(!dir.path().join("evil.jar").exists());
}

#[cfg(unix)]
#[test]
fn test_extract_preserves_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let zip_path = dir.path().join("jars.zip");
    let mut zip = zip::ZipWriter::new(File::create(&zip_path).unwrap());
    zip.start_file(
        "bin/helper",
        SimpleFileOptions::default().unix_permissions(0o755),
    )
    .unwrap();
    zip.write_all(b"#!/bin/sh\n").unwrap();
    zip.finish().unwrap();

    let dest = dir.path().join("extracted");
    extract(&zip_path, &dest).unwrap();

    let mode = std::fs::metadata(dest.join("bin/helper")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
}

#[test]
fn test_extract_not_a_zip() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("jars.zip");
    std::fs::write(&bogus, b"<html>502 Bad Gateway</html>").unwrap();

    let err = extract(&bogus, &dir.path().join("extracted")).unwrap_err();
    assert!(matches!(err, Error::Archive(_)));
}
