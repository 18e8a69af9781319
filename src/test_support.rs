//! Helpers for unit tests that run throwaway shell scripts.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

/// `ETXTBSY` on Linux and macOS.
const TEXT_FILE_BUSY: i32 = 26;

/// Write an executable shell script and wait until it can be spawned.
///
/// Another test thread forking while the write handle was open keeps the file
/// busy until that child execs.
pub fn write_script(path: &Path, body: &str) {
    std::fs::write(path, body).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    for _ in 0..50 {
        match Command::new(path).arg("--version").output() {
            Err(e) if e.raw_os_error() == Some(TEXT_FILE_BUSY) => {
                std::thread::sleep(Duration::from_millis(20));
            }
            _ => return,
        }
    }
}
