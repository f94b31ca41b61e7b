/*
 * Created on Mon Jan 12 2026
 *
 * This file is a part of ddbd
 * ddbd is the secure client-server messaging core of an industrial
 * drawing-database application: connection handshake, wire framing,
 * request dispatch and the typed component catalog.
 *
 * Copyright (c) 2026, the ddbd authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

use super::*;
use std::io::Write;

#[test]
fn parses_minimal_meta_file() {
    let mut file = tempfile_with_contents(
        r#"{
            "keyPath": "/etc/ddbd/keys",
            "databasePasswordPath": "/etc/ddbd/db.pass",
            "serverPort": 2003,
            "backupPath": "/var/backups/ddbd"
        }"#,
    );
    let meta = load_server_meta(file.path()).expect("should parse");
    assert_eq!(meta.server_port, 2003);
    assert!(meta.log_file.is_none());
    file.flush().unwrap();
}

#[test]
fn rejects_missing_file() {
    let err = load_server_meta("/nonexistent/path/serverMeta.json");
    assert!(err.is_err());
    assert!(err.unwrap_err().is_fatal());
}

fn tempfile_with_contents(contents: &str) -> tempfile_shim::NamedTempFile {
    let mut f = tempfile_shim::NamedTempFile::new();
    f.write_all(contents.as_bytes()).unwrap();
    f
}

/// A tiny, dependency-free stand-in for a temp file: config tests only need a
/// path that exists for the duration of the test.
mod tempfile_shim {
    use std::fs::File;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    pub struct NamedTempFile {
        path: PathBuf,
        file: File,
    }

    impl NamedTempFile {
        pub fn new() -> Self {
            let mut path = std::env::temp_dir();
            path.push(format!("ddbd-test-{}.json", std::process::id()));
            let file = File::create(&path).unwrap();
            Self { path, file }
        }
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Write for NamedTempFile {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.file.write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            self.file.flush()
        }
    }

    impl Drop for NamedTempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}
