//! Test helpers for writing CLI inputs into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use persona_core::CandidateSubmission;
use serde::Serialize;
use tempfile::TempDir;

/// Temporary directory plus its UTF-8 path.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Utf8PathBuf {
        let path = self.path(name);
        let payload = serde_json::to_string_pretty(value).expect("serialise fixture");
        write_utf8(&path, payload.as_bytes());
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture");
}

/// Submission whose applicant lives at `address`.
pub(super) fn submission_at(address: &str) -> CandidateSubmission {
    let mut submission = persona_core::test_support::sample_submission();
    submission.applicant.address = address.to_owned();
    submission
}
