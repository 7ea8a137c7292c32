use crate::config;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Ensure the parent directory of a *file path* exists (no-op if none).
pub fn ensure_parent_dir<P: AsRef<Path>>(file_path: P) -> io::Result<()> {
    if let Some(parent) = file_path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Global storage root (absolute), from `config::storage_root()`.
/// If relative in env, resolve against current_dir().
pub fn storage_root() -> PathBuf {
    let p = PathBuf::from(config::storage_root());
    if p.is_absolute() {
        p
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(p)
    }
}

/// Which account table a profile belongs to. Teachers and students have
/// independent id sequences, so their folders must not collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Teacher,
    Student,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Teacher => "teacher",
            AccountKind::Student => "student",
        }
    }
}

/// Path to an account's folder:  {STORAGE_ROOT}/teachers/teacher_{id}
pub fn account_dir(kind: AccountKind, id: i64) -> PathBuf {
    storage_root()
        .join(format!("{}s", kind.as_str()))
        .join(format!("{}_{id}", kind.as_str()))
}

/// A "profile" subfolder for the account:  .../teacher_{id}/profile
pub fn profile_dir(kind: AccountKind, id: i64) -> PathBuf {
    account_dir(kind, id).join("profile")
}

/// Build a path under the account's profile directory (does not create).
/// Example: profile_path(Student, 42, "avatar.png") → .../students/student_42/profile/avatar.png
pub fn profile_path(kind: AccountKind, id: i64, filename: &str) -> PathBuf {
    profile_dir(kind, id).join(filename)
}
