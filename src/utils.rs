use std::path::{Path, PathBuf};

/// Every place `cmd` may live, in the order they should be tried. A name
/// containing a slash is used as is, without searching.
pub fn search_candidates(cmd: &str, search_path: &[PathBuf]) -> Vec<PathBuf> {
    if cmd.contains('/') {
        return vec![PathBuf::from(cmd)];
    }
    search_path.iter().map(|dir| dir.join(cmd)).collect()
}

pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}
