use std::path::{Path, PathBuf};

use glob::glob;

use crate::error::Result;

/// Collect every `.json` file anywhere under `root` as absolute paths in
/// lexicographic order. The order is a documented choice so progress output
/// stays stable between runs. A missing or empty root yields an empty list.
pub fn find_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    let pattern = root.join("**").join("*.json");
    let pattern = pattern.to_string_lossy().into_owned();

    let mut files = Vec::new();
    for entry in glob(&pattern)? {
        let path = entry.map_err(glob::GlobError::into_error)?;
        if path.is_file() {
            files.push(std::path::absolute(&path)?);
        }
    }
    files.sort();
    Ok(files)
}
