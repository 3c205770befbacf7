use crate::error::{Error, Result};
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// Reads one asset name per line, in file order. Blank lines are kept.
pub async fn load_assets(path: &Path) -> Result<Vec<String>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::AssetsFileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(parse_assets(&content))
}

pub fn parse_assets(content: &str) -> Vec<String> {
    content.lines().map(str::to_string).collect()
}
