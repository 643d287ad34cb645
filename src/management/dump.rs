use std::{io, path::Path};

use serde::Serialize;

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        async_fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    async_fs::write(path, json).await
}
