use std::path::Path;

use crate::application::ports::RenderError;

/// Writes `bytes` next to `path` and renames into place, so a reader never
/// sees a partially written output.
pub(crate) async fn write_staged(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RenderError::WriteFailed(format!("{}: {}", parent.display(), e)))?;
    }

    let staging = path.with_extension("partial");
    tokio::fs::write(&staging, bytes)
        .await
        .map_err(|e| RenderError::WriteFailed(format!("{}: {}", staging.display(), e)))?;
    tokio::fs::rename(&staging, path)
        .await
        .map_err(|e| RenderError::WriteFailed(format!("{}: {}", path.display(), e)))
}
