//! Package builder — bundles the working directory into one tar.gz.

use std::fs;
use std::path::{Path, PathBuf};

use super::PipelineError;

/// Archives every regular file in `working_dir` (rendered report + persisted
/// originals) into `Paquete_<order>.tar.gz` under their base names. The
/// archive's own output path is skipped so it never tries to contain itself.
pub fn pack(order: &str, working_dir: &Path) -> Result<PathBuf, PipelineError> {
    let archive_path = working_dir.join(format!("Paquete_{order}.tar.gz"));
    tracing::info!(order = %order, "Packaging working directory");

    let mut entries: Vec<PathBuf> = fs::read_dir(working_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path != &archive_path)
        .collect();
    entries.sort();

    let file = fs::File::create(&archive_path)?;
    let gz = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut tar = tar::Builder::new(gz);

    for path in &entries {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PipelineError::Package(format!("Unrepresentable file name: {}", path.display()))
            })?;
        tar.append_path_with_name(path, name)?;
    }

    tar.into_inner()?.finish()?;

    Ok(archive_path)
}
