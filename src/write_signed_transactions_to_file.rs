use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::abi::APPEND_STATE_BATCH;
use crate::types::SigningResponse;

/// Write one signing response into `dir` as JSON.
/// - The name comes from `build_filename_for_response`.
/// - If that file already exists, creates a unique variant like "name (1).json".
/// - `pretty = false` → compact JSON (no extra whitespace).
pub fn write_signed_transaction_to_dir<P: AsRef<Path>>(
    dir: P,
    response: &SigningResponse,
    pretty: bool,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).with_context(|| format!("creating directory {}", dir.display()))?;
    }

    let (mut f, final_path) = create_unique_file(&dir.join(build_filename_for_response(response)))?;

    // Serialize once (fail early if needed)
    let json = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };

    f.write_all(json.as_bytes())
        .with_context(|| format!("writing {}", final_path.display()))?;
    f.flush()?;
    Ok(final_path)
}

pub fn build_filename_for_response(response: &SigningResponse) -> String {
    format!("{}_nonce_{}.json", APPEND_STATE_BATCH, response.nonce)
}

/// Create a file with a unique name, avoiding overwrite by appending " (1)", " (2)", etc.
fn create_unique_file(path: &Path) -> io::Result<(File, PathBuf)> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    for i in 0..10_000 {
        let candidate_name = match (i, ext.is_empty()) {
            (0, true) => stem.to_string(),
            (0, false) => format!("{stem}.{ext}"),
            (_, true) => format!("{stem} ({i})"),
            (_, false) => format!("{stem} ({i}).{ext}"),
        };
        let candidate_path = dir.join(&candidate_name);

        match OpenOptions::new().write(true).create_new(true).open(&candidate_path) {
            Ok(f) => return Ok((f, candidate_path)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(io::Error::new(
        ErrorKind::AlreadyExists,
        "failed to create a unique filename after many attempts",
    ))
}
