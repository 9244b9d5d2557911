// beatpack-net/src/fetch.rs
use std::path::Path;
use std::time::Duration;

use beatpack_common::error::{BeatpackError, Result};
use beatpack_common::model::{ArtifactPackage, FetchResult};
use futures::TryStreamExt;
use reqwest::Client;
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tracing::{debug, warn};

use crate::validation::validate_url;

/// Single reusable transfer buffer size; peak memory during a fetch stays
/// flat no matter how large the artifact is.
pub const TRANSFER_BUFFER_BYTES: usize = 80 * 1024;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = "beatpack installer builder (Rust)";

/// Downloads a package into `in_dir`, or reuses what is already there.
///
/// Destination is `in_dir / stem(file_name) / file_name`. With `force` unset
/// and that file present, returns immediately with zero network I/O. A
/// package without a URL fails fast before any request is built. The actual
/// local name follows the URL's final path segment, which may differ from
/// the listed file name.
pub async fn fetch_artifact(
    in_dir: &Path,
    package: &ArtifactPackage,
    force: bool,
) -> Result<FetchResult> {
    let stem = Path::new(&package.file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| package.file_name.clone());
    let dest_dir = in_dir.join(stem);
    let local_path = dest_dir.join(&package.file_name);

    if !force && local_path.is_file() {
        debug!("Artifact already present: {}", local_path.display());
        return Ok(FetchResult {
            was_already_present: true,
            local_path,
        });
    }

    let url = package.url.as_deref().ok_or_else(|| {
        BeatpackError::Config(format!("{} is missing url", package.file_name))
    })?;
    validate_url(url)?;

    let remote_name = url
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(&package.file_name);
    let local_path = dest_dir.join(remote_name);

    fs::create_dir_all(&dest_dir).await?;

    let client = build_download_client()?;
    debug!("Downloading {} -> {}", url, local_path.display());

    let response = client.get(url).send().await.map_err(|e| {
        BeatpackError::Transport(format!("HTTP request failed for {url}: {e}"))
    })?;
    let status = response.status();
    if !status.is_success() {
        return Err(BeatpackError::Download(
            package.file_name.clone(),
            url.to_string(),
            format!("HTTP {status}"),
        ));
    }

    let stream = response.bytes_stream().map_err(std::io::Error::other);
    let mut reader = StreamReader::new(stream);
    let mut file = File::create(&local_path).await?;

    match copy_streaming(&mut reader, &mut file).await {
        Ok(bytes) => {
            debug!("Wrote {} bytes to {}", bytes, local_path.display());
        }
        Err(e) => {
            drop(file);
            // Partial files are deleted so a later non-forced fetch cannot
            // pick up a truncated artifact.
            if let Err(remove_err) = fs::remove_file(&local_path).await {
                warn!(
                    "Could not remove partial download {}: {}",
                    local_path.display(),
                    remove_err
                );
            }
            return Err(BeatpackError::Transport(format!(
                "Download of {url} failed mid-stream: {e}"
            )));
        }
    }

    Ok(FetchResult {
        was_already_present: false,
        local_path,
    })
}

fn build_download_client() -> Result<Client> {
    // Connect timeout only: download duration is intentionally unbounded,
    // large artifacts over slow links are expected.
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .user_agent(USER_AGENT_STRING)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| BeatpackError::Transport(format!("Failed to build HTTP client: {e}")))
}

// One fixed-size buffer for the whole copy, released on every exit path.
async fn copy_streaming<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buffer = vec![0u8; TRANSFER_BUFFER_BYTES];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        writer.write_all(&buffer[..n]).await?;
        total += n as u64;
    }
    writer.flush().await?;
    Ok(total)
}
