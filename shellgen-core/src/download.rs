use crate::backend::{Artifact, Checksum, GenerationResult};
use crate::errors::DownloadError;
use anyhow::{Context, Result};
use log::info;
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub path: PathBuf,
    pub size: u64,
}

fn create_http_client(timeout_secs: u64) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("shellgen/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Download both generated artifacts into `dir` and verify their checksums.
pub fn download_result(
    result: &GenerationResult,
    dir: &Path,
    timeout_secs: u64,
) -> Result<Vec<DownloadedArtifact>> {
    let client = create_http_client(timeout_secs)?;
    [&result.shell, &result.client]
        .into_iter()
        .map(|artifact| download_with(&client, artifact, dir))
        .collect()
}

pub fn download_artifact(
    artifact: &Artifact,
    dir: &Path,
    timeout_secs: u64,
) -> Result<DownloadedArtifact> {
    let client = create_http_client(timeout_secs)?;
    download_with(&client, artifact, dir)
}

fn download_with(client: &Client, artifact: &Artifact, dir: &Path) -> Result<DownloadedArtifact> {
    if !is_sha256(&artifact.checksum.algorithm) {
        return Err(DownloadError::UnsupportedAlgorithm(artifact.checksum.algorithm.clone()).into());
    }
    let filename = file_name_of(&artifact.url)?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create download dir {}", dir.display()))?;
    let target = dir.join(&filename);

    info!("Downloading {} -> {}", artifact.url, target.display());
    let mut response = client
        .get(&artifact.url)
        .send()
        .with_context(|| format!("Failed to fetch {}", artifact.url))?;
    if !response.status().is_success() {
        anyhow::bail!("{} returned {}", artifact.url, response.status());
    }
    let size = write_file(&mut response, &target)?;

    if let Err(err) = verify_checksum(&target, &artifact.checksum) {
        let _ = fs::remove_file(&target);
        return Err(err.into());
    }
    Ok(DownloadedArtifact { path: target, size })
}

/// Stream `source` into `target`; a failed copy leaves no file behind.
fn write_file(source: &mut impl Read, target: &Path) -> Result<u64> {
    let mut dest =
        File::create(target).with_context(|| format!("Failed to create {}", target.display()))?;
    let copied = io::copy(source, &mut dest);
    drop(dest);
    copied.or_else(|err| {
        let _ = fs::remove_file(target);
        Err(err).with_context(|| format!("Failed to write {}", target.display()))
    })
}

/// Check the SHA-256 digest of `path` against `checksum`.
pub fn verify_checksum(path: &Path, checksum: &Checksum) -> Result<(), DownloadError> {
    if !is_sha256(&checksum.algorithm) {
        return Err(DownloadError::UnsupportedAlgorithm(checksum.algorithm.clone()));
    }
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    let computed = format!("{:x}", hasher.finalize());
    if !computed.eq_ignore_ascii_case(checksum.value.trim()) {
        return Err(DownloadError::ChecksumMismatch {
            file: path.display().to_string(),
            computed,
            expected: checksum.value.clone(),
        });
    }
    Ok(())
}

fn is_sha256(algorithm: &str) -> bool {
    algorithm.replace('-', "").eq_ignore_ascii_case("sha256")
}

fn file_name_of(raw: &str) -> Result<String, DownloadError> {
    Url::parse(raw)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DownloadError::MissingFileName(raw.to_string()))
}
