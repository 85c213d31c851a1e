//! Upload path of the extension API
//!
//! Extensions are not written as a JSON body. The `extension.json` payload is
//! zipped as `<name>/extension.json`, and the archive is posted as a multipart
//! form to the collection endpoint. An upload only happens when the extension
//! is not installed yet or the local version is newer than the installed one.

use std::cmp::Ordering;
use std::io::{Cursor, Write};

use log::{debug, info};
use semver::Version;
use serde::Deserialize;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::error::{SyncError, SyncResult};
use super::models::DynatraceEntity;
use super::transport::HttpTransport;

const UPLOAD_FIELD: &str = "file";
const ZIP_MIME: &str = "application/zip";

#[derive(Debug, Deserialize)]
struct ExtensionManifest {
    version: Option<String>,
}

/// Outcome of comparing the local payload to the installed extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionStatus {
    NotInstalled,
    /// Installed version is older than the local one
    Outdated { installed: String },
    UpToDate,
}

impl ExtensionStatus {
    pub fn needs_upload(&self) -> bool {
        !matches!(self, ExtensionStatus::UpToDate)
    }
}

/// Create or update an extension by name
pub async fn upload_extension(
    transport: &HttpTransport,
    collection_url: &str,
    name: &str,
    payload: &str,
) -> SyncResult<DynatraceEntity> {
    let local = manifest_version(name, payload)?;
    let status = installed_status(transport, collection_url, name, &local).await?;

    if !status.needs_upload() {
        info!("Extension '{}' {} is already installed, skipping upload", name, local);
        return Ok(DynatraceEntity::new(name, name));
    }

    debug!("Extension '{}' status: {:?}", name, status);

    let archive = build_archive(name, payload)?;
    let response = transport
        .post_multipart(
            collection_url,
            UPLOAD_FIELD,
            &format!("{}.zip", name),
            ZIP_MIME,
            archive,
        )
        .await?
        .error_for_status()?;

    let id = serde_json::from_slice::<DynatraceEntity>(&response.body)
        .map(|entity| entity.id)
        .unwrap_or_else(|_| name.to_string());

    info!("Uploaded extension '{}' version {}", name, local);
    Ok(DynatraceEntity::new(id, name))
}

/// Read `version` from an `extension.json` payload
pub fn manifest_version(name: &str, payload: &str) -> SyncResult<String> {
    let manifest: ExtensionManifest =
        serde_json::from_str(payload).map_err(|e| SyncError::InvalidExtension {
            name: name.to_string(),
            reason: format!("payload is not valid JSON: {}", e),
        })?;

    manifest
        .version
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SyncError::InvalidExtension {
            name: name.to_string(),
            reason: "payload has no 'version'".to_string(),
        })
}

async fn installed_status(
    transport: &HttpTransport,
    collection_url: &str,
    name: &str,
    local: &str,
) -> SyncResult<ExtensionStatus> {
    let url = format!("{}/{}", collection_url, urlencoding::encode(name));
    let response = transport.get(&url).await?;

    if response.status == 404 {
        return Ok(ExtensionStatus::NotInstalled);
    }
    let response = response.error_for_status()?;

    let installed: ExtensionManifest =
        serde_json::from_slice(&response.body).map_err(|source| SyncError::MalformedResponse {
            url: url.clone(),
            source,
        })?;
    let Some(installed) = installed.version else {
        return Ok(ExtensionStatus::Outdated {
            installed: String::new(),
        });
    };

    match compare_versions(local, &installed) {
        Ordering::Equal => Ok(ExtensionStatus::UpToDate),
        Ordering::Greater => Ok(ExtensionStatus::Outdated { installed }),
        Ordering::Less => Err(SyncError::ExtensionDowngrade {
            name: name.to_string(),
            local: local.to_string(),
            remote: installed,
        }),
    }
}

/// Normalise a dotted numeric version ("1", "1.2", "1.2.3") to semver
fn parse_version(raw: &str) -> Option<Version> {
    let parts: Vec<&str> = raw.trim().split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Version::parse(raw.trim()).ok();
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse().ok()?;
    }
    Some(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Compare local to installed version.
///
/// Unparseable versions only compare equal when the strings are identical;
/// otherwise the local one is treated as newer so it gets uploaded.
pub fn compare_versions(local: &str, installed: &str) -> Ordering {
    match (parse_version(local), parse_version(installed)) {
        (Some(l), Some(i)) => l.cmp(&i),
        _ if local.trim() == installed.trim() => Ordering::Equal,
        _ => Ordering::Greater,
    }
}

/// Zip the payload as `<name>/extension.json`
pub fn build_archive(name: &str, payload: &str) -> SyncResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer.start_file(format!("{}/extension.json", name), SimpleFileOptions::default())?;
    writer.write_all(payload.as_bytes())?;
    Ok(writer.finish()?.into_inner())
}
