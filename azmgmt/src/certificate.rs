//! Client certificate lookup by thumbprint
//!
//! Certificates live as PEM files in an ordered list of store locations (for
//! example a per-user directory followed by a system-wide one). Each file holds
//! one or more `CERTIFICATE` blocks and the matching PKCS#8 `PRIVATE KEY`.
//! A location wins only when exactly one certificate in it matches.

use std::fs;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use pem::Pem;
use reqwest::Identity;
use sha1::{Digest, Sha1};
use tracing::{debug, info, warn};

use crate::constants::certificates;
use crate::errors::{MgmtError, Result};

/// A client identity ready to be attached to outbound TLS connections
#[derive(Clone)]
pub struct Credential {
    thumbprint: String,
    path: PathBuf,
    certificate_pem: String,
    key_pem: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("thumbprint", &self.thumbprint)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Credential {
    pub fn thumbprint(&self) -> &str {
        &self.thumbprint
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn identity(&self) -> Result<Identity> {
        Identity::from_pkcs8_pem(self.certificate_pem.as_bytes(), self.key_pem.as_bytes()).map_err(
            |e| MgmtError::InvalidCredential {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            },
        )
    }
}

/// SHA-1 thumbprint of a DER certificate, upper-case hex
pub fn thumbprint(der: &[u8]) -> String {
    hex::encode_upper(Sha1::digest(der))
}

/// Strip separators that thumbprints pick up when copied from certificate viewers
pub fn normalize_thumbprint(thumbprint: &str) -> String {
    thumbprint
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

struct Candidate {
    path: PathBuf,
    blocks: Vec<Pem>,
}

pub struct CertificateStore {
    locations: Vec<PathBuf>,
}

impl CertificateStore {
    pub fn new(locations: Vec<PathBuf>) -> Self {
        Self { locations }
    }

    pub fn find_by_thumbprint(&self, thumbprint: &str) -> Result<Credential> {
        let wanted = normalize_thumbprint(thumbprint);
        let mut seen = 0;

        for location in &self.locations {
            let matches = Self::scan_location(location, &wanted);
            debug!(
                "{} certificate(s) matching {} in {}",
                matches.len(),
                wanted,
                location.display()
            );

            if matches.len() == 1 {
                if let Some(candidate) = matches.into_iter().next() {
                    info!(
                        "Using certificate {} from {}",
                        wanted,
                        candidate.path.display()
                    );
                    return Self::credential(wanted, candidate);
                }
            } else {
                seen += matches.len();
            }
        }

        Err(MgmtError::CredentialNotFound {
            thumbprint: thumbprint.to_string(),
            matches: seen,
        })
    }

    fn scan_location(location: &Path, wanted: &str) -> Vec<Candidate> {
        // The directory itself may contain glob metacharacters
        let pattern = Path::new(&Pattern::escape(&location.to_string_lossy()))
            .join(certificates::FILE_PATTERN);
        let entries = match glob(&pattern.to_string_lossy()) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Invalid certificate location {}: {}", location.display(), e);
                return Vec::new();
            }
        };

        let mut matches = Vec::new();
        for path in entries.flatten() {
            let content = match fs::read(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping unreadable certificate file {}: {}", path.display(), e);
                    continue;
                }
            };
            let blocks = match pem::parse_many(&content) {
                Ok(blocks) => blocks,
                Err(e) => {
                    warn!("Skipping malformed PEM file {}: {}", path.display(), e);
                    continue;
                }
            };

            let hits = blocks
                .iter()
                .filter(|block| block.tag() == "CERTIFICATE")
                .filter(|block| thumbprint(block.contents()) == wanted)
                .count();
            for _ in 0..hits {
                matches.push(Candidate {
                    path: path.clone(),
                    blocks: blocks.clone(),
                });
            }
        }
        matches
    }

    fn credential(thumbprint: String, candidate: Candidate) -> Result<Credential> {
        let certificate_pem: String = candidate
            .blocks
            .iter()
            .filter(|block| block.tag() == "CERTIFICATE")
            .map(pem::encode)
            .collect();

        let key = candidate
            .blocks
            .iter()
            .find(|block| block.tag() == "PRIVATE KEY")
            .ok_or_else(|| MgmtError::InvalidCredential {
                path: candidate.path.display().to_string(),
                reason: "no PKCS#8 PRIVATE KEY block next to the certificate".to_string(),
            })?;

        Ok(Credential {
            thumbprint,
            path: candidate.path,
            certificate_pem,
            key_pem: pem::encode(key),
        })
    }
}
