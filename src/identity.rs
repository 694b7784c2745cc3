//! Identity resolution from the submitter credential.
//!
//! The host runtime authenticates the transaction submitter upstream and
//! hands us their PEM-encoded X.509 certificate. [`Identity::from_creator`]
//! extracts a stable `(subject_id, issuer_id)` fingerprint pair from it:
//!
//! - `subject_id` - lowercase hex SHA-256 digest of the certificate DER
//! - `issuer_id` - lowercase hex of the authorityKeyIdentifier key id
//!
//! Both are plain lowercase hex with no `:` separators and no `keyid` label,
//! suitable for persisting and comparing as caller identities. No chain of
//! trust is validated here; a parse failure means "identity cannot be
//! established", never "anonymous caller".

use sha2::{Digest, Sha256};
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::ParsedExtension;
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::FromDer;

use crate::error::{Result, ShimError};
use crate::stub::Creator;

/// Canonicalize a platform-formatted fingerprint or key identifier.
///
/// Strips `:` separators and any `keyid` label token, and lowercases, so
/// values like `keyid:3E:09:FC:...` compare equal to the ids produced by
/// [`Identity::from_creator`].
pub fn normalize_hex_id(raw: &str) -> String {
    raw.replace("keyid", "")
        .replace(':', "")
        .to_ascii_lowercase()
}

/// Resolved identity of a transaction submitter.
///
/// Derived once per transaction from the creator credential; immutable and
/// never persisted by this layer (callers may persist [`subject_id`]).
///
/// [`subject_id`]: Identity::subject_id
#[derive(Debug, Clone)]
pub struct Identity {
    msp_id: String,
    pem: String,
    subject_id: String,
    issuer_id: String,
    der: Vec<u8>,
}

impl Identity {
    /// Resolve an identity from the host-supplied creator credential.
    ///
    /// Fails with [`ShimError::MalformedCredential`] if the credential is not
    /// valid PEM/X.509, or [`ShimError::MissingExtension`] if the certificate
    /// carries no authorityKeyIdentifier key id.
    pub fn from_creator(creator: &Creator) -> Result<Self> {
        let pem_text = std::str::from_utf8(&creator.id_bytes)
            .map_err(|e| ShimError::MalformedCredential(e.to_string()))?
            .to_string();

        let (_, pem) = parse_x509_pem(&creator.id_bytes)
            .map_err(|e| ShimError::MalformedCredential(e.to_string()))?;

        let subject_id = hex::encode(Sha256::digest(&pem.contents));
        let issuer_id = {
            let cert = pem
                .parse_x509()
                .map_err(|e| ShimError::MalformedCredential(e.to_string()))?;
            authority_key_id(&cert)?
        };

        Ok(Self {
            msp_id: creator.msp_id.clone(),
            pem: pem_text,
            subject_id,
            issuer_id,
            der: pem.contents,
        })
    }

    /// Membership service provider id of the submitter.
    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// The credential PEM text as delivered by the host.
    pub fn pem(&self) -> &str {
        &self.pem
    }

    /// Lowercase hex certificate fingerprint, no separators.
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Lowercase hex authority key identifier, no separators, no `keyid` label.
    pub fn issuer_id(&self) -> &str {
        &self.issuer_id
    }

    /// Parse the retained certificate for field access beyond the id pair.
    ///
    /// The certificate borrows from this identity's DER buffer, so it is
    /// re-parsed on demand rather than stored.
    pub fn certificate(&self) -> Result<X509Certificate<'_>> {
        let (_, cert) = X509Certificate::from_der(&self.der)
            .map_err(|e| ShimError::MalformedCredential(e.to_string()))?;
        Ok(cert)
    }

    /// Compare a platform-formatted fingerprint string against [`subject_id`].
    ///
    /// [`subject_id`]: Identity::subject_id
    pub fn subject_matches(&self, fingerprint: &str) -> bool {
        normalize_hex_id(fingerprint) == self.subject_id
    }

    /// Compare a platform-formatted key identifier against [`issuer_id`].
    ///
    /// [`issuer_id`]: Identity::issuer_id
    pub fn issuer_matches(&self, key_id: &str) -> bool {
        normalize_hex_id(key_id) == self.issuer_id
    }
}

fn authority_key_id(cert: &X509Certificate<'_>) -> Result<String> {
    let aki = cert
        .extensions()
        .iter()
        .find_map(|ext| match ext.parsed_extension() {
            ParsedExtension::AuthorityKeyIdentifier(aki) => Some(aki),
            _ => None,
        })
        .ok_or(ShimError::MissingExtension("authorityKeyIdentifier"))?;

    let key_id = aki
        .key_identifier
        .as_ref()
        .ok_or(ShimError::MissingExtension("authorityKeyIdentifier keyid"))?;
    Ok(hex::encode(key_id.0))
}
