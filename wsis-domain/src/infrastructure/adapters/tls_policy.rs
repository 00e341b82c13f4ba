use crate::application::ports::IdentityServerConfig;
use crate::domain::errors::{ServiceError, ServiceResult};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::client::WebPkiServerVerifier;
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::pem::PemObject;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{
    CertificateError, ClientConfig, DigitallySignedStruct, Error as TlsError, RootCertStore,
    SignatureScheme,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use x509_parser::prelude::{FromDer, GeneralName, X509Certificate};
use x509_parser::time::ASN1Time;

/// Peer verification rules for connections to the identity server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPolicy {
    pub server: String,
    pub verify_peer: bool,
    pub allow_self_signed: bool,
    pub ca_file: Option<PathBuf>,
}

impl TlsPolicy {
    pub fn from_config(config: &IdentityServerConfig) -> Self {
        Self {
            server: config.server.clone(),
            verify_peer: config.verify_peer,
            allow_self_signed: config.allow_self_signed,
            ca_file: config.ca_file.clone(),
        }
    }

    pub fn verifier(&self) -> ServiceResult<Arc<PolicyVerifier>> {
        let roots = match &self.ca_file {
            Some(path) if self.verify_peer => {
                let mut roots = RootCertStore::empty();
                for cert in load_ca_certificates(path)? {
                    roots.add(cert).map_err(|e| ServiceError::Tls {
                        message: format!("invalid CA certificate in {}: {e}", path.display()),
                    })?;
                }
                Some(roots)
            }
            _ => None,
        };

        PolicyVerifier::new(&self.server, self.verify_peer, self.allow_self_signed, roots)
            .map(Arc::new)
    }

    /// rustls client configuration enforcing this policy
    pub fn client_config(&self) -> ServiceResult<ClientConfig> {
        let verifier = self.verifier()?;
        let provider = verifier.provider.clone();

        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| ServiceError::Tls {
                message: e.to_string(),
            })?
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_no_client_auth();

        Ok(config)
    }
}

/// Read every certificate from a PEM bundle
pub fn load_ca_certificates(path: &Path) -> ServiceResult<Vec<CertificateDer<'static>>> {
    let pem = std::fs::read(path).map_err(|e| ServiceError::Configuration {
        message: format!("cannot read CA file {}: {e}", path.display()),
    })?;

    let certs = CertificateDer::pem_slice_iter(&pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ServiceError::Tls {
            message: format!("cannot parse CA file {}: {e:?}", path.display()),
        })?;

    if certs.is_empty() {
        return Err(ServiceError::Tls {
            message: format!("no certificates found in {}", path.display()),
        });
    }

    Ok(certs)
}

/// Certificate verifier implementing [`TlsPolicy`].
///
/// The certificate is always checked against the configured server name, not
/// the host the URL points at. With `allow_self_signed`, a self-issued
/// certificate sent without a chain is accepted when it verifies against its
/// own key and is currently valid for the server name.
#[derive(Debug)]
pub struct PolicyVerifier {
    server_name: ServerName<'static>,
    verify_peer: bool,
    allow_self_signed: bool,
    ca_verifier: Option<Arc<WebPkiServerVerifier>>,
    provider: Arc<CryptoProvider>,
}

impl PolicyVerifier {
    pub fn new(
        server: &str,
        verify_peer: bool,
        allow_self_signed: bool,
        roots: Option<RootCertStore>,
    ) -> ServiceResult<Self> {
        let server_name = ServerName::try_from(server.to_string()).map_err(|e| {
            ServiceError::Configuration {
                message: format!("invalid server name '{server}': {e}"),
            }
        })?;
        let provider = Arc::new(rustls::crypto::ring::default_provider());

        let ca_verifier = match roots {
            Some(roots) => Some(
                WebPkiServerVerifier::builder_with_provider(Arc::new(roots), provider.clone())
                    .build()
                    .map_err(|e| ServiceError::Tls {
                        message: e.to_string(),
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            server_name,
            verify_peer,
            allow_self_signed,
            ca_verifier,
            provider,
        })
    }

    /// Accept `end_entity` as its own issuer.
    ///
    /// The certificate is checked directly instead of through chain building,
    /// so `CA:TRUE` self-signed certificates and certificates that only carry
    /// a common name are accepted. `chain_error` is returned unchanged when
    /// the certificate is not self-issued.
    fn verify_self_signed(
        &self,
        end_entity: &CertificateDer<'_>,
        now: UnixTime,
        chain_error: CertificateError,
    ) -> Result<ServerCertVerified, TlsError> {
        let (_, cert) = X509Certificate::from_der(end_entity.as_ref())
            .map_err(|_| TlsError::InvalidCertificate(CertificateError::BadEncoding))?;

        if cert.issuer().as_raw() != cert.subject().as_raw() {
            return Err(TlsError::InvalidCertificate(chain_error));
        }

        cert.verify_signature(None)
            .map_err(|_| TlsError::InvalidCertificate(CertificateError::BadSignature))?;

        let at = i64::try_from(now.as_secs())
            .ok()
            .and_then(|secs| ASN1Time::from_timestamp(secs).ok())
            .ok_or_else(|| TlsError::General("current time out of range".to_string()))?;
        let validity = cert.validity();
        if at < validity.not_before {
            return Err(TlsError::InvalidCertificate(CertificateError::NotValidYet));
        }
        if at > validity.not_after {
            return Err(TlsError::InvalidCertificate(CertificateError::Expired));
        }

        if !valid_for_name(&cert, &self.server_name) {
            return Err(TlsError::InvalidCertificate(CertificateError::NotValidForName));
        }

        Ok(ServerCertVerified::assertion())
    }
}

/// Match `server_name` against the subject alternative names, or the common
/// name when the certificate carries no DNS names
fn valid_for_name(cert: &X509Certificate<'_>, server_name: &ServerName<'_>) -> bool {
    let alt_names = cert
        .subject_alternative_name()
        .ok()
        .flatten()
        .map(|ext| ext.value.general_names.as_slice())
        .unwrap_or(&[]);

    match server_name {
        ServerName::DnsName(dns) => {
            let host = dns.as_ref();
            let dns_names: Vec<&str> = alt_names
                .iter()
                .filter_map(|name| match name {
                    GeneralName::DNSName(value) => Some(*value),
                    _ => None,
                })
                .collect();

            if dns_names.is_empty() {
                cert.subject()
                    .iter_common_name()
                    .filter_map(|cn| cn.as_str().ok())
                    .any(|cn| dns_name_matches(cn, host))
            } else {
                dns_names.iter().any(|pattern| dns_name_matches(pattern, host))
            }
        }
        ServerName::IpAddress(ip) => {
            let octets = match std::net::IpAddr::from(*ip) {
                std::net::IpAddr::V4(v4) => v4.octets().to_vec(),
                std::net::IpAddr::V6(v6) => v6.octets().to_vec(),
            };
            alt_names.iter().any(|name| match name {
                GeneralName::IPAddress(value) => *value == octets.as_slice(),
                _ => false,
            })
        }
        _ => false,
    }
}

/// Case-insensitive host match; a leading `*.` covers exactly one label
fn dns_name_matches(pattern: &str, host: &str) -> bool {
    let pattern = pattern.trim_end_matches('.').to_ascii_lowercase();
    let host = host.trim_end_matches('.').to_ascii_lowercase();

    match pattern.strip_prefix("*.") {
        Some(suffix) => host
            .split_once('.')
            .is_some_and(|(label, rest)| !label.is_empty() && rest == suffix),
        None => pattern == host,
    }
}

impl ServerCertVerifier for PolicyVerifier {
    fn verify_server_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        ocsp_response: &[u8],
        now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        if !self.verify_peer {
            return Ok(ServerCertVerified::assertion());
        }

        let chained = match &self.ca_verifier {
            Some(verifier) => verifier.verify_server_cert(
                end_entity,
                intermediates,
                &self.server_name,
                ocsp_response,
                now,
            ),
            None => Err(TlsError::InvalidCertificate(CertificateError::UnknownIssuer)),
        };

        match chained {
            Err(TlsError::InvalidCertificate(chain_error))
                if self.allow_self_signed && intermediates.is_empty() =>
            {
                debug!(server = ?self.server_name, "checking self-signed server certificate");
                self.verify_self_signed(end_entity, now, chain_error)
            }
            other => other,
        }
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
