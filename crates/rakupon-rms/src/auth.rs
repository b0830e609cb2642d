use base64::prelude::*;

/// RMS service credentials, combined into the `ESA` authorization scheme.
///
/// Built once at process start from configuration and injected into
/// [`crate::RmsClient`]; nothing else in the workspace touches the raw
/// secrets. The `Debug` representation is redacted.
#[derive(Clone)]
pub struct EsaCredentials {
    service_secret: String,
    license_key: String,
}

impl EsaCredentials {
    #[must_use]
    pub fn new(service_secret: impl Into<String>, license_key: impl Into<String>) -> Self {
        Self {
            service_secret: service_secret.into(),
            license_key: license_key.into(),
        }
    }

    /// Returns `ESA base64("{service_secret}:{license_key}")` — the value
    /// RMS expects in the `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        let raw = format!("{}:{}", self.service_secret, self.license_key);
        format!("ESA {}", BASE64_STANDARD.encode(raw))
    }
}

impl std::fmt::Debug for EsaCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EsaCredentials")
            .field("service_secret", &"[redacted]")
            .field("license_key", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_header_encodes_secret_colon_license() {
        let credentials = EsaCredentials::new("secret", "license");
        // base64("secret:license")
        assert_eq!(
            credentials.authorization_header(),
            "ESA c2VjcmV0OmxpY2Vuc2U="
        );
    }

    #[test]
    fn debug_output_redacts_both_fields() {
        let credentials = EsaCredentials::new("super-secret", "super-license");
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("super-secret"), "secret leaked: {debug}");
        assert!(!debug.contains("super-license"), "license leaked: {debug}");
        assert!(debug.contains("[redacted]"));
    }
}
