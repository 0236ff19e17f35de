use crate::{NotifierConfig, ProjectConfig};
use tracing::error;

// For signature verification
use hex::decode as hex_decode;
use hmac::{Hmac, Mac};
use sha2::Sha256;
type HmacSha256 = Hmac<Sha256>;

/// Verifies the platform's webhook signature header.
///
/// The platform signs the raw request body with HMAC-SHA256 over the
/// shared secret and sends the digest as lowercase hex.
pub fn verify_event_signature(secret: &str, payload: &[u8], signature_header: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    match hex_decode(signature_header.trim()) {
        Ok(received) => {
            // Constant-time comparison
            expected.as_slice() == received.as_slice()
        }
        Err(_) => {
            error!("Signature header is not valid hex");
            false
        }
    }
}

/// Finds the first project config whose key-or-regex matches the
/// analyzed project's key. Returns None if there's no suitable match.
pub fn find_matching_project<'a>(
    config: &'a NotifierConfig,
    project_key: &str,
) -> Option<&'a ProjectConfig> {
    config.project.iter().find(|proj| proj.matches(project_key))
}

pub fn find_matching_project_owned(
    config: &NotifierConfig,
    project_key: &str,
) -> Option<ProjectConfig> {
    find_matching_project(config, project_key).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SlackSettings;

    fn sign(secret: &str, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    fn project(key_or_regex: &str, channel: &str) -> ProjectConfig {
        ProjectConfig {
            key_or_regex: key_or_regex.to_string(),
            hook: None,
            channel: channel.to_string(),
            notify: None,
            qg_fail_only: None,
            with_webhook_secret: None,
            webhook_secret: None,
        }
    }

    #[test]
    fn accepts_valid_signature() {
        let secret = "topsecret";
        let body = br#"{"project":{"key":"k","name":"n"}}"#;
        let signature = sign(secret, body);
        assert!(verify_event_signature(secret, body, &signature));
    }

    #[test]
    fn rejects_wrong_secret() {
        let body = b"payload";
        let signature = sign("right", body);
        assert!(!verify_event_signature("wrong", body, &signature));
    }

    #[test]
    fn rejects_garbage_header() {
        assert!(!verify_event_signature("secret", b"payload", "not-hex!"));
    }

    #[test]
    fn finds_first_matching_project() {
        let config = NotifierConfig {
            slack: SlackSettings {
                hook: "https://hooks.example.com/x".to_string(),
                user: None,
                include_branch: None,
            },
            project: vec![project("exact:key", "#a"), project("team:.*", "#b")],
        };

        assert_eq!(
            find_matching_project(&config, "exact:key").map(|p| p.channel.as_str()),
            Some("#a")
        );
        assert_eq!(
            find_matching_project(&config, "team:api").map(|p| p.channel.as_str()),
            Some("#b")
        );
        assert!(find_matching_project(&config, "other:key").is_none());
    }
}
