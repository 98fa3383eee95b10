// ABOUTME: PKCE (Proof Key for Code Exchange) implementation for OAuth 2.0
// ABOUTME: Generates code verifiers and SHA256 challenges per RFC 7636

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

use crate::error::{AuthError, AuthResult};
use crate::oauth::types::PkceChallenge;

/// Generate a PKCE challenge for the OAuth flow
pub fn generate_pkce_challenge() -> AuthResult<PkceChallenge> {
    let code_verifier = generate_code_verifier()?;
    let code_challenge = generate_code_challenge(&code_verifier);

    Ok(PkceChallenge {
        code_verifier,
        code_challenge,
        code_challenge_method: "S256".to_string(),
    })
}

/// Generate a random code verifier (43-128 characters)
fn generate_code_verifier() -> AuthResult<String> {
    let length = 64;
    let verifier: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect();

    if verifier.len() < 43 || verifier.len() > 128 {
        return Err(AuthError::Pkce(format!(
            "Invalid code verifier length: {}",
            verifier.len()
        )));
    }

    Ok(verifier)
}

/// Generate SHA256 code challenge from verifier
fn generate_code_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Verify that a code verifier matches a code challenge
pub fn verify_pkce_challenge(verifier: &str, challenge: &str) -> bool {
    generate_code_challenge(verifier) == challenge
}

/// Generate a random state value for CSRF protection
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
