/*
 * Created on Mon Jan 12 2026
 *
 * This file is a part of ddbd
 * ddbd is the secure client-server messaging core of an industrial
 * drawing-database application: connection handshake, wire framing,
 * request dispatch and the typed component catalog.
 *
 * Copyright (c) 2026, the ddbd authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! JWT validation (§4.3 step 5, `AuthMode::Jwt`).
//!
//! Third-party JWT *issuance* (the OAuth/OIDC dance that produces the JWT the
//! client presents) is out of scope per §1 — we only specify the validation
//! inputs (application id, bound nonce, identity provider key set) and the
//! possible outcomes, mirroring `authenticateMicrosoftAccount` in the
//! original source.

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub email: String,
    /// The nonce claim, bound at issue time to the server's `AuthNonce` to
    /// prevent replay across handshakes (§4.3 step 4/5).
    pub nonce: String,
    pub aud: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JwtOutcome {
    Authenticated,
    ReceivedErroneousToken,
    NoMatchingKey,
    InvalidToken,
    InvalidSignature,
}

/// A key set keyed by JWK `kid`, as published by the identity provider's
/// discovery document. Populated by whatever out-of-scope machinery fetches
/// and refreshes the provider's JWKS; this type only holds the result.
#[derive(Default, Clone)]
pub struct JwksKeySet {
    keys: HashMap<String, DecodingKey>,
}

impl JwksKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kid: impl Into<String>, key: DecodingKey) {
        self.keys.insert(kid.into(), key);
    }

    pub fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }
}

/// Validates a raw JWT string against the configured application id and the
/// nonce bound into this connection's handshake, returning the outcome and,
/// on success, the claimed email.
pub fn validate(
    jwt: &str,
    app_id: &str,
    expected_nonce: u32,
    keys: &JwksKeySet,
) -> (JwtOutcome, Option<String>) {
    let header = match decode_header(jwt) {
        Ok(h) => h,
        Err(_) => return (JwtOutcome::ReceivedErroneousToken, None),
    };
    let Some(kid) = header.kid else {
        return (JwtOutcome::ReceivedErroneousToken, None);
    };
    let Some(key) = keys.get(&kid) else {
        return (JwtOutcome::NoMatchingKey, None);
    };

    let mut validation = Validation::new(header.alg.unwrap_or(Algorithm::RS256));
    validation.set_audience(&[app_id]);

    let token = match decode::<Claims>(jwt, key, &validation) {
        Ok(t) => t,
        Err(e) => {
            return match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    (JwtOutcome::InvalidSignature, None)
                }
                _ => (JwtOutcome::InvalidToken, None),
            }
        }
    };

    if token.claims.nonce != expected_nonce.to_string() {
        return (JwtOutcome::InvalidToken, None);
    }

    (JwtOutcome::Authenticated, Some(token.claims.email))
}
