//! # Request Ingress
//!
//! Decodes one newline-delimited JSON line into an authenticated request.
//! Lines that do not decode are answered with an `invalid_argument` response
//! and never reach the ledger. The correlation id is recovered from the raw
//! JSON when possible, otherwise the nil UUID is used.

use pc_custody::{ErrorKind, LedgerRequest, LedgerResponse, Outcome};
use shared_types::AuthenticatedRequest;
use uuid::Uuid;

/// A decoded request envelope.
pub type RequestEnvelope = AuthenticatedRequest<LedgerRequest>;

/// Decode `line`, or build the rejection to send back.
pub fn decode_line(line: &str) -> Result<RequestEnvelope, LedgerResponse> {
    serde_json::from_str(line).map_err(|e| malformed(line, &e))
}

fn malformed(line: &str, err: &serde_json::Error) -> LedgerResponse {
    LedgerResponse {
        correlation_id: recover_correlation_id(line).unwrap_or_else(Uuid::nil),
        outcome: Outcome::Error {
            kind: ErrorKind::InvalidArgument,
            message: format!("malformed request: {err}"),
        },
    }
}

fn recover_correlation_id(line: &str) -> Option<Uuid> {
    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    value.get("correlation_id")?.as_str()?.parse().ok()
}
