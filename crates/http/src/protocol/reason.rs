//! Status code to reason phrase lookup used when a response does not set its own reason.

use tracing::warn;

/// Reason used for codes the table does not know.
pub const UNKNOWN_REASON: &str = "-";

/// Returns the reason phrase for `code`, or [`UNKNOWN_REASON`] with a warning for unknown codes.
pub fn reason_phrase(code: u16) -> &'static str {
    match known_reason(code) {
        Some(reason) => reason,
        None => {
            warn!(code, "undefined status code, no reason phrase");
            UNKNOWN_REASON
        }
    }
}

/// Returns the reason phrase for `code` if the table has one.
pub fn known_reason(code: u16) -> Option<&'static str> {
    let reason = match code {
        100 => "Continue",
        200 => "OK",
        201 => "Created",
        204 => "No content",
        206 => "Partial Content",
        207 => "Multi Status",
        302 => "Moved Temporarily",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Authorization Required",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Time Out",
        410 => "Gone",
        414 => "Request URI Too Long",
        423 => "Locked",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        503 => "Service Unavailable",
        _ => return None,
    };
    Some(reason)
}
