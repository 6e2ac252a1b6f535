//! Success-response envelope shared by all handlers.

use serde::Serialize;

/// Wraps every successful JSON payload as `{"data": ...}` so clients can
/// distinguish payloads from the `{"error", "code"}` failure shape.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
