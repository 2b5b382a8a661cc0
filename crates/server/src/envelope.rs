use serde::Serialize;

/// Uniform `{message, payload}` body returned by every endpoint.
///
/// Built per request and discarded after serialization; `payload` is `null`
/// for operations with nothing to return (delete).
#[derive(Debug, Serialize)]
pub struct ApiResponse<P> {
    pub message: String,
    pub payload: P,
}

impl<P> ApiResponse<P> {
    pub fn new(message: impl Into<String>, payload: P) -> Self {
        Self { message: message.into(), payload }
    }
}

/// Envelope with a `null` payload.
pub fn message_only(message: impl Into<String>) -> ApiResponse<Option<()>> {
    ApiResponse::new(message, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_message_and_payload() {
        let body = ApiResponse::new("Created!", serde_json::json!({"name": "RPG"}));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Created!");
        assert_eq!(json["payload"]["name"], "RPG");
    }

    #[test]
    fn message_only_serializes_null_payload() {
        let json = serde_json::to_value(message_only("Deleted!")).unwrap();
        assert_eq!(json["message"], "Deleted!");
        assert!(json["payload"].is_null());
    }

    #[test]
    fn empty_list_payload_stays_a_list() {
        let body: ApiResponse<Vec<u32>> = ApiResponse::new("No matches", vec![]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["payload"], serde_json::json!([]));
    }
}
