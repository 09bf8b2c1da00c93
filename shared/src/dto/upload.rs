//! # Upload Data Transfer Objects

use serde::{Deserialize, Serialize};

/// `POST /api/upload` success body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "fileId")]
    pub file_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_wire_name() {
        let body = UploadResponse { file_id: "file_123".to_string() };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"fileId":"file_123"}"#);
    }
}
