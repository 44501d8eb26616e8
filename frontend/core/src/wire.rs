//! JSON shapes exchanged with the extraction service.

use serde::{Deserialize, Serialize};

/// One extraction result: a field class paired with recognised text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Response body of `POST /extract-text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub detections: Vec<Detection>,
}

/// Response body of `POST /submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub message: String,
}

/// Error body the service returns on 4xx/5xx.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_service_response_with_confidence() {
        let raw = r#"{"detections":[
            {"class_name":"NAME","extracted_text":"Asha Rao","confidence":0.91},
            {"class_name":"GENDER","extracted_text":"Female"}
        ]}"#;
        let resp: ExtractionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.detections.len(), 2);
        assert_eq!(resp.detections[0].confidence, Some(0.91));
        assert_eq!(resp.detections[1].confidence, None);
    }

    #[test]
    fn missing_detections_is_empty() {
        let resp: ExtractionResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.detections.is_empty());
    }
}
