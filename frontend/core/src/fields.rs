//! Extracted field set: the four user-editable card fields.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::wire::Detection;

/// Recognised card field classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldClass {
    AadharNumber,
    Name,
    Gender,
    DateOfBirth,
}

impl FieldClass {
    /// Form order.
    pub const ALL: [FieldClass; 4] = [
        FieldClass::AadharNumber,
        FieldClass::Name,
        FieldClass::Gender,
        FieldClass::DateOfBirth,
    ];

    /// Map an extraction-service class name; `None` for classes we don't show.
    pub fn from_class_name(name: &str) -> Option<Self> {
        match name {
            "AADHAR_NUMBER" => Some(FieldClass::AadharNumber),
            "NAME" => Some(FieldClass::Name),
            "GENDER" => Some(FieldClass::Gender),
            "DATE_OF_BIRTH" => Some(FieldClass::DateOfBirth),
            _ => None,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            FieldClass::AadharNumber => "AADHAR_NUMBER",
            FieldClass::Name => "NAME",
            FieldClass::Gender => "GENDER",
            FieldClass::DateOfBirth => "DATE_OF_BIRTH",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldClass::AadharNumber => "Aadhar No",
            FieldClass::Name => "Name",
            FieldClass::Gender => "Gender",
            FieldClass::DateOfBirth => "DOB",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FieldClass::AadharNumber => FieldClass::Name,
            FieldClass::Name => FieldClass::Gender,
            FieldClass::Gender => FieldClass::DateOfBirth,
            FieldClass::DateOfBirth => FieldClass::AadharNumber,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FieldClass::AadharNumber => FieldClass::DateOfBirth,
            FieldClass::Name => FieldClass::AadharNumber,
            FieldClass::Gender => FieldClass::Name,
            FieldClass::DateOfBirth => FieldClass::Gender,
        }
    }
}

/// The four form fields. Serializes to the submission body
/// `{ aadharNumber, name, gender, dob }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedFields {
    #[serde(default)]
    pub aadhar_number: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub dob: String,
}

impl ExtractedFields {
    /// Build a field set from detections.
    pub fn from_detections(detections: &[Detection]) -> Self {
        let mut fields = Self::default();
        fields.apply_detections(detections);
        fields
    }

    /// Fold detections into the set. Later detections of a class overwrite
    /// earlier ones; unknown classes are skipped. Returns how many were applied.
    pub fn apply_detections(&mut self, detections: &[Detection]) -> usize {
        let mut applied = 0;
        for detection in detections {
            match FieldClass::from_class_name(&detection.class_name) {
                Some(class) => {
                    self.set(class, detection.extracted_text.clone());
                    applied += 1;
                }
                None => debug!(class_name = %detection.class_name, "Ignoring unrecognised detection class"),
            }
        }
        applied
    }

    pub fn get(&self, class: FieldClass) -> &str {
        match class {
            FieldClass::AadharNumber => &self.aadhar_number,
            FieldClass::Name => &self.name,
            FieldClass::Gender => &self.gender,
            FieldClass::DateOfBirth => &self.dob,
        }
    }

    pub fn get_mut(&mut self, class: FieldClass) -> &mut String {
        match class {
            FieldClass::AadharNumber => &mut self.aadhar_number,
            FieldClass::Name => &mut self.name,
            FieldClass::Gender => &mut self.gender,
            FieldClass::DateOfBirth => &mut self.dob,
        }
    }

    pub fn set(&mut self, class: FieldClass, value: impl Into<String>) {
        *self.get_mut(class) = value.into();
    }

    /// Classes whose value is empty or whitespace.
    pub fn missing(&self) -> Vec<FieldClass> {
        FieldClass::ALL
            .into_iter()
            .filter(|c| self.get(*c).trim().is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.missing().len() == FieldClass::ALL.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(class_name: &str, text: &str) -> Detection {
        Detection {
            class_name: class_name.to_string(),
            extracted_text: text.to_string(),
            confidence: None,
        }
    }

    #[test]
    fn later_detection_of_same_class_wins() {
        let fields = ExtractedFields::from_detections(&[
            detection("NAME", "First Reading"),
            detection("GENDER", "Female"),
            detection("NAME", "Second Reading"),
        ]);
        assert_eq!(fields.name, "Second Reading");
        assert_eq!(fields.gender, "Female");
    }

    #[test]
    fn name_only_leaves_other_fields_empty() {
        let fields = ExtractedFields::from_detections(&[detection("NAME", "Asha Rao")]);
        assert_eq!(fields.name, "Asha Rao");
        assert_eq!(fields.aadhar_number, "");
        assert_eq!(fields.gender, "");
        assert_eq!(fields.dob, "");
        assert_eq!(
            fields.missing(),
            vec![FieldClass::AadharNumber, FieldClass::Gender, FieldClass::DateOfBirth]
        );
    }

    #[test]
    fn unknown_classes_are_ignored() {
        let mut fields = ExtractedFields::default();
        let applied = fields.apply_detections(&[
            detection("ADDRESS", "12 MG Road"),
            detection("DATE_OF_BIRTH", "01/02/1990"),
        ]);
        assert_eq!(applied, 1);
        assert_eq!(fields.dob, "01/02/1990");
        assert!(!fields.is_empty());
    }

    #[test]
    fn serializes_to_submission_body() {
        let mut fields = ExtractedFields::default();
        fields.set(FieldClass::AadharNumber, "1234 5678 9012");
        fields.set(FieldClass::DateOfBirth, "1990");
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "aadharNumber": "1234 5678 9012",
                "name": "",
                "gender": "",
                "dob": "1990",
            })
        );
    }

    #[test]
    fn focus_cycles_through_all_fields() {
        let mut class = FieldClass::AadharNumber;
        for _ in 0..4 {
            class = class.next();
        }
        assert_eq!(class, FieldClass::AadharNumber);
        assert_eq!(FieldClass::AadharNumber.previous(), FieldClass::DateOfBirth);
    }

    #[test]
    fn class_names_map_back_to_fields() {
        for class in FieldClass::ALL {
            assert_eq!(FieldClass::from_class_name(class.class_name()), Some(class));
        }
        assert_eq!(FieldClass::from_class_name("name"), None);
        assert_eq!(FieldClass::from_class_name("QR_CODE"), None);
    }
}
