//! Inbound generation request and its validation.

use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("mode is required")]
    MissingMode,

    #[error("unrecognized mode '{0}', expected DictateEnglish or DictateChinese")]
    UnknownMode(String),
}

/// What the student practices writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationMode {
    /// Prompt with the Chinese meaning, write the English word on a four-line guide.
    DictateEnglish,
    /// Prompt with the English word, write the Chinese in a plain box.
    DictateChinese,
}

impl DictationMode {
    /// Chinese prompts print slightly larger than English prompts.
    pub fn preferred_font_size(self) -> f32 {
        match self {
            DictationMode::DictateEnglish => 16.0,
            DictationMode::DictateChinese => 14.0,
        }
    }

    /// Returns the prompt text for the left-hand cell.
    pub fn prompt_text(self, english: &str, chinese: &str) -> String {
        match self {
            DictationMode::DictateEnglish => chinese.to_string(),
            DictationMode::DictateChinese => english.to_string(),
        }
    }

    /// Whether the practice cell carries a four-line guide.
    // Only English dictation gets the guide; Chinese practice cells stay plain.
    pub fn practice_cell_guided(self) -> bool {
        matches!(self, DictationMode::DictateEnglish)
    }
}

impl FromStr for DictationMode {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(RequestError::MissingMode),
            "DictateEnglish" | "默写英文" => Ok(DictationMode::DictateEnglish),
            "DictateChinese" | "默写中文" => Ok(DictationMode::DictateChinese),
            other => Err(RequestError::UnknownMode(other.to_string())),
        }
    }
}

/// Request body for `POST /api/words/generatePdf`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateWorksheetRequest {
    #[serde(default)]
    pub tag_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub word_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub mode: Option<String>,
}

/// A request whose mode has been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct WorksheetRequest {
    pub tag_ids: Vec<i64>,
    pub word_ids: Vec<i64>,
    pub mode: DictationMode,
}

impl GenerateWorksheetRequest {
    pub fn validate(self) -> Result<WorksheetRequest, RequestError> {
        let mode = self
            .mode
            .as_deref()
            .ok_or(RequestError::MissingMode)?
            .parse::<DictationMode>()?;

        Ok(WorksheetRequest {
            tag_ids: self.tag_ids.unwrap_or_default(),
            word_ids: self.word_ids.unwrap_or_default(),
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateWorksheetRequest {
        serde_json::from_str(json).expect("request json should deserialize")
    }

    #[test]
    fn test_camel_case_body_validates() {
        let req = parse(r#"{"wordIds":[1,2],"tagIds":[],"mode":"DictateEnglish"}"#)
            .validate()
            .unwrap();
        assert_eq!(req.word_ids, vec![1, 2]);
        assert!(req.tag_ids.is_empty());
        assert_eq!(req.mode, DictationMode::DictateEnglish);
    }

    #[test]
    fn test_original_literals_accepted() {
        assert_eq!(
            "默写中文".parse::<DictationMode>(),
            Ok(DictationMode::DictateChinese)
        );
        assert_eq!(
            "默写英文".parse::<DictationMode>(),
            Ok(DictationMode::DictateEnglish)
        );
    }

    #[test]
    fn test_missing_mode_rejected() {
        let err = parse(r#"{"wordIds":[1]}"#).validate().unwrap_err();
        assert_eq!(err, RequestError::MissingMode);
    }

    #[test]
    fn test_blank_mode_rejected() {
        let err = parse(r#"{"mode":"   "}"#).validate().unwrap_err();
        assert_eq!(err, RequestError::MissingMode);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = parse(r#"{"mode":"Spelling"}"#).validate().unwrap_err();
        assert!(matches!(err, RequestError::UnknownMode(m) if m == "Spelling"));
    }

    #[test]
    fn test_absent_filters_default_to_empty() {
        let req = parse(r#"{"mode":"DictateChinese"}"#).validate().unwrap();
        assert!(req.word_ids.is_empty());
        assert!(req.tag_ids.is_empty());
    }

    #[test]
    fn test_mode_semantics() {
        let en = DictationMode::DictateEnglish;
        let zh = DictationMode::DictateChinese;
        assert_eq!(en.prompt_text("cat", "猫"), "猫");
        assert_eq!(zh.prompt_text("cat", "猫"), "cat");
        assert!(en.practice_cell_guided());
        assert!(!zh.practice_cell_guided());
        assert_eq!(en.preferred_font_size(), 16.0);
        assert_eq!(zh.preferred_font_size(), 14.0);
    }
}
