use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which answer button a record points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerLabel {
    A,
    B,
}

impl AnswerLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerLabel::A => "A",
            AnswerLabel::B => "B",
        }
    }
}

impl FromStr for AnswerLabel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(AnswerLabel::A),
            "B" => Ok(AnswerLabel::B),
            _ => Err(()),
        }
    }
}

/// A single question/answer pair from the bank file.
///
/// Duplicated questions are allowed; lookups always keep the earliest
/// record in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecord {
    #[serde(rename = "q")]
    pub question: String,
    #[serde(rename = "ans")]
    pub answer: AnswerLabel,
    /// Display texts for the two answer buttons, in label order.
    #[serde(rename = "a", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<[String; 2]>,
}

impl QaRecord {
    /// The display text behind the record's answer label, when the bank
    /// file carried the option pair.
    pub fn answer_text(&self) -> Option<&str> {
        self.options.as_ref().map(|options| match self.answer {
            AnswerLabel::A => options[0].as_str(),
            AnswerLabel::B => options[1].as_str(),
        })
    }
}
