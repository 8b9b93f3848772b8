pub mod survey;

pub use survey::{AnswerValue, SurveyKind, SurveyPage, VotePayload};
