//! Input controls and submit-time validation for the five question kinds.
//!
//! Rendering here means describing the control the surface should show; the
//! surface owns pixels. Validation is deliberately asymmetric for numbers:
//! `min` is enforced on submit, `max` only parameterizes the control. That
//! asymmetry is long-standing observed behavior and callers rely on it.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::flow::model::{AnswerValue, ChoiceOption, Question, QuestionKind};

/// A description of the input control for one question.
#[derive(Debug, Clone, PartialEq)]
pub enum InputControl {
    /// One button per option (yes/no and choice questions).
    Buttons { options: Vec<ChoiceOption> },
    /// Numeric field; `min`/`max` are control hints.
    NumberField {
        min: i64,
        max: Option<i64>,
        default: Option<i64>,
        placeholder: Option<String>,
    },
    /// Single-line free-text field.
    TextField {
        default: Option<String>,
        placeholder: Option<String>,
    },
    /// Email field.
    EmailField { placeholder: Option<String> },
}

/// The fixed options a yes/no question renders with.
pub fn yes_no_options() -> Vec<ChoiceOption> {
    vec![
        ChoiceOption::new("yes", "Yes").with_emoji("✅"),
        ChoiceOption::new("no", "No").with_emoji("❌"),
    ]
}

/// Builds the input control appropriate to a question's kind.
pub fn control_for(question: &Question) -> InputControl {
    match &question.kind {
        QuestionKind::YesNo => InputControl::Buttons {
            options: yes_no_options(),
        },
        QuestionKind::Choice { options } => InputControl::Buttons {
            options: options.clone(),
        },
        QuestionKind::Number { min, max, default } => InputControl::NumberField {
            min: min.unwrap_or(0),
            max: *max,
            default: *default,
            placeholder: question.placeholder.clone(),
        },
        QuestionKind::Text { default } => InputControl::TextField {
            default: default.clone(),
            placeholder: question.placeholder.clone(),
        },
        QuestionKind::Email => InputControl::EmailField {
            placeholder: question.placeholder.clone(),
        },
    }
}

fn email_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Relaxed on purpose: local-part "@" domain "." suffix, no whitespace.
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
}

/// Relaxed email-shape check. Not RFC 5322; matches the historical behavior
/// downstream flows were built against.
pub fn is_valid_email(candidate: &str) -> bool {
    email_shape().is_match(candidate)
}

/// Checks a typed value against its question's kind.
pub fn validate(question: &Question, value: &AnswerValue) -> Result<(), ValidationError> {
    match (&question.kind, value) {
        (QuestionKind::YesNo, AnswerValue::Text(token)) => {
            if token == "yes" || token == "no" {
                Ok(())
            } else {
                Err(ValidationError::NotAnOption {
                    value: token.clone(),
                })
            }
        }
        (QuestionKind::Choice { options }, AnswerValue::Text(token)) => {
            if options.iter().any(|o| o.value == *token) {
                Ok(())
            } else {
                Err(ValidationError::NotAnOption {
                    value: token.clone(),
                })
            }
        }
        (QuestionKind::Number { min, .. }, AnswerValue::Integer(n)) => {
            let min = min.unwrap_or(0);
            if *n < min {
                Err(ValidationError::BelowMinimum { value: *n, min })
            } else {
                Ok(())
            }
        }
        (QuestionKind::Text { .. }, AnswerValue::Text(text)) => {
            if text.trim().is_empty() {
                Err(ValidationError::EmptyText)
            } else {
                Ok(())
            }
        }
        (QuestionKind::Email, AnswerValue::Text(candidate)) => {
            if is_valid_email(candidate) {
                Ok(())
            } else {
                Err(ValidationError::InvalidEmail(candidate.clone()))
            }
        }
        _ => Err(ValidationError::KindMismatch),
    }
}

/// Parses raw field input into a typed, validated answer value.
pub fn parse_raw(question: &Question, raw: &str) -> Result<AnswerValue, ValidationError> {
    let value = match &question.kind {
        QuestionKind::Number { .. } => {
            let n: i64 = raw
                .trim()
                .parse()
                .map_err(|_| ValidationError::NotAnInteger(raw.to_string()))?;
            AnswerValue::Integer(n)
        }
        _ => AnswerValue::Text(raw.to_string()),
    };
    validate(question, &value)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number_question(min: Option<i64>, max: Option<i64>) -> Question {
        Question::new(
            "count",
            "How many?",
            QuestionKind::Number {
                min,
                max,
                default: None,
            },
        )
    }

    #[test]
    fn email_shape_cases() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("plain-text"));
        assert!(!is_valid_email("a b@c.co"));
    }

    #[test]
    fn number_below_min_rejected() {
        let q = number_question(Some(5), Some(10));
        assert_eq!(
            validate(&q, &AnswerValue::Integer(4)),
            Err(ValidationError::BelowMinimum { value: 4, min: 5 })
        );
        assert_eq!(validate(&q, &AnswerValue::Integer(5)), Ok(()));
    }

    #[test]
    fn number_above_max_accepted() {
        // Max is a control hint only; submit-time validation ignores it.
        let q = number_question(Some(0), Some(10));
        assert_eq!(validate(&q, &AnswerValue::Integer(999)), Ok(()));
    }

    #[test]
    fn number_min_defaults_to_zero() {
        let q = number_question(None, None);
        assert_eq!(
            validate(&q, &AnswerValue::Integer(-1)),
            Err(ValidationError::BelowMinimum { value: -1, min: 0 })
        );
        assert_eq!(validate(&q, &AnswerValue::Integer(0)), Ok(()));
    }

    #[test]
    fn yes_no_accepts_only_tokens() {
        let q = Question::new("q", "Ready?", QuestionKind::YesNo);
        assert_eq!(validate(&q, &"yes".into()), Ok(()));
        assert_eq!(validate(&q, &"no".into()), Ok(()));
        assert!(matches!(
            validate(&q, &"maybe".into()),
            Err(ValidationError::NotAnOption { .. })
        ));
    }

    #[test]
    fn choice_requires_configured_value() {
        let q = Question::new(
            "q",
            "Pick",
            QuestionKind::Choice {
                options: vec![
                    ChoiceOption::new("small", "Small"),
                    ChoiceOption::new("large", "Large"),
                ],
            },
        );
        assert_eq!(validate(&q, &"large".into()), Ok(()));
        assert!(matches!(
            validate(&q, &"medium".into()),
            Err(ValidationError::NotAnOption { .. })
        ));
    }

    #[test]
    fn text_must_be_non_blank() {
        let q = Question::new("q", "Name?", QuestionKind::Text { default: None });
        assert_eq!(validate(&q, &"Ada".into()), Ok(()));
        assert_eq!(validate(&q, &"   ".into()), Err(ValidationError::EmptyText));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let q = Question::new("q", "Ready?", QuestionKind::YesNo);
        assert_eq!(
            validate(&q, &AnswerValue::Integer(1)),
            Err(ValidationError::KindMismatch)
        );
    }

    #[test]
    fn parse_raw_numbers() {
        let q = number_question(Some(1), None);
        assert_eq!(parse_raw(&q, " 12 "), Ok(AnswerValue::Integer(12)));
        assert!(matches!(
            parse_raw(&q, "twelve"),
            Err(ValidationError::NotAnInteger(_))
        ));
        assert!(matches!(
            parse_raw(&q, "0"),
            Err(ValidationError::BelowMinimum { .. })
        ));
    }

    #[test]
    fn controls_reflect_question_kind() {
        let q = number_question(None, Some(100)).with_placeholder("Enter a number");
        match control_for(&q) {
            InputControl::NumberField {
                min,
                max,
                placeholder,
                ..
            } => {
                assert_eq!(min, 0);
                assert_eq!(max, Some(100));
                assert_eq!(placeholder.as_deref(), Some("Enter a number"));
            }
            other => panic!("unexpected control: {other:?}"),
        }

        let yn = Question::new("q", "Ready?", QuestionKind::YesNo);
        match control_for(&yn) {
            InputControl::Buttons { options } => {
                let values: Vec<_> = options.iter().map(|o| o.value.as_str()).collect();
                assert_eq!(values, ["yes", "no"]);
            }
            other => panic!("unexpected control: {other:?}"),
        }
    }
}
