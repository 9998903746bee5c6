//! Lead capture: one form-encoded POST per completed capture, plus the
//! share links offered after a successful submission.
//!
//! Submission is best-effort. A failure surfaces as a generic inline message
//! and the user may resubmit; nothing here retries.

use async_trait::async_trait;
use url::Url;

use crate::error::CaptureError;
use crate::flow::answers::AnswerSet;
use crate::flow::model::FlowMetadata;

/// A completed capture: contact email tied to the full answer set.
#[derive(Debug, Clone)]
pub struct LeadSubmission {
    pub email: String,
    pub tool: String,
    pub answers: AnswerSet,
}

impl LeadSubmission {
    /// Flattens the submission into form fields: every answer keyed by its
    /// question id, plus the tool identifier and the submitter's email.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = self
            .answers
            .iter()
            .map(|(id, value)| (id.to_string(), value.to_string()))
            .collect();
        fields.sort();
        fields.push(("tool".to_string(), self.tool.clone()));
        fields.push(("email".to_string(), self.email.clone()));
        fields
    }
}

/// Outbound lead-capture sink.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn submit(&self, submission: &LeadSubmission) -> Result<(), CaptureError>;
}

/// Form-encoded HTTP POST sink.
pub struct FormPostSink {
    client: reqwest::Client,
    endpoint: Url,
}

impl FormPostSink {
    pub fn new(endpoint: &str) -> Result<Self, CaptureError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| CaptureError::Endpoint(format!("{endpoint}: {e}")))?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
        })
    }
}

#[async_trait]
impl LeadSink for FormPostSink {
    async fn submit(&self, submission: &LeadSubmission) -> Result<(), CaptureError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&submission.form_fields())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CaptureError::Status(status.as_u16()));
        }
        Ok(())
    }
}

/// Prebuilt share URLs shown after a successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub twitter: String,
    pub linkedin: String,
}

/// Builds share links from the flow metadata. The share text falls back to
/// a sentence naming the flow title.
pub fn share_links(metadata: &FlowMetadata) -> ShareLinks {
    let text = metadata
        .share_text
        .clone()
        .unwrap_or_else(|| format!("I just used {}", metadata.title));
    let page_url = metadata.page_url.as_deref().unwrap_or("");

    let twitter = Url::parse_with_params(
        "https://twitter.com/intent/tweet",
        [("text", text.as_str()), ("url", page_url)],
    )
    .expect("static base url")
    .to_string();

    let linkedin = Url::parse_with_params(
        "https://www.linkedin.com/sharing/share-offsite/",
        [("url", page_url)],
    )
    .expect("static base url")
    .to_string();

    ShareLinks { twitter, linkedin }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::model::AnswerValue;

    #[test]
    fn form_fields_carry_answers_tool_and_email() {
        let mut answers = AnswerSet::new();
        answers.record("team_size", AnswerValue::Integer(12));
        answers.record("uses_crm", AnswerValue::Text("yes".into()));

        let submission = LeadSubmission {
            email: "ada@example.com".into(),
            tool: "roi".into(),
            answers,
        };

        let fields = submission.form_fields();
        assert!(fields.contains(&("team_size".into(), "12".into())));
        assert!(fields.contains(&("uses_crm".into(), "yes".into())));
        assert_eq!(fields[fields.len() - 2], ("tool".into(), "roi".into()));
        assert_eq!(
            fields[fields.len() - 1],
            ("email".into(), "ada@example.com".into())
        );
    }

    #[test]
    fn rejects_invalid_endpoint() {
        assert!(matches!(
            FormPostSink::new("not a url"),
            Err(CaptureError::Endpoint(_))
        ));
        assert!(FormPostSink::new("https://formspree.io/f/abc123").is_ok());
    }

    #[test]
    fn share_links_encode_text_and_url() {
        let metadata = FlowMetadata {
            title: "ROI Calculator".into(),
            tool: "roi".into(),
            share_text: Some("My results & more".into()),
            page_url: Some("https://example.com/roi".into()),
            ..Default::default()
        };

        let links = share_links(&metadata);
        assert!(links.twitter.starts_with("https://twitter.com/intent/tweet?"));
        assert!(links.twitter.contains("My+results+%26+more"));
        assert!(links.linkedin.contains("url=https%3A%2F%2Fexample.com%2Froi"));
    }

    #[test]
    fn share_text_falls_back_to_title() {
        let metadata = FlowMetadata {
            title: "ROI Calculator".into(),
            tool: "roi".into(),
            ..Default::default()
        };
        let links = share_links(&metadata);
        assert!(links.twitter.contains("I+just+used+ROI+Calculator"));
    }
}
