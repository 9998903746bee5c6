//! Traffic-source classification and channel grouping.
//!
//! UTM query parameters win over everything; otherwise the referrer host is
//! classified into social / organic / AI-assistant / referral buckets, and a
//! visit with neither is direct traffic.

use url::Url;

use crate::error::StorageError;
use crate::store::{keys, KvStore};

/// Raw attribution inputs for one page visit.
#[derive(Debug, Clone, Default)]
pub struct PageVisit {
    /// Decoded query parameters of the landing URL.
    pub query: Vec<(String, String)>,
    /// Full referrer URL, if any.
    pub referrer: Option<String>,
}

impl PageVisit {
    fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Classified traffic source for a visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficSource {
    pub source: String,
    pub medium: String,
    pub campaign: Option<String>,
    utm_tagged: bool,
}

const SOCIAL_HOSTS: &[(&str, &str)] = &[
    ("linkedin.com", "linkedin"),
    ("lnkd.in", "linkedin"),
    ("twitter.com", "twitter"),
    ("t.co", "twitter"),
    ("x.com", "twitter"),
    ("facebook.com", "facebook"),
    ("fb.com", "facebook"),
    ("fb.me", "facebook"),
];

const SEARCH_HOSTS: &[&str] = &[
    "google.",
    "bing.com",
    "duckduckgo.com",
    "yahoo.com",
    "baidu.com",
    "yandex.",
];

const AI_HOSTS: &[&str] = &[
    "chat.openai.com",
    "chatgpt.com",
    "claude.ai",
    "perplexity.ai",
    "bard.google.com",
    "copilot.microsoft.com",
];

impl TrafficSource {
    /// Classifies a visit. Never fails; unparseable referrers fall through
    /// to direct traffic.
    pub fn classify(visit: &PageVisit) -> Self {
        if let Some(source) = visit.param("utm_source") {
            return Self {
                source: source.to_string(),
                medium: visit.param("utm_medium").unwrap_or("unknown").to_string(),
                campaign: visit.param("utm_campaign").map(str::to_string),
                utm_tagged: true,
            };
        }

        let host = visit
            .referrer
            .as_deref()
            .and_then(|r| Url::parse(r).ok())
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()));

        let Some(host) = host else {
            return Self::direct();
        };

        if let Some((_, source)) = SOCIAL_HOSTS.iter().find(|(h, _)| host.contains(h)) {
            return Self::referrer_based(source, "social");
        }
        if SEARCH_HOSTS.iter().any(|h| host.contains(h)) {
            return Self::referrer_based(&leading_label(&host), "organic");
        }
        if AI_HOSTS.iter().any(|h| host.contains(h)) {
            return Self::referrer_based(&leading_label(&host), "ai");
        }
        Self::referrer_based(&host, "referral")
    }

    fn direct() -> Self {
        Self {
            source: "direct".to_string(),
            medium: "none".to_string(),
            campaign: None,
            utm_tagged: false,
        }
    }

    fn referrer_based(source: &str, medium: &str) -> Self {
        Self {
            source: source.to_string(),
            medium: medium.to_string(),
            campaign: None,
            utm_tagged: false,
        }
    }

    /// Channel grouping for reporting.
    pub fn channel(&self) -> &'static str {
        match self.medium.as_str() {
            "ai" => "AI Discovery",
            "organic" => "SEO / Organic Search",
            "social" => match self.source.as_str() {
                "linkedin" => "LinkedIn",
                "twitter" => "Twitter/X",
                _ => "Social",
            },
            "paid" | "cpc" | "ppc" => "Paid Ads",
            "email" => "Email",
            "referral" => "Referral",
            _ if self.source == "direct" => "Direct",
            _ => "Other",
        }
    }

    /// Persists first-touch attribution the first time a campaign-tagged
    /// visit is seen; later visits never overwrite it.
    pub fn record_first_touch(&self, store: &dyn KvStore) -> Result<(), StorageError> {
        if !self.utm_tagged || store.get(keys::FIRST_SOURCE)?.is_some() {
            return Ok(());
        }
        store.set(keys::FIRST_SOURCE, &self.source)?;
        store.set(keys::FIRST_MEDIUM, &self.medium)?;
        store.set(keys::FIRST_CAMPAIGN, self.campaign.as_deref().unwrap_or(""))?;
        Ok(())
    }
}

/// First meaningful host label ("www.google.com" -> "google").
fn leading_label(host: &str) -> String {
    let mut labels = host.split('.');
    match labels.next() {
        Some("www") => labels.next().unwrap_or("www").to_string(),
        Some(label) => label.to_string(),
        None => host.to_string(),
    }
}
