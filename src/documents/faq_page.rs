use serde::{Deserialize, Serialize};

use super::lenient;

pub const FAQ_PAGE: &str = "faq";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconTag {
    Clock,
    CreditCard,
    Calendar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hero {
    #[serde(deserialize_with = "lenient::or_default")]
    pub label: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub heading: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub description: String,
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            label: "FAQ".to_string(),
            heading: "Frequently Asked [highlight]Questions[/highlight]".to_string(),
            description: "Everything you need to know about our commercial cleaning services."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpCard {
    pub title: String,
    pub description: String,
    pub button_text: String,
    pub button_link: String,
    pub icon: IconTag,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactChannel {
    #[serde(deserialize_with = "lenient::or_default")]
    pub label: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactBlock {
    #[serde(deserialize_with = "lenient::or_default")]
    pub heading: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub email: ContactChannel,
    #[serde(deserialize_with = "lenient::or_default")]
    pub phone: ContactChannel,
}

impl Default for ContactBlock {
    fn default() -> Self {
        Self {
            heading: "Still have questions?".to_string(),
            email: ContactChannel {
                label: "Email us".to_string(),
                value: "hello@tidyhaus.example".to_string(),
            },
            phone: ContactChannel {
                label: "Call us".to_string(),
                value: "(555) 010-0199".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustIndicator {
    pub number: String,
    pub description: String,
}

/// Static copy around the FAQ list. Replaced wholesale on every admin save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqPageDocument {
    #[serde(deserialize_with = "lenient::or_default")]
    pub hero: Hero,
    #[serde(deserialize_with = "lenient::skip_invalid")]
    pub help_cards: Vec<HelpCard>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub contact: ContactBlock,
    #[serde(deserialize_with = "lenient::skip_invalid")]
    pub trust_indicators: Vec<TrustIndicator>,
}

impl FaqPageDocument {
    pub fn normalized(mut self) -> Self {
        let fallback = FaqPageDocument::default();
        fill(&mut self.hero.label, &fallback.hero.label);
        fill(&mut self.hero.heading, &fallback.hero.heading);
        fill(&mut self.hero.description, &fallback.hero.description);
        fill(&mut self.contact.heading, &fallback.contact.heading);
        fill(&mut self.contact.email.label, &fallback.contact.email.label);
        fill(&mut self.contact.email.value, &fallback.contact.email.value);
        fill(&mut self.contact.phone.label, &fallback.contact.phone.label);
        fill(&mut self.contact.phone.value, &fallback.contact.phone.value);
        if self.help_cards.is_empty() {
            self.help_cards = fallback.help_cards;
        }
        if self.trust_indicators.is_empty() {
            self.trust_indicators = fallback.trust_indicators;
        }
        self
    }
}

fn fill(field: &mut String, fallback: &str) {
    if field.trim().is_empty() {
        *field = fallback.to_string();
    }
}

impl Default for FaqPageDocument {
    fn default() -> Self {
        Self {
            hero: Hero::default(),
            help_cards: vec![
                HelpCard {
                    title: "Flexible Scheduling".to_string(),
                    description: "Book cleanings before or after business hours.".to_string(),
                    button_text: "See availability".to_string(),
                    button_link: "/contact".to_string(),
                    icon: IconTag::Clock,
                },
                HelpCard {
                    title: "Transparent Pricing".to_string(),
                    description: "Get a fixed quote with no hidden fees.".to_string(),
                    button_text: "Get a quote".to_string(),
                    button_link: "/contact".to_string(),
                    icon: IconTag::CreditCard,
                },
                HelpCard {
                    title: "Book a Walkthrough".to_string(),
                    description: "We visit your site and tailor a cleaning plan.".to_string(),
                    button_text: "Schedule now".to_string(),
                    button_link: "/contact".to_string(),
                    icon: IconTag::Calendar,
                },
            ],
            contact: ContactBlock::default(),
            trust_indicators: vec![
                TrustIndicator {
                    number: "500+".to_string(),
                    description: "Facilities cleaned".to_string(),
                },
                TrustIndicator {
                    number: "98%".to_string(),
                    description: "Client retention".to_string(),
                },
                TrustIndicator {
                    number: "24/7".to_string(),
                    description: "Support line".to_string(),
                },
            ],
        }
    }
}
