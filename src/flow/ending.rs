//! Ending scripts and the outbound WhatsApp link

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Characters `encodeURIComponent` leaves untouched besides alphanumerics
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Binary answer selected on the offer step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ending {
    Yes,
    No,
}

impl Ending {
    pub fn title(self) -> &'static str {
        match self {
            Ending::Yes => "Okay… then let’s do it properly.",
            Ending::No => "Thank you for being honest.",
        }
    }

    pub fn body(self) -> &'static str {
        match self {
            Ending::Yes => {
                "No rushing, no pressure. Just one real conversation and we see what’s there."
            }
            Ending::No => {
                "No hard feelings Bloss. I meant it when I said I care about you, and I’m grateful for what we had."
            }
        }
    }

    /// Pre-filled message for the outbound link
    pub fn message(self) -> &'static str {
        match self {
            Ending::Yes => "Hey :) I saw the site. I’m open to a proper talk.",
            Ending::No => {
                "Hey, I saw it. Thank you for making it. I’m not ready to restart, but I appreciate you."
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Ending::Yes => "yes",
            Ending::No => "no",
        }
    }
}

/// Percent-encode the way `encodeURIComponent` does
pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// `https://wa.me/<phone>?text=<message>`; an empty phone lets the visitor pick a chat
pub fn whatsapp_link(phone: &str, message: &str) -> String {
    format!("https://wa.me/{}?text={}", phone, encode_uri_component(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_uri_component() {
        assert_eq!(encode_uri_component("a b"), "a%20b");
        assert_eq!(encode_uri_component("Hey :)"), "Hey%20%3A)");
        assert_eq!(encode_uri_component("I’m"), "I%E2%80%99m");
        assert_eq!(encode_uri_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_uri_component("a&b=c?d/e"), "a%26b%3Dc%3Fd%2Fe");
    }

    #[test]
    fn test_link_format() {
        let link = whatsapp_link("27838582088", Ending::Yes.message());
        assert_eq!(
            link,
            "https://wa.me/27838582088?text=Hey%20%3A)%20I%20saw%20the%20site.%20I%E2%80%99m%20open%20to%20a%20proper%20talk."
        );
    }

    #[test]
    fn test_link_without_phone() {
        let link = whatsapp_link("", "hi");
        assert_eq!(link, "https://wa.me/?text=hi");
    }

    #[test]
    fn test_endings_differ() {
        assert_ne!(Ending::Yes.title(), Ending::No.title());
        assert_ne!(Ending::Yes.message(), Ending::No.message());
    }
}
