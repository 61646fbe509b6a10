use serde::{Deserialize, Serialize};

/// Conversation category carried on chat events. Decides which Android
/// notification channel a push lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Support,
    Reservation,
    #[default]
    Property,
}

impl ChatKind {
    /// Unknown and empty tags fall back to `Property`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "support" => Self::Support,
            "reservation" => Self::Reservation,
            _ => Self::Property,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Reservation => "reservation",
            Self::Property => "property",
        }
    }

    /// Android notification channel id registered by the mobile app.
    pub fn channel_id(&self) -> &'static str {
        match self {
            Self::Support => "chat_support",
            Self::Reservation => "chat_reservation",
            Self::Property => "chat_property",
        }
    }
}

/// How an invocation was shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Body came from a database trigger and carries a full event record.
    Trigger,
    /// Caller supplied the device addresses directly.
    Manual,
}
