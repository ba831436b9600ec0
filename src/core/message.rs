use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    /// Prefix shown before the message in the consultation transcript.
    pub fn display_prefix(self) -> &'static str {
        match self {
            ChatRole::User => "You",
            ChatRole::Assistant => "Assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == ChatRole::User
    }
}

impl AsRef<str> for ChatRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for ChatRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(ChatRole::User),
            "assistant" => Ok(ChatRole::Assistant),
            _ => Err(format!("invalid chat role: {value}")),
        }
    }
}

impl TryFrom<String> for ChatRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<ChatRole> for String {
    fn from(value: ChatRole) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_round_trip_through_strings() {
        assert_eq!(ChatRole::try_from("user"), Ok(ChatRole::User));
        assert_eq!(ChatRole::try_from("assistant"), Ok(ChatRole::Assistant));
        assert!(ChatRole::try_from("system").is_err());
        assert_eq!(String::from(ChatRole::Assistant), "assistant");
    }

    #[test]
    fn messages_serialize_with_plain_roles() {
        let json = serde_json::to_value(ChatMessage::assistant("Hello")).expect("serialize");
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "Hello");
    }
}
