use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Base64 payload with its MIME type, as carried under `inlineData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

/// Remote file reference, as carried under `fileData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub file_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// A single unit of message content on the Gemini wire.
///
/// Exactly one of the known fields is present per part. Variant order matters
/// for `#[serde(untagged)]` decoding: it is the precedence order for shape
/// sniffing, and `Other` must stay last so unrecognized shapes survive as
/// opaque values instead of being dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileRef,
    },
    FunctionCall {
        #[serde(rename = "functionCall")]
        function_call: Value,
    },
    FunctionResponse {
        #[serde(rename = "functionResponse")]
        function_response: Value,
    },
    Other(Value),
}

impl Part {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_data<S: Into<String>, T: Into<String>>(data: S, mime_type: T) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    pub fn file_data<S: Into<String>>(file_uri: S, mime_type: Option<String>) -> Self {
        Part::FileData {
            file_data: FileRef {
                file_uri: file_uri.into(),
                mime_type,
            },
        }
    }

    pub fn function_call(payload: Value) -> Self {
        Part::FunctionCall {
            function_call: payload,
        }
    }

    pub fn function_response(payload: Value) -> Self {
        Part::FunctionResponse {
            function_response: payload,
        }
    }

    /// Get the text if this is a Text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Get the payload if this is an InlineData part
    pub fn as_inline_data(&self) -> Option<&Blob> {
        match self {
            Part::InlineData { inline_data } => Some(inline_data),
            _ => None,
        }
    }

    /// Get the reference if this is a FileData part
    pub fn as_file_data(&self) -> Option<&FileRef> {
        match self {
            Part::FileData { file_data } => Some(file_data),
            _ => None,
        }
    }
}
