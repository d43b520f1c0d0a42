//! These models represent the objects exchanged with the Gemini API
//!
//! Two endpoint families share them:
//! - `generateContent` request/response bodies, which carry role-tagged turns
//!   of content parts
//! - `generateImages` responses, whose generated-image fields drift across
//!   several known aliases and are normalized into the same part types
//!
//! Raw responses are converted into these internal structs immediately after
//! parsing; nothing downstream of the providers touches response JSON.
pub mod content;
pub mod message;
pub mod model_id;
pub mod role;
