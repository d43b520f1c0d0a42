use serde_json::Value;

use crate::errors::ChatError;
use crate::models::content::Part;

/// Aliases under which the image endpoint has been observed to return its
/// generated images, in precedence order. The first field holding an array
/// wins; later aliases are ignored for that response.
const GENERATED_IMAGE_FIELDS: &[&str] = &["generatedImages", "images", "results"];

/// Aliases for an inline base64 payload on a single generated-image entry,
/// in precedence order.
const INLINE_IMAGE_FIELDS: &[&str] = &["b64Image", "image", "data", "base64Data"];

/// Aliases for a remote reference on a single generated-image entry, in
/// precedence order. Only consulted when no inline payload is present.
const IMAGE_LINK_FIELDS: &[&str] = &["imageUri", "uri", "contentUri"];

const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Convert a raw `generateContent` response into ordered content parts.
///
/// Picks the first candidate that actually carries parts; a safety-halted
/// candidate is surfaced as an error rather than partial content.
pub fn content_response_to_parts(response: &Value) -> Result<Vec<Part>, ChatError> {
    check_prompt_feedback(response)?;

    let candidate = response
        .get("candidates")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .find(|candidate| {
            candidate
                .pointer("/content/parts")
                .and_then(Value::as_array)
                .is_some_and(|parts| !parts.is_empty())
        })
        .ok_or_else(|| ChatError::EmptyResult("Gemini returned no usable content.".to_string()))?;

    if candidate.get("finishReason").and_then(Value::as_str) == Some("SAFETY") {
        return Err(ChatError::Halted);
    }

    let parts = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|raw| raw.iter().map(value_to_part).collect())
        .unwrap_or_default();

    Ok(parts)
}

/// Convert a raw `generateImages` response into ordered content parts:
/// one media part per generated image, then any generated texts.
pub fn images_response_to_parts(response: &Value) -> Result<Vec<Part>, ChatError> {
    check_prompt_feedback(response)?;

    let mut parts = Vec::new();
    for image in collect_generated_images(response) {
        if let Some(part) = extract_inline_image(image).or_else(|| extract_image_link(image)) {
            parts.push(part);
        }
    }

    let media_count = parts.len();
    for text in collect_generated_texts(response) {
        parts.push(Part::text(text));
    }

    if parts.is_empty() {
        return Err(ChatError::EmptyResult(
            "Gemini returned no images.".to_string(),
        ));
    }

    tracing::debug!(
        "Normalized image response into {} media and {} text parts",
        media_count,
        parts.len() - media_count
    );
    Ok(parts)
}

/// Map one raw response part onto the closed `Part` union. Decoding precedence
/// is the untagged variant order; anything that matches no known shape is
/// preserved opaquely.
pub fn value_to_part(value: &Value) -> Part {
    serde_json::from_value(value.clone()).unwrap_or_else(|_| Part::Other(value.clone()))
}

/// Drop everything up to and including an embedded `base64,` marker, so both
/// bare base64 and full data URIs normalize to the same payload.
pub fn strip_data_prefix(value: &str) -> &str {
    match value.find("base64,") {
        Some(index) => value[index + "base64,".len()..].trim(),
        None => value.trim(),
    }
}

fn check_prompt_feedback(response: &Value) -> Result<(), ChatError> {
    if let Some(reason) = response
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return Err(ChatError::Blocked(reason.to_string()));
    }
    Ok(())
}

fn collect_generated_images(response: &Value) -> Vec<&Value> {
    for field in GENERATED_IMAGE_FIELDS {
        if let Some(images) = response.get(field).and_then(Value::as_array) {
            return images.iter().collect();
        }
    }
    Vec::new()
}

/// Inline payloads win over remote references; one part per entry.
fn extract_inline_image(image: &Value) -> Option<Part> {
    let mime_type = image
        .get("mimeType")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_IMAGE_MIME);

    if let Some(data) = INLINE_IMAGE_FIELDS
        .iter()
        .find_map(|field| image.get(field).and_then(Value::as_str))
    {
        return Some(Part::inline_data(strip_data_prefix(data), mime_type));
    }

    let inline = image.get("inlineData")?;
    let data = inline.get("data").and_then(Value::as_str)?;
    let mime_type = inline
        .get("mimeType")
        .and_then(Value::as_str)
        .unwrap_or(mime_type);
    Some(Part::inline_data(strip_data_prefix(data), mime_type))
}

fn extract_image_link(image: &Value) -> Option<Part> {
    let uri = IMAGE_LINK_FIELDS
        .iter()
        .find_map(|field| image.get(field).and_then(Value::as_str))?;
    let mime_type = image
        .get("mimeType")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some(Part::file_data(uri, mime_type))
}

fn collect_generated_texts(response: &Value) -> Vec<String> {
    let mut texts = Vec::new();

    if let Some(entries) = response.get("generatedTexts").and_then(Value::as_array) {
        for entry in entries {
            if let Some(text) = entry.get("text").and_then(Value::as_str) {
                texts.push(text.to_string());
            } else if let Some(text) = entry.as_str() {
                texts.push(text.to_string());
            }
        }
    }
    if let Some(entries) = response.get("texts").and_then(Value::as_array) {
        for entry in entries {
            if let Some(text) = entry.as_str() {
                texts.push(text.to_string());
            }
        }
    }
    if let Some(text) = response.get("text").and_then(Value::as_str) {
        texts.push(text.to_string());
    }

    texts.retain(|text| !text.is_empty());
    texts
}
