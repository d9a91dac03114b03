use crate::export::MockupDocument;
use crate::inquiry::build_payload;
use std::error::Error;

/// Inquiry payload of the configured session, as submitted to the store
pub fn render(doc: &MockupDocument) -> Result<String, Box<dyn Error>> {
    let details = doc
        .inquiry
        .as_ref()
        .ok_or("plan has no inquiry section; cannot build a payload")?;
    let payload = build_payload(&doc.session, details)?;
    Ok(serde_json::to_string_pretty(&payload)?)
}
