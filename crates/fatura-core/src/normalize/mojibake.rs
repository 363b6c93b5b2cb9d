//! Repair of UTF-8 text that was decoded as Latin-1.

use tracing::debug;

use super::patterns::MOJIBAKE_MARKERS;

/// Undo UTF-8-as-Latin-1 mis-decoding, layer by layer.
///
/// Each layer is undone only when the result carries strictly fewer marker
/// characters than its input, so the output is a fixed point: repairing it
/// again returns it unchanged.
pub fn repair_mojibake(text: &str) -> String {
    let mut current = text.to_string();
    while let Some(repaired) = repair_layer(&current) {
        current = repaired;
    }

    if current != text {
        debug!("Repaired mojibake: {:?} -> {:?}", text, current);
    }
    current
}

fn repair_layer(text: &str) -> Option<String> {
    if !text.contains(MOJIBAKE_MARKERS) {
        return None;
    }

    let repaired = reencode_latin1(text)?;
    (marker_count(&repaired) < marker_count(text)).then_some(repaired)
}

fn reencode_latin1(text: &str) -> Option<String> {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

fn marker_count(text: &str) -> usize {
    text.chars().filter(|c| MOJIBAKE_MARKERS.contains(c)).count()
}
