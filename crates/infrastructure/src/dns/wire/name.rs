use super::POINTER_MASK;
use dnswalk_domain::ResolveError;

/// Reads a possibly compressed domain name starting at `pos`.
///
/// Returns the dotted name and the offset just past the name as it appears
/// in place (two bytes for a pointer, however many for literal labels).
///
/// Pointer chains are followed iteratively, never by recursing into the
/// message. Two guards keep degenerate encodings from looping: a pointer
/// must aim strictly before its own position, and the total number of hops
/// is bounded by the message length.
pub(super) fn decode_name(message: &[u8], pos: usize) -> Result<(String, usize), ResolveError> {
    let mut labels: Vec<String> = Vec::new();
    let mut cursor = pos;
    // Where in-place reading resumes; set when the first pointer is taken.
    let mut resume: Option<usize> = None;
    let mut hops = 0usize;

    loop {
        let len = *message
            .get(cursor)
            .ok_or_else(|| truncated("name length byte"))?;

        if len & POINTER_MASK == POINTER_MASK {
            let low = *message
                .get(cursor + 1)
                .ok_or_else(|| truncated("pointer offset byte"))?;
            let target = usize::from(len & !POINTER_MASK) << 8 | usize::from(low);

            if resume.is_none() {
                resume = Some(cursor + 2);
            }
            if target >= cursor {
                return Err(ResolveError::MalformedResponse(
                    "compression pointer does not point backwards".to_string(),
                ));
            }
            hops += 1;
            if hops > message.len() {
                return Err(ResolveError::MalformedResponse(
                    "compression pointer chain exceeds message length".to_string(),
                ));
            }
            cursor = target;
        } else if len == 0 {
            cursor += 1;
            break;
        } else {
            let start = cursor + 1;
            let end = start + usize::from(len);
            let label = message.get(start..end).ok_or_else(|| truncated("label"))?;
            labels.push(String::from_utf8_lossy(label).into_owned());
            cursor = end;
        }
    }

    Ok((labels.join("."), resume.unwrap_or(cursor)))
}

fn truncated(what: &str) -> ResolveError {
    ResolveError::MalformedResponse(format!("message ends inside {what}"))
}
