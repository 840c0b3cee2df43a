use crate::error::ListifyError;

/// Parse a `{ 4, 3, -1 }` buffer rendering back into its entries.
pub fn listify(text: &str) -> Result<Vec<i64>, ListifyError> {
    let inner = text.trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| ListifyError::Unbracketed(text.to_string()))?
        .trim();

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner.split(',')
        .enumerate()
        .map(|(index, entry)| {
            entry.trim().parse::<i64>().map_err(|_| ListifyError::BadEntry {
                index,
                entry: entry.trim().to_string(),
            })
        })
        .collect()
}
