//! Label sanitization for values derived from external text

/// Make an external string safe for use as a metric label value
///
/// Group and sender names are unconstrained text; quote characters would
/// break the label encoding and unbounded length would bloat the
/// exposition, so both kinds of quotes are stripped and the result is
/// truncated to 50 characters.
pub fn sanitize_label(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .take(50)
        .collect()
}
