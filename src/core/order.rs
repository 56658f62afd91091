//! Order compilation - turns a sort specification into an ORDER BY clause
//!
//! The specification is a comma-separated list of `<field> [direction]`
//! segments, e.g. `"advertised_start_time, name desc"`. Column names cannot
//! be bound as parameters, so every field is checked against the resource's
//! allow-list and only the mapped column name ever reaches the SQL text.
//!
//! Validation is permissive: unknown fields and malformed segments are
//! dropped, not rejected.

/// Logical sort field name paired with the column it maps to
pub type SortField = (&'static str, &'static str);

/// Append an ORDER BY clause for `order_by` to `query`
pub fn compile_order(query: &str, order_by: Option<&str>, allowed: &[SortField]) -> String {
    let Some(order_by) = order_by else {
        return query.to_string();
    };

    let segments: Vec<String> = order_by
        .split(',')
        .filter_map(|segment| compile_segment(segment.trim(), allowed))
        .collect();

    if segments.is_empty() {
        return query.to_string();
    }

    format!("{} ORDER BY {}", query, segments.join(", "))
}

/// Compile a single `<field> [direction]` segment
///
/// Any direction token containing "desc" (case-insensitive) sorts
/// descending; every other token sorts ascending.
fn compile_segment(segment: &str, allowed: &[SortField]) -> Option<String> {
    let tokens: Vec<&str> = segment.split_whitespace().collect();

    let (field, direction) = match tokens.as_slice() {
        [field] => (*field, None),
        [field, direction] => (*field, Some(*direction)),
        _ => return None,
    };

    let column = allowed
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, column)| *column)?;

    match direction {
        Some(d) if d.to_lowercase().contains("desc") => Some(format!("{} DESC", column)),
        _ => Some(column.to_string()),
    }
}
