use std::collections::HashMap;

/// One spreadsheet line resolved into column-name → value pairs.
pub type Row = HashMap<String, String>;

/// Parses published-sheet CSV text into header-keyed rows.
///
/// Deliberately lenient: the first non-blank line is the header, short
/// rows are padded with empty strings, and nothing here errors.
/// Malformed data surfaces later as a rejected event, not a parse
/// failure.
pub fn parse(text: &str) -> Vec<Row> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let Some((header_line, data_lines)) = lines.split_first() else {
        return Vec::new();
    };

    let headers: Vec<String> = split_line(header_line)
        .iter()
        .map(|h| strip_wrapping_quotes(h))
        .collect();

    data_lines
        .iter()
        .map(|line| {
            let values = split_line(line);
            headers
                .iter()
                .enumerate()
                .map(|(index, header)| {
                    let value = values
                        .get(index)
                        .map(|v| strip_wrapping_quotes(v))
                        .unwrap_or_default();
                    (header.clone(), value)
                })
                .collect()
        })
        .collect()
}

/// Comma split with quote awareness: inside a quoted field commas are
/// literal, and a doubled quote decodes to one literal quote.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

fn strip_wrapping_quotes(field: &str) -> String {
    let trimmed = field.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}
