//! Single-row CSV encoding.
//!
//! Sequences, sets, and tuples take this form on the text wire. Quoting
//! follows RFC 4180: fields containing a comma, quote, or line break are
//! quoted and embedded quotes are doubled. A row of exactly one empty field
//! encodes as `""` so it stays distinguishable from the empty row.

use wireform_schema::DecodeError;

fn needs_quoting(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\r') || field.contains('\n')
}

fn write_field(out: &mut String, field: &str) {
    if needs_quoting(field) {
        out.push('"');
        for c in field.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Encode fields as one CSV row, without a line terminator.
pub fn encode_row<S: AsRef<str>>(fields: &[S]) -> String {
    if let [only] = fields {
        if only.as_ref().is_empty() {
            return "\"\"".to_string();
        }
    }
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_field(&mut out, field.as_ref());
    }
    out
}

/// Decode one CSV row into its fields. The empty row decodes to no fields.
pub fn decode_row(row: &str) -> Result<Vec<String>, DecodeError> {
    if row.is_empty() {
        return Ok(Vec::new());
    }
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = row.chars().peekable();
    loop {
        match chars.peek() {
            Some('"') => {
                chars.next();
                loop {
                    match chars.next() {
                        Some('"') => {
                            if chars.peek() == Some(&'"') {
                                chars.next();
                                field.push('"');
                            } else {
                                break;
                            }
                        }
                        Some(c) => field.push(c),
                        None => {
                            return Err(DecodeError::new("unterminated quoted CSV field"));
                        }
                    }
                }
                match chars.next() {
                    None => {
                        fields.push(std::mem::take(&mut field));
                        return Ok(fields);
                    }
                    Some(',') => fields.push(std::mem::take(&mut field)),
                    Some(c) => {
                        return Err(DecodeError::new(format!(
                            "unexpected character after quoted CSV field: {c:?}"
                        )));
                    }
                }
            }
            _ => {
                loop {
                    match chars.peek() {
                        Some(',') | None => break,
                        Some(_) => {
                            // Unwrap-free by construction: peek just matched.
                            if let Some(c) = chars.next() {
                                field.push(c);
                            }
                        }
                    }
                }
                match chars.next() {
                    None => {
                        fields.push(std::mem::take(&mut field));
                        return Ok(fields);
                    }
                    Some(_) => fields.push(std::mem::take(&mut field)),
                }
            }
        }
    }
}
