//! CSV export of form submissions.

use serde_json::Value;

use super::{FormField, Submission};

/// Render submissions as CSV. Columns are the form's fields in position
/// order, then IP address and submission time.
pub fn submissions_to_csv(fields: &[FormField], submissions: &[Submission]) -> String {
    let mut csv = String::new();

    let mut header: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
    header.push("ip_address");
    header.push("submitted_at");
    csv.push_str(
        &header
            .iter()
            .map(|h| escape_csv_field(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    csv.push('\n');

    for submission in submissions {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        for field in fields {
            let value = submission
                .data
                .get(&field.name)
                .map(render_value)
                .unwrap_or_default();
            row.push(escape_csv_field(&value));
        }
        row.push(escape_csv_field(
            submission.ip_address.as_deref().unwrap_or(""),
        ));
        row.push(escape_csv_field(
            &submission.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ));
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Escape a CSV field per RFC 4180: quote when the value contains commas,
/// quotes, or newlines, doubling embedded quotes.
fn escape_csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use uuid::Uuid;

    fn field(name: &str, position: i32) -> FormField {
        FormField {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            name: name.to_string(),
            label: name.to_string(),
            field_type: "text".to_string(),
            required: false,
            position,
            options: None,
        }
    }

    fn submission(data: Value) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            form_id: Uuid::new_v4(),
            data,
            ip_address: Some("203.0.113.9".to_string()),
            user_agent: None,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn renders_header_and_rows() {
        let fields = vec![field("name", 0), field("message", 1)];
        let subs = vec![submission(json!({ "name": "Asha", "message": "hi" }))];
        let csv = submissions_to_csv(&fields, &subs);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("name,message,ip_address,submitted_at"));
        assert_eq!(
            lines.next(),
            Some("Asha,hi,203.0.113.9,2024-06-01 12:30:00")
        );
    }

    #[test]
    fn escapes_commas_and_quotes() {
        let fields = vec![field("message", 0)];
        let subs = vec![submission(json!({ "message": "hello, \"world\"" }))];
        let csv = submissions_to_csv(&fields, &subs);
        assert!(csv.contains("\"hello, \"\"world\"\"\""));
    }

    #[test]
    fn missing_field_renders_empty() {
        let fields = vec![field("name", 0), field("phone", 1)];
        let subs = vec![submission(json!({ "name": "Asha" }))];
        let csv = submissions_to_csv(&fields, &subs);
        assert!(csv.lines().nth(1).unwrap().starts_with("Asha,,"));
    }

    #[test]
    fn non_string_values_are_stringified() {
        let fields = vec![field("count", 0)];
        let subs = vec![submission(json!({ "count": 42 }))];
        let csv = submissions_to_csv(&fields, &subs);
        assert!(csv.lines().nth(1).unwrap().starts_with("42,"));
    }
}
