use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn table_options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => render_array_table(&items),
        Value::Object(map) => {
            // Single-level unwrap: a response like {"templates": [...]} renders
            // the inner list directly instead of one key/value row.
            if map.len() == 1
                && let Some(Value::Array(items)) = map.values().next()
            {
                return render_array_table(items);
            }

            let headers = ["field", "value"];
            let rows = map
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_rows(&headers, &rows, table_options()))
        }
        scalar => {
            let headers = ["value"];
            let rows = vec![vec![value_to_cell(&scalar)]];
            Ok(table::render_rows(&headers, &rows, table_options()))
        }
    }
}

fn render_array_table(items: &[Value]) -> anyhow::Result<String> {
    if items.is_empty() {
        return Ok(String::from("(no rows)"));
    }

    if !items.iter().all(Value::is_object) {
        let headers = ["value"];
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return Ok(table::render_rows(&headers, &rows, table_options()));
    }

    // Column order follows first appearance, so serde field order wins.
    let mut headers = Vec::<String>::new();
    for item in items {
        if let Some(map) = item.as_object() {
            for key in map.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    if headers.is_empty() {
        return Ok(String::from("(no columns)"));
    }

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| {
                    map.get(header)
                        .map_or_else(|| String::from("-"), value_to_cell)
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    Ok(table::render_rows(&header_refs, &rows, table_options()))
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;
    use serde_json::json;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        score: u32,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example { id: "aud-1", score: 89 };
        let out = render(&value, OutputFormat::Json).expect("json render");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "aud-1");
        assert_eq!(parsed["score"], 89);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = Example { id: "aud-1", score: 89 };
        let out = render(&value, OutputFormat::Raw).expect("raw render");
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["score"], 89);
    }

    #[test]
    fn table_render_for_object_lists_fields() {
        let value = Example { id: "aud-1", score: 89 };
        let out = render(&value, OutputFormat::Table).expect("table render");
        assert!(out.lines().next().is_some_and(|line| line.contains("field")));
        assert!(out.contains("aud-1"));
        assert!(out.contains("89"));
    }

    #[test]
    fn table_columns_keep_first_seen_order() {
        let items = json!([
            {"id": "t-1", "status": "pending"},
            {"id": "t-2", "status": "completed", "score": 90},
        ]);
        let out = render(&items, OutputFormat::Table).expect("table render");
        let header = out.lines().next().expect("header line");
        let id_at = header.find("id").expect("id column");
        let status_at = header.find("status").expect("status column");
        let score_at = header.find("score").expect("score column");
        assert!(id_at < status_at && status_at < score_at);
    }

    #[test]
    fn single_key_list_wrapper_unwraps_to_rows() {
        let wrapped = json!({"audits": [{"id": "aud-1"}, {"id": "aud-2"}]});
        let out = render(&wrapped, OutputFormat::Table).expect("table render");
        assert!(out.lines().next().is_some_and(|line| line.contains("id")));
        assert!(out.contains("aud-2"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let empty: Vec<Example> = Vec::new();
        let out = render(&empty, OutputFormat::Table).expect("table render");
        assert_eq!(out, "(no rows)");
    }
}
