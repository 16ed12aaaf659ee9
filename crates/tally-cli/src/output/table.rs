#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render an aligned text table: header, dashed divider, rows.
#[must_use]
pub fn render_rows(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths = column_widths(headers, rows);
    shrink_to_fit(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad_cell(&clip(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join("  ");
    let divider = "-".repeat(header_line.len());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line);
    lines.push(divider);
    for row in rows {
        let cells = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let raw = row.get(index).map_or("-", String::as_str);
                let clipped = clip(raw, *width);
                let numeric = looks_numeric(&clipped);
                let cell = pad_cell(&clipped, *width, numeric);
                if options.color {
                    colorize_status(&cell)
                } else {
                    cell
                }
            })
            .collect::<Vec<_>>();
        lines.push(cells.join("  "));
    }
    lines.join("\n")
}

fn column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect()
}

/// Shave the widest shrinkable column one character at a time until the
/// table fits, never going below the header width.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    if widths.is_empty() {
        return;
    }

    let separators = widths.len().saturating_sub(1) * 2;
    loop {
        let total = widths.iter().sum::<usize>() + separators;
        if total <= max_width {
            return;
        }

        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| **width > headers[*index].chars().count().max(4))
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);

        let Some(index) = widest else {
            return;
        };
        widths[index] -= 1;
    }
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }
    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.'))
}

fn pad_cell(value: &str, width: usize, right_align: bool) -> String {
    let pad = width.saturating_sub(value.chars().count());
    if right_align {
        format!("{}{}", " ".repeat(pad), value)
    } else {
        format!("{}{}", value, " ".repeat(pad))
    }
}

/// ANSI color for well-known audit and backend states.
fn colorize_status(cell: &str) -> String {
    let code = match cell.trim() {
        "completed" | "passed" | "published" | "healthy" | "true" | "remote" | "active" => {
            Some("32")
        }
        "pending" | "in_progress" | "draft" | "memory" | "warning" => Some("33"),
        "failed" | "false" | "error" | "invalid" | "inactive" => Some("31"),
        _ => None,
    };
    match code {
        Some(code) => {
            let trimmed = cell.trim_end();
            let pad = cell.len() - trimmed.len();
            format!("\u{1b}[{code}m{trimmed}\u{1b}[0m{}", " ".repeat(pad))
        }
        None => cell.to_string(),
    }
}
