//! Plain text tables sized to the terminal.

const GAP: &str = "  ";
const MIN_WIDTH: usize = 4;

/// Renders `rows` under `headers` as aligned columns.
///
/// When the table is wider than `max_width`, the widest columns are narrowed
/// first and overflowing cells end in `…`. Line breaks inside cells are shown
/// as spaces.
pub fn render(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> String {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.replace('\n', " ")).collect())
        .collect();

    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.chars().count())
        })
        .collect();

    shrink(&mut widths, max_width);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(headers.iter().copied(), &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(GAP),
    );
    for row in &rows {
        lines.push(line(row.iter().map(String::as_str), &widths));
    }

    lines.join("\n")
}

fn shrink(widths: &mut [usize], max_width: usize) {
    let gaps = GAP.len() * widths.len().saturating_sub(1);
    loop {
        let total: usize = widths.iter().sum::<usize>() + gaps;
        if total <= max_width {
            return;
        }
        let Some(widest) = widths
            .iter_mut()
            .filter(|width| **width > MIN_WIDTH)
            .max_by_key(|width| **width)
        else {
            return;
        };
        *widest -= 1;
    }
}

fn line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let cells: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| {
            let cell = truncate(cell, width);
            format!("{cell:<width$}")
        })
        .collect();
    cells.join(GAP).trim_end().to_string()
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut truncated: String = cell.chars().take(width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
