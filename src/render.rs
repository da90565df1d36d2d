//! Plain-text rendering of result pages.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

pub const NO_RESULTS: &str = "No results found";
pub const INVALID_PROMPT: &str = "Invalid Prompt(s)!";

pub const HELP_TEXT: &str = "\
Type \"quit\" or \"q\" to leave
Type \"run\" and press enter to start displaying results
Optional: append options to \"run\", comma separated
  -sortBy=<field>      sort key (default applicant)
  -isOpen=<true|false> only trucks open right now (default true)
  -batchSize=<n>       results per page (default 10)

Example: run -sortBy=starttime,-isOpen=false,-batchSize=25";

pub const NAVIGATION_HINT: &str =
    "Press the up and down arrow keys to change page, \"m\" for more options, or Escape or \"q\" to quit";

const COLUMN_GAP: &str = "  ";
const MIN_COLUMN_WIDTH: usize = 3;
const ELLIPSIS: &str = "…";

/// Display width of `text` in terminal cells.
pub fn visible_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Fits `text` into exactly `width` cells, cutting on grapheme boundaries and
/// marking a cut with an ellipsis.
pub fn fit_to_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let text_width = visible_width(text);
    if text_width <= width {
        return format!("{text}{}", " ".repeat(width - text_width));
    }

    let target = width - visible_width(ELLIPSIS);
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let grapheme_width = visible_width(grapheme);
        if used + grapheme_width > target {
            break;
        }
        out.push_str(grapheme);
        used += grapheme_width;
    }
    out.push_str(ELLIPSIS);
    used += visible_width(ELLIPSIS);
    if used < width {
        out.push_str(&" ".repeat(width - used));
    }
    out
}

/// Replaces control characters so a cell stays on one line.
fn clean_cell(value: Option<&str>) -> String {
    value
        .unwrap_or("")
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

/// Column widths that fit `total_width`, shrinking the widest column first.
pub fn column_widths(natural: &[usize], total_width: usize) -> Vec<usize> {
    let mut widths = natural.to_vec();
    if widths.is_empty() {
        return widths;
    }
    let gaps = visible_width(COLUMN_GAP) * (widths.len() - 1);
    let budget = total_width.saturating_sub(gaps);

    while widths.iter().sum::<usize>() > budget {
        let Some((idx, widest)) = widths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(idx, width)| (*width, std::cmp::Reverse(*idx)))
        else {
            break;
        };
        if widest <= MIN_COLUMN_WIDTH {
            break;
        }
        widths[idx] = widest - 1;
    }
    widths
}

/// Renders a header row, a rule and one row per record.
pub fn render_table(headers: &[&str], rows: &[Vec<Option<&str>>], total_width: usize) -> Vec<String> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|col| clean_cell(row.get(col).copied().flatten()))
                .collect()
        })
        .collect();

    let natural: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            cells
                .iter()
                .map(|row| visible_width(&row[col]))
                .chain(std::iter::once(visible_width(header)))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH)
        })
        .collect();
    let widths = column_widths(&natural, total_width);

    let format_row = |values: Vec<&str>| -> String {
        let line = values
            .iter()
            .zip(&widths)
            .map(|(value, width)| fit_to_width(value, *width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        line.trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.to_vec()));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP),
    );
    for row in &cells {
        lines.push(format_row(row.iter().map(String::as_str).collect()));
    }
    lines
}

/// Formats the rejection line for unrecognized command tokens.
pub fn invalid_prompt_line(tokens: &[String]) -> String {
    format!("{INVALID_PROMPT}: {}", tokens.join(","))
}
