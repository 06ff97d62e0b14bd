/// Table stage: GitHub-style pipe tables with column alignment
///
/// A table is a header row, a separator row directly below it, and any number
/// of body rows. The whole block collapses onto one line of HTML; cell text is
/// left as-is so that later stages still format it.
use crate::ast::{Alignment, Table};
use crate::parser::{
    find_closing_fence, is_fenced_code_start, is_table_row, is_table_separator, split_table_row,
};

pub fn render_tables(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        // Fenced code belongs to the code stage, copy it through untouched
        if is_fenced_code_start(line).is_some()
            && let Some(close) = find_closing_fence(&lines[i..])
        {
            output.extend(lines[i..=i + close].iter().map(|l| l.to_string()));
            i += close + 1;
            continue;
        }

        if let Some((table, lines_consumed)) = parse_table(&lines[i..]) {
            output.push(render_table(&table));
            i += lines_consumed;
            continue;
        }

        output.push(line.to_string());
        i += 1;
    }

    output.join("\n")
}

/// Parse a table starting at `lines[0]`
/// Returns the table and the number of lines it spans
pub fn parse_table(lines: &[&str]) -> Option<(Table, usize)> {
    let (&header, rest) = lines.split_first()?;
    let &separator = rest.first()?;

    if !is_table_row(header) || is_table_separator(header) || !is_table_separator(separator) {
        return None;
    }

    let headers: Vec<String> = split_table_row(header)
        .into_iter()
        .map(str::to_string)
        .collect();
    let alignments = split_table_row(separator)
        .into_iter()
        .map(Alignment::from_separator)
        .collect();

    let rows: Vec<Vec<String>> = rest[1..]
        .iter()
        .take_while(|line| is_table_row(line))
        .map(|line| {
            split_table_row(line)
                .into_iter()
                .map(str::to_string)
                .collect()
        })
        .collect();

    let lines_consumed = 2 + rows.len();
    Some((
        Table {
            headers,
            alignments,
            rows,
        },
        lines_consumed,
    ))
}

pub fn render_table(table: &Table) -> String {
    let mut html = String::from("<table><thead><tr>");

    for (column, header) in table.headers.iter().enumerate() {
        push_cell(&mut html, "th", table.alignment(column), header);
    }

    html.push_str("</tr></thead><tbody>");

    for row in &table.rows {
        html.push_str("<tr>");
        // Short rows are padded with empty cells, long rows are cut to the header width
        for column in 0..table.column_count() {
            let cell = row.get(column).map(String::as_str).unwrap_or("");
            push_cell(&mut html, "td", table.alignment(column), cell);
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}

/// Byte offset of the first cell end tag in `text`, or its length
///
/// Inline constructs in later stages stop here so they never straddle cells.
pub fn cell_limit(text: &str) -> usize {
    ["</td>", "</th>"]
        .iter()
        .filter_map(|tag| text.find(tag))
        .min()
        .unwrap_or(text.len())
}

fn push_cell(html: &mut String, tag: &str, alignment: Alignment, content: &str) {
    match alignment.as_css() {
        Some(align) => {
            html.push_str(&format!("<{tag} style=\"text-align: {align}\">{content}</{tag}>"))
        }
        None => html.push_str(&format!("<{tag}>{content}</{tag}>")),
    }
}
