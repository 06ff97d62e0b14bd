/// Block stage: headings, horizontal rules, blockquotes and lists
use crate::ast::{Heading, ListRun};
use crate::parser::{
    is_thematic_break, parse_atx_heading, parse_list_item, strip_blockquote_marker,
};

pub fn render_blocks(text: &str) -> String {
    let mut output: Vec<String> = Vec::new();
    let mut run: Option<ListRun> = None;

    for line in text.split('\n') {
        if !is_thematic_break(line)
            && let Some((kind, item)) = parse_list_item(line)
        {
            // A different kind of item starts a sibling list
            let same_kind = run.as_ref().is_some_and(|current| current.kind == kind);
            if !same_kind && let Some(finished) = run.take() {
                output.push(render_list(&finished));
            }
            run.get_or_insert_with(|| ListRun::new(kind))
                .items
                .push(item.to_string());
            continue;
        }

        // Anything else, blank lines included, ends the current list
        if let Some(finished) = run.take() {
            output.push(render_list(&finished));
        }
        output.push(render_line(line));
    }

    if let Some(finished) = run.take() {
        output.push(render_list(&finished));
    }

    output.join("\n")
}

fn render_line(line: &str) -> String {
    if let Some(heading) = parse_atx_heading(line) {
        return render_heading(&heading);
    }
    if is_thematic_break(line) {
        return "<hr>".to_string();
    }
    if let Some(quote) = strip_blockquote_marker(line) {
        return format!("<blockquote>{quote}</blockquote>");
    }
    line.to_string()
}

pub fn render_heading(heading: &Heading) -> String {
    format!(
        "<h{level}>{text}</h{level}>",
        level = heading.level,
        text = heading.text
    )
}

pub fn render_list(run: &ListRun) -> String {
    let tag = run.kind.tag();
    let items: String = run
        .items
        .iter()
        .map(|item| format!("<li>{item}</li>"))
        .collect();
    format!("<{tag}>{items}</{tag}>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_headings() {
        assert_eq!(render_blocks("# One"), "<h1>One</h1>");
        assert_eq!(render_blocks("###### Six"), "<h6>Six</h6>");
        assert_eq!(render_blocks("####### Seven"), "####### Seven");
        assert_eq!(render_blocks("## Title ##"), "<h2>Title ##</h2>");
    }

    #[test]
    fn test_horizontal_rules() {
        assert_eq!(render_blocks("---\n***"), "<hr>\n<hr>");
    }

    #[test]
    fn test_blockquotes_are_not_merged() {
        assert_eq!(
            render_blocks("&gt; first\n&gt; second"),
            "<blockquote>first</blockquote>\n<blockquote>second</blockquote>"
        );
    }

    #[test]
    fn test_unordered_run() {
        assert_eq!(
            render_blocks("* a\n- b\n* c"),
            "<ul><li>a</li><li>b</li><li>c</li></ul>"
        );
    }

    #[test]
    fn test_ordered_run() {
        assert_eq!(
            render_blocks("1. First\n2. Second"),
            "<ol><li>First</li><li>Second</li></ol>"
        );
    }

    #[test]
    fn test_blank_line_breaks_run() {
        assert_eq!(
            render_blocks("* a\n\n* b"),
            "<ul><li>a</li></ul>\n\n<ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_kinds_are_not_merged() {
        assert_eq!(
            render_blocks("* a\n1. b"),
            "<ul><li>a</li></ul>\n<ol><li>b</li></ol>"
        );
    }

    #[test]
    fn test_text_between_lists() {
        assert_eq!(
            render_blocks("- a\nplain\n- b"),
            "<ul><li>a</li></ul>\nplain\n<ul><li>b</li></ul>"
        );
    }

    #[test]
    fn test_formatted_list_item() {
        assert_eq!(
            render_blocks("* <strong>x</strong>"),
            "<ul><li><strong>x</strong></li></ul>"
        );
    }
}
