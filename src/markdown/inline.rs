use crate::model::Run;

/// Style inherited from the paragraph kind; emphasis markers add to it.
pub(super) struct BaseStyle<'a> {
    pub(super) font_size: f32,
    pub(super) font_name: &'a str,
    pub(super) bold: bool,
    pub(super) color: Option<[u8; 3]>,
}

fn make_run(text: &str, base: &BaseStyle, bold: bool, italic: bool) -> Run {
    Run {
        text: text.to_string(),
        font_size: base.font_size,
        font_name: base.font_name.to_string(),
        bold: base.bold || bold,
        italic,
        color: base.color,
        field_code: None,
    }
}

fn flush_literal(runs: &mut Vec<Run>, literal: &mut String, base: &BaseStyle) {
    if !literal.is_empty() {
        runs.push(make_run(literal, base, false, false));
        literal.clear();
    }
}

/// Split `**bold**` and `*italic*` spans into separate runs. Unterminated
/// or empty markers stay literal text, as does an opener followed by
/// whitespace (so a lone `*` never pairs with a later marker).
pub(super) fn styled_runs(text: &str, base: &BaseStyle) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(i) = rest.find('*') {
        let (before, marked) = rest.split_at(i);
        literal.push_str(before);

        if let Some(after_marker) = marked.strip_prefix("**") {
            if !after_marker.starts_with(char::is_whitespace)
                && let Some(end) = after_marker.find("**")
                && end > 0
            {
                flush_literal(&mut runs, &mut literal, base);
                runs.push(make_run(&after_marker[..end], base, true, false));
                rest = &after_marker[end + 2..];
                continue;
            }
            literal.push_str("**");
            rest = after_marker;
        } else {
            let after_marker = &marked[1..];
            if !after_marker.starts_with(char::is_whitespace)
                && let Some(end) = after_marker.find('*')
                && end > 0
            {
                flush_literal(&mut runs, &mut literal, base);
                runs.push(make_run(&after_marker[..end], base, false, true));
                rest = &after_marker[end + 1..];
                continue;
            }
            literal.push('*');
            rest = after_marker;
        }
    }

    literal.push_str(rest);
    flush_literal(&mut runs, &mut literal, base);
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseStyle<'static> {
        BaseStyle {
            font_size: 10.5,
            font_name: "Helvetica",
            bold: false,
            color: None,
        }
    }

    fn texts(runs: &[Run]) -> Vec<(&str, bool, bool)> {
        runs.iter()
            .map(|r| (r.text.as_str(), r.bold, r.italic))
            .collect()
    }

    #[test]
    fn plain_text_is_one_run() {
        let runs = styled_runs("just words", &base());
        assert_eq!(texts(&runs), vec![("just words", false, false)]);
    }

    #[test]
    fn bold_span_splits_runs() {
        let runs = styled_runs("a **strong** tail", &base());
        assert_eq!(
            texts(&runs),
            vec![("a ", false, false), ("strong", true, false), (" tail", false, false)]
        );
    }

    #[test]
    fn italic_span_splits_runs() {
        let runs = styled_runs("*em* rest", &base());
        assert_eq!(texts(&runs), vec![("em", false, true), (" rest", false, false)]);
    }

    #[test]
    fn unterminated_marker_stays_literal() {
        let runs = styled_runs("lone * star and **half", &base());
        assert_eq!(texts(&runs), vec![("lone * star and **half", false, false)]);
    }

    #[test]
    fn spaced_stars_are_not_emphasis() {
        let runs = styled_runs("2 * 3 * 4", &base());
        assert_eq!(texts(&runs), vec![("2 * 3 * 4", false, false)]);
    }

    #[test]
    fn heading_base_bold_is_preserved_inside_italic() {
        let mut b = base();
        b.bold = true;
        let runs = styled_runs("top *slanted*", &b);
        assert_eq!(texts(&runs), vec![("top ", true, false), ("slanted", true, true)]);
    }

    #[test]
    fn adjacent_punctuation_keeps_no_phantom_space() {
        let runs = styled_runs("**bold**, then", &base());
        assert_eq!(texts(&runs), vec![("bold", true, false), (", then", false, false)]);
    }
}
