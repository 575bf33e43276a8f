/// Split `input` at commas that are outside double quotes and `[...]`.
///
/// Pieces are trimmed; empty pieces are dropped. A quote preceded by a
/// backslash does not toggle quoting.
pub fn split_top_level(input: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut prev = None;
    let mut start = 0;

    for (idx, ch) in input.char_indices() {
        match ch {
            '"' if prev != Some('\\') => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes => depth = depth.saturating_sub(1),
            ',' if !in_quotes && depth == 0 => {
                push_piece(&mut pieces, &input[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
        prev = Some(ch);
    }
    push_piece(&mut pieces, &input[start..]);
    pieces
}

fn push_piece<'a>(pieces: &mut Vec<&'a str>, piece: &'a str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        pieces.push(piece);
    }
}

/// Byte index of the first `=` outside double quotes and `[...]`.
pub(super) fn find_top_level_eq(input: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut prev = None;

    for (idx, ch) in input.char_indices() {
        match ch {
            '"' if prev != Some('\\') => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes => depth = depth.saturating_sub(1),
            '=' if !in_quotes && depth == 0 => return Some(idx),
            _ => {}
        }
        prev = Some(ch);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a=1, b=2", vec!["a=1", "b=2"])]
    #[case("outputs+=[type=html,path=out.html], x=1", vec!["outputs+=[type=html,path=out.html]", "x=1"])]
    #[case(r#"title="a, b", n=2"#, vec![r#"title="a, b""#, "n=2"])]
    #[case(r#"q="say \"hi, there\"",z=0"#, vec![r#"q="say \"hi, there\"""#, "z=0"])]
    #[case(" , a=1 ,, ", vec!["a=1"])]
    #[case("", vec![])]
    fn test_split_top_level(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_top_level(input), expected);
    }

    #[test]
    fn test_find_top_level_eq_skips_nested() {
        assert_eq!(find_top_level_eq("a.b+=1"), Some(4));
        assert_eq!(find_top_level_eq(r#""k=v"=1"#), Some(5));
        assert_eq!(find_top_level_eq("[a=1]"), None);
    }
}
