/// Splits `line` on `delim`, trimming whitespace from each field.
///
/// Empty fields are kept, so `"a  b"` split on `' '` is `["a", "", "b"]` and
/// an empty line is a single empty field.
pub fn split(line: &str, delim: char) -> Vec<&str> {
    line.split(delim).map(str::trim).collect()
}

/// Drops a UTF-8 byte order mark, which can only start line 1.
pub fn strip_bom(number: usize, line: &str) -> &str {
    if number == 1 {
        line.strip_prefix('\u{FEFF}').unwrap_or(line)
    } else {
        line
    }
}

/// Removes a trailing `#` comment.
pub fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(start) => &line[..start],
        None => line,
    }
}

/// The non-empty, space or tab separated fields of a descriptor line, with
/// any comment removed.
pub fn fields(line: &str) -> Vec<&str> {
    split(strip_comment(line), ' ')
        .into_iter()
        .flat_map(|field| split(field, '\t'))
        .filter(|field| !field.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_trims_fields() {
        assert_eq!(split(" v 1.0\t", ' '), vec!["", "v", "1.0"]);
        assert_eq!(split("1/2/3", '/'), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_split_keeps_empty_fields() {
        assert_eq!(split("5//1", '/'), vec!["5", "", "1"]);
        assert_eq!(split("a  b", ' '), vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_empty_line() {
        assert_eq!(split("", ' '), vec![""]);
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom(1, "\u{FEFF}v 1 2 3"), "v 1 2 3");
        assert_eq!(strip_bom(1, "v 1 2 3"), "v 1 2 3");
        assert_eq!(strip_bom(2, "\u{FEFF}v"), "\u{FEFF}v");
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("v 1 1 -1 #Vertex 1"), "v 1 1 -1 ");
        assert_eq!(strip_comment("# only a comment"), "");
        assert_eq!(strip_comment("vt 0.5 0.5"), "vt 0.5 0.5");
    }

    #[test]
    fn test_fields() {
        assert_eq!(
            fields("   v  1.000000\t1.000000 -1.000000 #Vertex 1\r"),
            vec!["v", "1.000000", "1.000000", "-1.000000"]
        );
        assert!(fields("   ").is_empty());
        assert!(fields("#this is a comment").is_empty());
    }
}
