//! Line codec for RF2 text files: TAB separated fields, CRLF terminated lines.

/// Field separator.
pub const TAB: char = '\t';

/// Line terminator written to every produced file.
pub const CRLF: &str = "\r\n";

/// One record of a content file, fields in header order.
pub type Row = Vec<String>;

/// Serialize a row (or header) into a single terminated line.
#[must_use]
pub fn new_line<S: AsRef<str>>(values: &[S]) -> String {
    let capacity = values.iter().map(|v| v.as_ref().len() + 1).sum::<usize>() + 1;
    let mut line = String::with_capacity(capacity);
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            line.push(TAB);
        }
        line.push_str(value.as_ref());
    }
    line.push_str(CRLF);
    line
}

/// Split a raw line into fields, ignoring a trailing `\n` or `\r\n`.
///
/// Empty trailing fields are kept, so `"a\t\t"` yields three fields.
#[must_use]
pub fn split_line(line: &str) -> Row {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.split(TAB).map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_line_joins_with_tab_and_crlf() {
        assert_eq!(new_line(&["100005", "", "1"]), "100005\t\t1\r\n");
    }

    #[test]
    fn test_split_line_keeps_empty_fields() {
        assert_eq!(split_line("100005\t\t1\r\n"), vec!["100005", "", "1"]);
        assert_eq!(split_line("a\tb\n"), vec!["a", "b"]);
        assert_eq!(split_line("a\t\t"), vec!["a", "", ""]);
    }

    #[test]
    fn test_split_inverts_new_line() {
        let row = vec![
            "1000015".to_owned(),
            "20200131".to_owned(),
            "term with spaces".to_owned(),
        ];
        assert_eq!(split_line(&new_line(&row)), row);
    }
}
