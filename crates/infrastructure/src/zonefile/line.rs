use std::sync::Arc;

/// What a single trimmed zone-file line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Comment,
    /// Directive body with its marker removed, e.g. `SOA ...`, `1 text`, `= template`.
    Directive(&'a str),
    /// `:A[:TXT]` default line, without the leading colon.
    Defaults(&'a str),
    /// Record line with any trailing comment removed.
    Record(&'a str),
}

const TWO_CHAR_DIRECTIVES: [&str; 3] = ["#$", ";#", ":$"];

pub fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Blank;
    }
    if let Some(rest) = line.strip_prefix('$') {
        return LineKind::Directive(rest);
    }
    if TWO_CHAR_DIRECTIVES.iter().any(|m| line.starts_with(m)) {
        return LineKind::Directive(&line[2..]);
    }
    if let Some(rest) = line.strip_prefix(':') {
        return LineKind::Defaults(rest);
    }
    if line.starts_with('#') {
        return LineKind::Comment;
    }

    let line = cut_at(line, '#');
    let line = cut_at(line, ';').trim();
    if line.is_empty() {
        LineKind::Comment
    } else {
        LineKind::Record(line)
    }
}

fn cut_at(line: &str, marker: char) -> &str {
    match line.find(marker) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Key and payload of one record line after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec<'a> {
    pub key: &'a str,
    pub excluded: bool,
    pub a: Arc<str>,
    pub txt: Option<Arc<str>>,
}

/// Splits a record line into key and value spec.
///
/// `key` alone takes both defaults; `key :A` sets A only; `key :A:TXT` sets
/// both, and an empty TXT there disables the text for this record; any other
/// value is the TXT with the default A. A bare number below 256 as A means
/// `127.0.0.<n>`.
pub fn split_record<'a>(
    line: &'a str,
    default_a: &Arc<str>,
    default_txt: Option<&Arc<str>>,
) -> RecordSpec<'a> {
    let (key, rest) = match line.split_once(char::is_whitespace) {
        Some((key, rest)) => (key, rest.trim_start()),
        None => (line, ""),
    };
    let (key, excluded) = match key.strip_prefix('!') {
        Some(key) => (key, true),
        None => (key, false),
    };

    let mut a_part: Option<&str> = None;
    let mut txt_part: Option<&str> = None;
    let mut txt_disabled = false;

    if let Some(value) = rest.strip_prefix(':') {
        match value.split_once(':') {
            Some((a, txt)) => {
                a_part = Some(a);
                if txt.trim().is_empty() {
                    txt_disabled = true;
                } else {
                    txt_part = Some(txt);
                }
            }
            None => a_part = Some(value),
        }
    } else if !rest.is_empty() {
        txt_part = Some(rest);
    }

    let a = match a_part.map(str::trim).filter(|a| !a.is_empty()) {
        Some(a) => expand_short_a(a),
        None => default_a.clone(),
    };
    let txt = match txt_part {
        Some(txt) => Some(Arc::from(txt)),
        None if txt_disabled => None,
        None => default_txt.cloned(),
    };

    RecordSpec {
        key,
        excluded,
        a,
        txt,
    }
}

/// `5` → `127.0.0.5`; anything else is kept as written.
pub(crate) fn expand_short_a(a: &str) -> Arc<str> {
    match a.parse::<u16>() {
        Ok(n) if n < 256 => Arc::from(format!("127.0.0.{n}")),
        _ => Arc::from(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> (Arc<str>, Arc<str>) {
        (Arc::from("127.0.0.2"), Arc::from("listed $"))
    }

    #[test]
    fn test_classify_markers() {
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify("$SOA 1 a b"), LineKind::Directive("SOA 1 a b"));
        assert_eq!(classify("#$NS 900 ns1"), LineKind::Directive("NS 900 ns1"));
        assert_eq!(classify(";#TTL 1h"), LineKind::Directive("TTL 1h"));
        assert_eq!(classify(":$1 text"), LineKind::Directive("1 text"));
        assert_eq!(classify(":127.0.0.3:txt"), LineKind::Defaults("127.0.0.3:txt"));
        assert_eq!(classify("# comment"), LineKind::Comment);
        assert_eq!(classify("; comment"), LineKind::Comment);
        assert_eq!(classify("1.2.3.4 ; why"), LineKind::Record("1.2.3.4"));
        assert_eq!(classify("1.2.3.4 text # note"), LineKind::Record("1.2.3.4 text"));
    }

    #[test]
    fn test_split_bare_key_uses_defaults() {
        let (a, txt) = defaults();
        let spec = split_record("127.0.0.4", &a, Some(&txt));
        assert_eq!(spec.key, "127.0.0.4");
        assert_eq!(&*spec.a, "127.0.0.2");
        assert_eq!(spec.txt.as_deref(), Some("listed $"));
        assert!(!spec.excluded);
    }

    #[test]
    fn test_split_short_a_keeps_default_txt() {
        let (a, txt) = defaults();
        let spec = split_record("127.0.0.5 :5", &a, Some(&txt));
        assert_eq!(&*spec.a, "127.0.0.5");
        assert_eq!(spec.txt.as_deref(), Some("listed $"));
    }

    #[test]
    fn test_split_empty_txt_disables_text() {
        let (a, txt) = defaults();
        let spec = split_record("127.0.0.6 :6:", &a, Some(&txt));
        assert_eq!(&*spec.a, "127.0.0.6");
        assert_eq!(spec.txt, None);
    }

    #[test]
    fn test_split_plain_value_is_txt() {
        let (a, txt) = defaults();
        let spec = split_record("127.0.0.7 IP address $ running an open relay", &a, Some(&txt));
        assert_eq!(&*spec.a, "127.0.0.2");
        assert_eq!(spec.txt.as_deref(), Some("IP address $ running an open relay"));
    }

    #[test]
    fn test_split_full_a_and_txt() {
        let (a, _) = defaults();
        let spec = split_record("!10.0.0.0/8 :127.0.0.9:private: $", &a, None);
        assert!(spec.excluded);
        assert_eq!(spec.key, "10.0.0.0/8");
        assert_eq!(&*spec.a, "127.0.0.9");
        assert_eq!(spec.txt.as_deref(), Some("private: $"));
    }

    #[test]
    fn test_split_empty_a_falls_back() {
        let (a, _) = defaults();
        let spec = split_record("spam.example ::some text", &a, None);
        assert_eq!(&*spec.a, "127.0.0.2");
        assert_eq!(spec.txt.as_deref(), Some("some text"));
    }
}
