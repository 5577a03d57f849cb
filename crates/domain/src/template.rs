use crate::reload_scope::ReloadScope;

/// Expands a TXT template for one query.
///
/// When the scope carries a base template, it replaces the record's own text
/// unless that text starts with `=`; inside the base template `$=` yields the
/// record's text (or the token when the record has none). `$$` is a literal
/// dollar, `$0`..`$9` are scope variables, and any other `$` is the token.
pub fn expand_txt(template: Option<&str>, token: &str, scope: &ReloadScope) -> Option<String> {
    let record_text = template;
    let base = scope.base_template();

    let template = match base {
        Some(_) if template.is_some_and(|t| t.starts_with('=')) => {
            template.map(|t| &t[1..])
        }
        Some(base) => Some(base),
        None => template,
    }?;

    let mut out = String::with_capacity(template.len() + token.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push('$');
            }
            Some(d @ '0'..='9') => {
                chars.next();
                let index = d as usize - '0' as usize;
                if let Some(value) = scope.variable(index) {
                    out.push_str(value);
                }
            }
            Some('=') if base.is_some() => {
                chars.next();
                out.push_str(record_text.unwrap_or(token));
            }
            _ => out.push_str(token),
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reload_scope::ReloadScopeBuilder;

    fn plain() -> ReloadScope {
        ReloadScope::default()
    }

    fn with_base(base: &str) -> ReloadScope {
        let mut builder = ReloadScopeBuilder::new();
        builder.set_base_template(base);
        builder.freeze(None)
    }

    #[test]
    fn test_absent_template_stays_absent() {
        assert_eq!(expand_txt(None, "127.0.0.2", &plain()), None);
    }

    #[test]
    fn test_text_without_escapes_is_unchanged() {
        let text = "no escapes here: 100% plain";
        assert_eq!(expand_txt(Some(text), "1.2.3.4", &plain()).as_deref(), Some(text));
    }

    #[test]
    fn test_token_and_literal_dollar() {
        let out = expand_txt(Some("This spammer wants some $$$$.  $"), "127.0.0.4", &plain());
        assert_eq!(out.as_deref(), Some("This spammer wants some $$.  127.0.0.4"));
    }

    #[test]
    fn test_trailing_dollar_is_token() {
        assert_eq!(
            expand_txt(Some("listed: $"), "10.0.0.1", &plain()).as_deref(),
            Some("listed: 10.0.0.1")
        );
    }

    #[test]
    fn test_variables() {
        let mut builder = ReloadScopeBuilder::new();
        builder.set_variable(1, "See http://www.example.com/bl").unwrap();
        builder.set_variable(2, "for details").unwrap();
        let scope = builder.freeze(None);

        let out = expand_txt(Some("$1/spammer/$ $2"), "127.0.0.2", &scope);
        assert_eq!(
            out.as_deref(),
            Some("See http://www.example.com/bl/spammer/127.0.0.2 for details")
        );
    }

    #[test]
    fn test_unset_variable_expands_to_nothing() {
        assert_eq!(expand_txt(Some("[$7]"), "x", &plain()).as_deref(), Some("[]"));
    }

    #[test]
    fn test_unknown_escape_falls_back_to_token() {
        assert_eq!(expand_txt(Some("$x"), "tok", &plain()).as_deref(), Some("tokx"));
        assert_eq!(expand_txt(Some("$="), "tok", &plain()).as_deref(), Some("tok="));
    }

    #[test]
    fn test_base_template_wraps_record_text() {
        let scope = with_base("See http://www.example.com/bl?$= ($) for details");
        assert_eq!(
            expand_txt(Some("r123"), "127.0.0.2", &scope).as_deref(),
            Some("See http://www.example.com/bl?r123 (127.0.0.2) for details")
        );
        assert_eq!(
            expand_txt(None, "127.0.0.3", &scope).as_deref(),
            Some("See http://www.example.com/bl?127.0.0.3 (127.0.0.3) for details")
        );
    }

    #[test]
    fn test_leading_equals_bypasses_base_template() {
        let scope = with_base("See http://www.example.com/bl?$= ($) for details");
        assert_eq!(
            expand_txt(Some("=See other blocklists for details about $"), "127.0.0.4", &scope)
                .as_deref(),
            Some("See other blocklists for details about 127.0.0.4")
        );
    }
}
