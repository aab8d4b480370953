//! `{{ name }}` placeholder substitution.
//!
//! Supported filters: `lower`, `upper`. Undefined variables are errors,
//! never empty strings.

use std::sync::OnceLock;

use regex_lite::Regex;

use super::{TemplateError, TemplateVars};

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\|\s*([A-Za-z_]+)\s*)?\}\}").unwrap()
    })
}

fn apply_filter(template: &str, value: &str, filter: &str) -> Result<String, TemplateError> {
    match filter {
        "lower" => Ok(value.to_lowercase()),
        "upper" => Ok(value.to_uppercase()),
        other => Err(TemplateError::UnknownFilter {
            template: template.to_string(),
            filter: other.to_string(),
        }),
    }
}

/// Literal text between placeholders must not open another one.
fn check_literal(name: &str, source: &str, start: usize, end: usize) -> Result<(), TemplateError> {
    match source[start..end].find("{{") {
        Some(offset) => Err(TemplateError::Parse {
            template: name.to_string(),
            reason: format!("invalid placeholder at byte {}", start + offset),
        }),
        None => Ok(()),
    }
}

/// Substitute every placeholder in `source` from `vars`.
pub fn render_placeholders(
    name: &str,
    source: &str,
    vars: &TemplateVars,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(source.len());
    let mut last = 0;

    for caps in placeholder_re().captures_iter(source) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        let var = &caps[1];

        check_literal(name, source, last, whole.start)?;

        let value = vars.get(var).ok_or_else(|| TemplateError::MissingVariable {
            template: name.to_string(),
            variable: var.to_string(),
        })?;
        let value = match caps.get(2) {
            Some(filter) => apply_filter(name, value, filter.as_str())?,
            None => value.clone(),
        };

        out.push_str(&source[last..whole.start]);
        out.push_str(&value);
        last = whole.end;
    }

    check_literal(name, source, last, source.len())?;
    out.push_str(&source[last..]);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> TemplateVars {
        [
            ("product", "Fake"),
            ("version", "99.0a1"),
            ("locale", "en-US"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(render_placeholders("t", "target_info.txt", &vars()).unwrap(), "target_info.txt");
    }

    #[test]
    fn test_substitution_and_filters() {
        let rendered = render_placeholders(
            "t",
            "{{ product|lower }}-{{version}}.{{ locale }}.{{ product | upper }}",
            &vars(),
        )
        .unwrap();
        assert_eq!(rendered, "fake-99.0a1.en-US.FAKE");
    }

    #[test]
    fn test_missing_variable() {
        let err = render_placeholders("dest", "{{ branch }}/x", &vars()).unwrap_err();
        match err {
            TemplateError::MissingVariable { template, variable } => {
                assert_eq!(template, "dest");
                assert_eq!(variable, "branch");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_filter() {
        let err = render_placeholders("t", "{{ product|title }}", &vars()).unwrap_err();
        assert!(matches!(err, TemplateError::UnknownFilter { ref filter, .. } if filter == "title"));
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = render_placeholders("t", "{{ product }}/{{ version", &vars()).unwrap_err();
        assert!(matches!(err, TemplateError::Parse { .. }));
    }
}
