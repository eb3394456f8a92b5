use std::collections::{BTreeMap, HashMap};

/// Read access to the host's current variable values.
pub trait VariableSource {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl VariableSource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl VariableSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<S: VariableSource + ?Sized> VariableSource for &S {
    fn lookup(&self, name: &str) -> Option<&str> {
        (**self).lookup(name)
    }
}

/// Replaces `$name` and `${name}` references in `template`.
///
/// Unknown variables are left exactly as written, so `"$selected"` with no
/// `selected` variable stays `"$selected"`. A `:format` suffix inside braces is
/// accepted and ignored.
pub fn interpolate<S: VariableSource + ?Sized>(template: &str, vars: &S) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        // `consumed` counts bytes after the `$`.
        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => {
                    let inner = &braced[..end];
                    let name = inner.split(':').next().unwrap_or(inner);
                    (name, end + 2)
                }
                None => ("", 0),
            },
            None => {
                let end = after
                    .find(|c: char| !is_name_char(c))
                    .unwrap_or(after.len());
                (&after[..end], end)
            }
        };

        let raw = &rest[pos..pos + 1 + consumed];
        let resolved = if name.is_empty() {
            None
        } else {
            vars.lookup(name)
        };
        out.push_str(resolved.unwrap_or(raw));
        rest = &rest[pos + 1 + consumed..];
    }

    out.push_str(rest);
    out
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::interpolate;
    use std::collections::BTreeMap;

    fn vars() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("selected".to_string(), "site-7".to_string()),
            ("region".to_string(), "north".to_string()),
        ])
    }

    #[test]
    fn replaces_plain_and_braced_references() {
        let v = vars();
        assert_eq!(interpolate("$selected", &v), "site-7");
        assert_eq!(interpolate("${selected}", &v), "site-7");
        assert_eq!(interpolate("${region:raw}-$selected!", &v), "north-site-7!");
    }

    #[test]
    fn unknown_variables_are_left_verbatim() {
        let v = vars();
        assert_eq!(interpolate("$missing", &v), "$missing");
        assert_eq!(interpolate("${missing}", &v), "${missing}");
        assert_eq!(interpolate("$selected_id", &v), "$selected_id");
    }

    #[test]
    fn stray_dollars_pass_through() {
        let v = vars();
        assert_eq!(interpolate("cost: $ 5", &v), "cost: $ 5");
        assert_eq!(interpolate("${unterminated", &v), "${unterminated");
        assert_eq!(interpolate("${}", &v), "${}");
        assert_eq!(interpolate("$$selected", &v), "$site-7");
        assert_eq!(interpolate("", &v), "");
    }
}
