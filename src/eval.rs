//! `${...}` expansion for credential options.

/// Expand `text` against the process environment.
pub fn eval_expression(text: &str) -> String {
    eval_with(text, |name| std::env::var(name).ok())
}

/// Expand `${env:NAME}` using `lookup`. Other expressions expand to nothing,
/// an unterminated `${` is kept as is.
pub fn eval_with<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let expr_start = &rest[start + 2..];
        let end = match expr_start.find('}') {
            Some(end) => end,
            None => {
                out.push_str(&rest[start..]);
                return out;
            }
        };

        let expr = &expr_start[..end];
        match expr.strip_prefix("env:") {
            Some(name) => {
                if let Some(value) = lookup(name) {
                    out.push_str(&value);
                }
            }
            None => log::debug!("unsupported expression ${{{}}}", expr),
        }
        rest = &expr_start[end + 1..];
    }

    out.push_str(rest);
    out
}
