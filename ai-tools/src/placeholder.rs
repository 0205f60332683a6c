//! Positional placeholder substitution: `{0}`, `{1}`, ... replaced by caller arguments.

/// Replaces every occurrence of `{i}` with `args[i]`, one index at a time in argument order.
///
/// Each pass runs over the output of the previous one, so an argument that itself contains a
/// higher-numbered placeholder is substituted by the later pass. Placeholders without an
/// argument stay as written; arguments without a placeholder are ignored.
pub fn substitute<S: AsRef<str>>(text: &str, args: &[S]) -> String {
    args.iter()
        .enumerate()
        .fold(text.to_string(), |acc, (i, arg)| {
            acc.replace(&format!("{{{}}}", i), arg.as_ref())
        })
}
