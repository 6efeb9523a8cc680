//! Naming and href formatters used by [`StandardStrategy`](crate::StandardStrategy).

use serde::Deserialize;

use crate::linker::Identifier;

/// Formats attribute or type names.
pub trait NamingFormatter {
    fn format_name(&self, name: &str) -> String;
}

impl<F> NamingFormatter for F
where
    F: Fn(&str) -> String,
{
    fn format_name(&self, name: &str) -> String {
        self(name)
    }
}

/// Common naming conventions.
///
/// Names are split into words on `_`, `-`, and spaces, on lower to upper case
/// transitions, and at the end of acronym runs, so `HTTPServer` is split into
/// `HTTP` and `Server`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// Leaves the name unchanged.
    Identity,
    /// `httpserver`
    Lowercase,
    /// `HTTPSERVER`
    Uppercase,
    /// `http_server`
    SnakeCase,
    /// `HTTP_SERVER`
    ScreamingSnakeCase,
    /// `http-server`
    KebabCase,
    /// `httpServer`
    CamelCase,
    /// `HttpServer`
    PascalCase,
}

impl NamingFormatter for NamingConvention {
    fn format_name(&self, name: &str) -> String {
        match self {
            Self::Identity => name.to_owned(),
            Self::Lowercase => name.to_lowercase(),
            Self::Uppercase => name.to_uppercase(),
            Self::SnakeCase => join_words(name, "_", str::to_lowercase),
            Self::ScreamingSnakeCase => join_words(name, "_", str::to_uppercase),
            Self::KebabCase => join_words(name, "-", str::to_lowercase),
            Self::PascalCase => join_words(name, "", capitalize),
            Self::CamelCase => {
                let mut words = split_words(name).into_iter();
                let mut out = words.next().map(str::to_lowercase).unwrap_or_default();
                for word in words {
                    out.push_str(&capitalize(word));
                }
                out
            },
        }
    }
}

fn join_words(name: &str, sep: &str, map: impl Fn(&str) -> String) -> String {
    let words: Vec<String> = split_words(name).into_iter().map(map).collect();
    words.join(sep)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn split_words(name: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut words = Vec::new();
    let mut start = None;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        if matches!(c, '_' | '-' | ' ') {
            if let Some(s) = start.take() {
                words.push(&name[s..pos]);
            }
            continue;
        }

        if let Some(s) = start
            && c.is_uppercase()
        {
            let prev = chars[i - 1].1;
            let next_lower = chars.get(i + 1).is_some_and(|&(_, n)| n.is_lowercase());

            // `aB` starts a word at `B`, and so does `ABc`
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                words.push(&name[s..pos]);
                start = Some(pos);
            }
        }

        if start.is_none() {
            start = Some(pos);
        }
    }

    if let Some(s) = start {
        words.push(&name[s..]);
    }

    words
}

/// Renders the `href` of a link from the template given on the field.
pub trait HrefFormatter {
    /// Formats the href.
    ///
    /// `owner` is the formatted type name of the record holding the link and
    /// `child` the formatted type name of the link target.
    fn format_href(&self, template: &str, owner: &str, child: &str, ids: &Identifier) -> String;
}

impl<F> HrefFormatter for F
where
    F: Fn(&str, &str, &str, &Identifier) -> String,
{
    fn format_href(&self, template: &str, owner: &str, child: &str, ids: &Identifier) -> String {
        self(template, owner, child, ids)
    }
}

/// Built-in href styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HrefStyle {
    /// Appends the identifiers, separated by commas: `/api/people/1,2`.
    CommaSeparated,
    /// Appends a URL template keyed by the owner and child type names:
    /// `/api/comments/{posts.comments}`.
    TypeBased,
}

impl HrefFormatter for HrefStyle {
    fn format_href(&self, template: &str, owner: &str, child: &str, ids: &Identifier) -> String {
        let base = template.trim_end_matches('/');
        match self {
            Self::CommaSeparated => {
                let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
                format!("{base}/{}", ids.join(","))
            },
            Self::TypeBased => format!("{base}/{{{owner}.{child}}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Value;

    #[test]
    fn split() {
        assert_eq!(split_words("author_id"), ["author", "id"], "underscores");
        assert_eq!(split_words("blog-post title"), ["blog", "post", "title"], "dashes and spaces");
        assert_eq!(split_words("BlogPost"), ["Blog", "Post"], "pascal case");
        assert_eq!(split_words("HTTPServer"), ["HTTP", "Server"], "acronym run");
        assert_eq!(split_words("post2Author"), ["post2", "Author"], "digits");
        assert_eq!(split_words("__id__"), ["id"], "leading and trailing separators");
    }

    #[test]
    fn conventions() {
        let cases = [
            (NamingConvention::Identity, "BlogPost"),
            (NamingConvention::Lowercase, "blogpost"),
            (NamingConvention::Uppercase, "BLOGPOST"),
            (NamingConvention::SnakeCase, "blog_post"),
            (NamingConvention::ScreamingSnakeCase, "BLOG_POST"),
            (NamingConvention::KebabCase, "blog-post"),
            (NamingConvention::CamelCase, "blogPost"),
            (NamingConvention::PascalCase, "BlogPost"),
        ];

        for (convention, expected) in cases {
            assert_eq!(
                convention.format_name("BlogPost"),
                expected,
                "incorrect output for {convention:?}"
            );
        }

        assert_eq!(
            NamingConvention::PascalCase.format_name("author_id"),
            "AuthorId",
            "pascal case from snake case"
        );
        assert_eq!(NamingConvention::CamelCase.format_name(""), "", "empty name");
    }

    #[test]
    fn closure_formatter() {
        let formatter = |name: &str| format!("x-{name}");
        assert_eq!(formatter.format_name("id"), "x-id", "closure must be called");
    }

    #[test]
    fn comma_separated() {
        let single = Identifier::Single(Value::from(1));
        let multiple = Identifier::Multiple(vec![Value::from(1), Value::from("b")]);

        assert_eq!(
            HrefStyle::CommaSeparated.format_href("/api/people", "Post", "Person", &single),
            "/api/people/1",
            "single identifier"
        );
        assert_eq!(
            HrefStyle::CommaSeparated.format_href("/api/comments/", "Post", "Comment", &multiple),
            "/api/comments/1,b",
            "multiple identifiers, trailing slash"
        );
    }

    #[test]
    fn type_based() {
        let ids = Identifier::Multiple(Vec::new());

        assert_eq!(
            HrefStyle::TypeBased.format_href("/api/comments", "posts", "comments", &ids),
            "/api/comments/{posts.comments}",
            "incorrect template"
        );
    }
}
