/// Normalize an absolute URL for deduplication.
///
/// Runs of `/` after the scheme collapse to one, and a trailing slash is
/// removed unless the path is the bare root.
pub fn normalize_url(url: &str) -> String {
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, url),
    };

    let mut collapsed = String::with_capacity(rest.len());
    let mut previous_slash = false;
    for c in rest.chars() {
        if c == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        collapsed.push(c);
    }

    // Keep "host/" but drop the slash from "host/path/"
    let path_start = collapsed.find('/');
    if collapsed.ends_with('/') && path_start != Some(collapsed.len() - 1) {
        collapsed.pop();
    }

    match scheme {
        Some(scheme) => format!("{}://{}", scheme, collapsed),
        None => collapsed,
    }
}

/// Absolute URL of `path` under the given locale, e.g.
/// `https://wordtowallet.com/fr/blog`
pub fn locale_url(base_url: &str, locale: &str, path: &str) -> String {
    normalize_url(&format!("{}/{}/{}", base_url, locale, path))
}

/// Percent-encode a single path segment.
///
/// Everything but ASCII alphanumerics and `*-._` is escaped, so `/`, `?`,
/// `#` and spaces cannot change the shape of the surrounding URL.
pub fn encode_segment(segment: &str) -> String {
    // form encoding writes spaces as '+' and escapes a literal '+' as %2B
    ::url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
