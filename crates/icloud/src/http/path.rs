//! Endpoint resolution against the client's base URL.

use url::Url;

/// Join `endpoint` onto the path of `base` and normalize the result.
///
/// `"."` segments, empty segments, and trailing slashes are dropped; `".."`
/// removes the previous segment but never climbs above the root. A query
/// string on `endpoint` replaces any query on `base`.
pub(crate) fn resolve(base: &Url, endpoint: &str) -> Url {
    let (path, query) = match endpoint.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (endpoint, None),
    };

    let mut url = base.clone();
    url.set_path(&clean(base.path(), path));
    url.set_query(query);
    url
}

fn clean(base: &str, endpoint: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in base.split('/').chain(endpoint.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut out = String::with_capacity(base.len() + endpoint.len() + 1);
    for segment in &segments {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}
