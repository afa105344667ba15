use std::collections::BTreeMap;
use url::Url;

/// Group the decoded query pairs by name, keeping value order per name.
pub fn query_values(url: &Url) -> BTreeMap<String, Vec<String>> {
    let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (k, v) in url.query_pairs() {
        values.entry(k.into_owned()).or_default().push(v.into_owned());
    }
    values
}

/// Replace `param` with its first current value followed by `suffix`.
///
/// An absent parameter is added with `suffix` alone. The query is rebuilt
/// with names in sorted order so the same input always gives the same URL.
pub fn append_to_query_param(base: &Url, param: &str, suffix: &str) -> Url {
    let mut values = query_values(base);
    let current = values
        .get(param)
        .and_then(|vv| vv.first())
        .cloned()
        .unwrap_or_default();

    values.insert(param.to_string(), vec![current + suffix]);

    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(values.iter().flat_map(|(k, vv)| vv.iter().map(move |v| (k, v))));
    url
}
