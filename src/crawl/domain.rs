// src/crawl/domain.rs
// =============================================================================
// Decides whether a discovered link is "on the same site" as the seed URL.
//
// Two hosts count as the same domain when:
// - they are equal ("example.com" vs "example.com"), or
// - one is a dot-suffix of the other ("blog.example.com" vs "example.com",
//   in either direction)
//
// Limitation: this is a plain suffix check, not a public-suffix-list lookup.
// "a.co.uk" and "co.uk" match, and so do "x.github.io" and "github.io".
// =============================================================================

use url::Url;

// Returns true if both URLs parse, both have a host, and the hosts are the
// same or one is a subdomain of the other
pub fn same_domain(url_a: &str, url_b: &str) -> bool {
    let (host_a, host_b) = match (host_of(url_a), host_of(url_b)) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };

    host_a == host_b || is_subdomain_of(&host_a, &host_b) || is_subdomain_of(&host_b, &host_a)
}

fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

// "blog.example.com" is a subdomain of "example.com"; "badexample.com" is not
fn is_subdomain_of(host: &str, parent: &str) -> bool {
    host.len() > parent.len()
        && host.ends_with(parent)
        && host.as_bytes()[host.len() - parent.len() - 1] == b'.'
}
