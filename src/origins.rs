use crate::constants::limits::HOST_MAX_LEN;
use std::ops::Range;

/// Named allowlist shapes, from trivial to pathological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginFamily {
    /// One exact origin.
    Single,
    /// Three base domains, each as wildcard subdomain, explicit port and bare origin.
    Multiple,
    /// Two origins whose hosts are 253 octets of single-character labels.
    Pathological,
    /// Hundreds of generated origins plus a handful of deep wildcard patterns.
    Many,
    /// The universal wildcard.
    Any,
}

/// Every origin family, generated once during harness setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginSets {
    single: Vec<String>,
    multiple: Vec<String>,
    pathological: Vec<String>,
    many: Vec<String>,
    any: Vec<String>,
}

impl OriginSets {
    pub fn generate(many_range: Range<usize>) -> Self {
        Self {
            single: vec!["https://example.com".to_string()],
            multiple: multiple_origins(),
            pathological: vec![pathological_origin('a'), pathological_origin('b')],
            many: many_origins(many_range),
            any: vec!["*".to_string()],
        }
    }

    pub fn get(&self, family: OriginFamily) -> &[String] {
        match family {
            OriginFamily::Single => &self.single,
            OriginFamily::Multiple => &self.multiple,
            OriginFamily::Pathological => &self.pathological,
            OriginFamily::Many => &self.many,
            OriginFamily::Any => &self.any,
        }
    }
}

fn multiple_origins() -> Vec<String> {
    ["net", "org", "com"]
        .into_iter()
        .flat_map(|tld| {
            [
                format!("https://*.example.{tld}"),
                format!("https://example.{tld}:8080"),
                format!("https://example.{tld}"),
            ]
        })
        .collect()
}

/// Host made of `first` followed by `.a` until it is exactly [`HOST_MAX_LEN`] octets.
pub fn pathological_host(first: char) -> String {
    let mut host = String::with_capacity(HOST_MAX_LEN);
    host.push(first);
    host.push_str(&".a".repeat(HOST_MAX_LEN / 2));
    host
}

pub fn pathological_origin(first: char) -> String {
    format!("https://{}", pathological_host(first))
}

/// Sibling of the pathological allowlist entries that matches neither of them.
pub fn pathological_request_origin() -> String {
    pathological_origin('c')
}

const MANY_WILDCARD_PORTS: [&str; 4] = ["", ":6060", ":7070", ":9090"];

fn many_origins(range: Range<usize>) -> Vec<String> {
    let mut origins = Vec::with_capacity(range.len() * 12 + MANY_WILDCARD_PORTS.len());

    for i in range {
        for port in ["", ":7070", ":8080", ":9090"] {
            origins.push(format!("https://{i}.example.com{port}"));
        }
        for port in ["", ":6060", ":7070", ":9090"] {
            origins.push(format!("https://{i}.foo.example.com{port}"));
        }
        for port in ["", ":6060", ":7070", ":9090"] {
            origins.push(format!("https://{i}.foo.bar.example.com{port}"));
        }
    }

    for port in MANY_WILDCARD_PORTS {
        origins.push(format!("https://*.foo.bar.example.com{port}"));
    }

    origins
}

#[cfg(test)]
#[path = "origins_test.rs"]
mod origins_test;
