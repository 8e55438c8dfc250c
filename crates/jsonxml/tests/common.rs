#![allow(missing_docs, dead_code)]

/// A service configuration document touching every mapping rule.
pub const CONFIG: &str = r#"
{
    "service": {
        "name": "ingest",
        "replicas": 3,
        "ratio": 0.75,
        "enabled": true,
        "owner": null
    },
    "ports": [
        8080,
        8443
    ],
    "routes": [
        {
            "path": "/a",
            "methods": ["GET", "POST"]
        },
        {
            "path": "/b&c",
            "methods": []
        }
    ],
    "matrix": [
        [1, 2],
        [3]
    ],
    "notes": "<none>"
}
"#;

/// The same document in relaxed syntax: comments and unquoted names.
pub const CONFIG_RELAXED: &str = r#"
// generated
{
    service: {
        name: "ingest", replicas: 3, ratio: 0.75, enabled: true, owner: null
    },
    ports: [8080, 8443], /* two listeners */
    routes: [
        {path: "/a", methods: ["GET", "POST"]},
        {path: "/b&c", methods: []}
    ],
    matrix: [[1, 2], [3]],
    notes: "<none>"
}
"#;

/// Newline delimited records.
pub const RECORDS: &str = "{\"id\": 1, \"tag\": \"x\"}\n{\"id\": 2}\n\"loose\"\n";
