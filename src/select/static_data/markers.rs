//! Content markers for generated-code and lock-file heuristics

/// Case-insensitive substrings that identify tool-generated source files
pub const GENERATED_MARKERS: &[&str] = &[
    "do not edit",
    "@generated",
    "code generated by",
    "auto-generated",
    "autogenerated",
    "automatically generated",
    "this file is generated",
    "this file was generated",
    "<auto-generated",
    "generated by the protocol buffer compiler",
];

/// Case-insensitive tokens found in package-manager lock files
pub const LOCK_SIGNATURES: &[&str] = &[
    "lockfileversion",
    "\"resolved\":",
    "resolved \"",
    "\"integrity\":",
    "integrity sha",
    "# yarn lockfile",
    "# this file is automatically @generated",
    "content-hash",
    "\"_meta\":",
    "\"packages\": {",
    "lock-version",
];
