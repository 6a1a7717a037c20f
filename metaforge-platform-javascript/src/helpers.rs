//! Native template helpers shipped with the JavaScript platform.

use handlebars::handlebars_helper;

handlebars_helper!(json: |value: Json| serde_json::to_string(value).unwrap_or_default());

handlebars_helper!(lower_first: |s: str| {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect::<String>(),
        None => String::new(),
    }
});

handlebars_helper!(upper_first: |s: str| {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    }
});
