//! HTML fixture served at the root path

use crate::server::codes::CodeSet;
use chrono::NaiveDateTime;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn code_lines(codes: &[String], class: &str) -> String {
  codes
    .iter()
    .map(|code| format!(r#"<div class="code {}">{}</div>"#, class, code))
    .collect::<Vec<_>>()
    .join("\n    ")
}

/// Render the page for `codes`, stamped with `updated`
pub fn render_page(codes: &CodeSet, updated: NaiveDateTime) -> String {
  format!(
    r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Test SHiFT Codes - Borderlands 4</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        h1 {{ color: #007cba; }}
        .code {{
            background: #f0f0f0;
            padding: 10px;
            margin: 10px 0;
            border-left: 4px solid #007cba;
            font-family: monospace;
            font-size: 16px;
        }}
        .new {{ border-left-color: #28a745; }}
        .expired {{ border-left-color: #dc3545; }}
    </style>
</head>
<body>
    <h1>Test SHiFT Codes for Borderlands 4</h1>
    <p>This is a test page for notification testing with randomly generated codes.</p>

    <h2>Active Codes</h2>
    {active}

    <h2>Expired Codes (for reference)</h2>
    {expired}

    <p><em>Updated: {updated} (codes regenerated on each request)</em></p>
</body>
</html>
"#,
    active = code_lines(&codes.active, "new"),
    expired = code_lines(&codes.expired, "expired"),
    updated = updated.format(TIMESTAMP_FORMAT),
  )
}
