// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Request body parsing into [`FormSubmission`]s.

use crate::form_data::{FormFile, FormSubmission, FormValue};

/// Errors that can occur while parsing a form body.
#[derive(Debug, thiserror::Error)]
pub enum BodyParseError {
    /// The multipart body could not be split into parts.
    #[error("Invalid multipart data: {0}")]
    InvalidMultipart(String),
    /// A non-empty body arrived with a content type that is not form data.
    #[error("Unsupported content type for form data: {0}")]
    UnsupportedContentType(String),
}

/// Parses a form post body, keeping repeated keys and their order.
///
/// Supports `application/x-www-form-urlencoded` and `multipart/form-data`.
/// Multipart parts with a `filename` become [`FormValue::File`]. An empty body
/// of any other type is an empty submission.
pub fn parse_form_body(
    body: &[u8],
    content_type: Option<&str>,
) -> Result<FormSubmission, BodyParseError> {
    let content_type = content_type.unwrap_or("");
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match media_type.as_str() {
        "application/x-www-form-urlencoded" => Ok(parse_form_urlencoded(body)),
        "multipart/form-data" => parse_multipart(body, content_type),
        _ if body.is_empty() => Ok(FormSubmission::new()),
        _ => Err(BodyParseError::UnsupportedContentType(content_type.to_string())),
    }
}

/// Parses `application/x-www-form-urlencoded` bytes.
pub fn parse_form_urlencoded(bytes: &[u8]) -> FormSubmission {
    form_urlencoded::parse(bytes)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn parse_multipart(bytes: &[u8], content_type: &str) -> Result<FormSubmission, BodyParseError> {
    let boundary = header_param(content_type, "boundary")
        .ok_or_else(|| BodyParseError::InvalidMultipart("Missing boundary".to_string()))?;

    let delimiter = format!("--{}", boundary);

    let mut submission = FormSubmission::new();

    for part in split_bytes(bytes, delimiter.as_bytes()) {
        if part.starts_with(b"--") || part.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let part = part.strip_prefix(b"\r\n").unwrap_or(part);

        let Some(idx) = find_bytes(part, b"\r\n\r\n") else {
            return Err(BodyParseError::InvalidMultipart(
                "Part without header terminator".to_string(),
            ));
        };
        let headers = String::from_utf8_lossy(&part[..idx]);
        let content = &part[idx + 4..];
        let content = content.strip_suffix(b"\r\n").unwrap_or(content);

        let Some(name) = disposition_param(&headers, "name") else {
            continue;
        };

        let value = match disposition_param(&headers, "filename") {
            Some(filename) => FormValue::File(FormFile {
                filename,
                content_type: header_value(&headers, "content-type"),
                data: content.to_vec(),
            }),
            None => FormValue::Text(String::from_utf8_lossy(content).into_owned()),
        };
        submission.append(name, value);
    }

    Ok(submission)
}

/// Reads a parameter such as `name="email"` from the Content-Disposition header.
fn disposition_param(headers: &str, param: &str) -> Option<String> {
    let (_, value) = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-disposition"))?;
    header_param(value, param)
}

/// Value of `param` in a `;`-separated header value, unquoted.
///
/// Parameter names match case-insensitively; `;` inside quotes is literal.
fn header_param(value: &str, param: &str) -> Option<String> {
    split_params(value).into_iter().skip(1).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case(param) {
            return None;
        }
        let value = value.trim();
        Some(
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value)
                .to_string(),
        )
    })
}

fn split_params(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

fn header_value(headers: &str, header: &str) -> Option<String> {
    headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case(header) {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn split_bytes<'a>(mut haystack: &'a [u8], needle: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    while let Some(idx) = find_bytes(haystack, needle) {
        parts.push(&haystack[..idx]);
        haystack = &haystack[idx + needle.len()..];
    }
    parts.push(haystack);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencoded_keeps_repeats_in_order() {
        let body = b"tag=rust&title=Hello%20World&tag=web&email=john%40example.com";
        let submission =
            parse_form_body(body, Some("application/x-www-form-urlencoded")).unwrap();

        let keys: Vec<&str> = submission.keys().collect();
        assert_eq!(keys, ["tag", "title", "tag", "email"]);
        assert_eq!(submission.get_text("title"), Some("Hello World"));
        assert_eq!(submission.get_text("email"), Some("john@example.com"));
        assert_eq!(submission.get_all("tag").len(), 2);
    }

    #[test]
    fn test_multipart_text_and_file() {
        let body = concat!(
            "--XyZ\r\n",
            "Content-Disposition: form-data; name=\"title\"\r\n",
            "\r\n",
            "Hello\r\n",
            "--XyZ\r\n",
            "Content-Disposition: form-data; name=\"avatar\"; filename=\"a.txt\"\r\n",
            "Content-Type: text/plain\r\n",
            "\r\n",
            "file body\r\n",
            "--XyZ\r\n",
            "Content-Disposition: form-data; name=\"title\"\r\n",
            "\r\n",
            "Again\r\n",
            "--XyZ--\r\n",
        );

        let submission =
            parse_form_body(body.as_bytes(), Some("multipart/form-data; boundary=XyZ")).unwrap();

        assert_eq!(submission.len(), 3);
        let titles: Vec<&str> = submission
            .get_all("title")
            .into_iter()
            .filter_map(FormValue::as_text)
            .collect();
        assert_eq!(titles, ["Hello", "Again"]);

        match submission.get("avatar") {
            Some(FormValue::File(file)) => {
                assert_eq!(file.filename, "a.txt");
                assert_eq!(file.content_type.as_deref(), Some("text/plain"));
                assert_eq!(file.data, b"file body");
            }
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[test]
    fn test_content_type_is_case_insensitive() {
        let content_type = "Application/X-WWW-Form-Urlencoded; Charset=UTF-8";
        let submission = parse_form_body(b"a=1", Some(content_type)).unwrap();
        assert_eq!(submission.get_text("a"), Some("1"));

        let body = "--AbC\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n--AbC--\r\n";
        let content_type = "Multipart/Form-Data; Boundary=AbC";
        let submission = parse_form_body(body.as_bytes(), Some(content_type)).unwrap();
        assert_eq!(submission.get_text("a"), Some("1"));
    }

    #[test]
    fn test_quoted_semicolon_in_filename() {
        let body = concat!(
            "--b\r\n",
            "content-disposition: form-data; name=\"doc\"; filename=\"a;b.txt\"\r\n",
            "\r\n",
            "x\r\n",
            "--b--\r\n",
        );
        let content_type = "multipart/form-data; boundary=\"b\"";
        let submission = parse_form_body(body.as_bytes(), Some(content_type)).unwrap();
        match submission.get("doc") {
            Some(FormValue::File(file)) => assert_eq!(file.filename, "a;b.txt"),
            other => panic!("expected file, got {:?}", other),
        }
    }

    #[test]
    fn test_multipart_missing_boundary() {
        let result = parse_form_body(b"--x\r\n", Some("multipart/form-data"));
        assert!(matches!(result, Err(BodyParseError::InvalidMultipart(_))));
    }

    #[test]
    fn test_empty_body_without_content_type() {
        assert!(parse_form_body(b"", None).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_content_type() {
        let result = parse_form_body(br#"{"a":1}"#, Some("application/json"));
        assert!(matches!(result, Err(BodyParseError::UnsupportedContentType(_))));
    }
}
