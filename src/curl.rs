//! cURL interchange for request descriptors

use crate::constants::JSON_CONTENT_TYPE;
use crate::models::{HttpMethod, RequestDescriptor};
use anyhow::{anyhow, Result};
use base64::Engine;

/// Parse a cURL command into a RequestDescriptor
pub fn parse_curl(input: &str) -> Result<RequestDescriptor> {
    let mut request = RequestDescriptor::default();
    
    // Remove line continuations and normalize
    let normalized = input
        .replace("\\\n", " ")
        .replace("\\\r\n", " ");
    
    let mut tokens = tokenize(&normalized)?;
    
    // Skip 'curl' command if present
    if tokens.first().map(|s| s.as_str()) == Some("curl") {
        tokens.remove(0);
    }
    
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        let arg = tokens.get(i + 1);

        match (token.as_str(), arg) {
            ("-X" | "--request", Some(method)) => {
                request.method = parse_method(method)?;
                i += 1;
            }
            ("-H" | "--header", Some(header)) => {
                let (key, value) = parse_header(header)?;
                request.headers.push(key, value);
                i += 1;
            }
            ("-d" | "--data" | "--data-raw" | "--data-binary", Some(data)) => {
                request.raw_body = data.clone();
                request.use_raw_body = true;
                // Infer POST if not set
                if request.method == HttpMethod::GET {
                    request.method = HttpMethod::POST;
                }
                i += 1;
            }
            ("-u" | "--user", Some(credentials)) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(credentials);
                request.headers.push("Authorization", format!("Basic {}", encoded));
                i += 1;
            }
            ("--url", Some(url)) => {
                request.url = url.clone();
                i += 1;
            }
            ("--compressed" | "-k" | "--insecure" | "-L" | "--location" | "-s" | "--silent" | "-v" | "--verbose", _) => {
                // Ignored flags
            }
            _ => {
                if !token.starts_with('-') && (token.starts_with("http://") || token.starts_with("https://")) {
                    request.url = token.clone();
                }
            }
        }
        i += 1;
    }

    if request.url.is_empty() {
        return Err(anyhow!("No URL found in cURL command"));
    }

    Ok(request)
}

fn parse_method(s: &str) -> Result<HttpMethod> {
    s.parse::<HttpMethod>().map_err(|e| anyhow!(e))
}

fn parse_header(s: &str) -> Result<(String, String)> {
    match s.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(anyhow!("Invalid header format: {}", s)),
    }
}

/// Tokenize a curl command, respecting quotes
fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut escape_next = false;
    
    for c in input.chars() {
        if escape_next {
            current.push(c);
            escape_next = false;
            continue;
        }
        
        match c {
            '\\' if !in_single_quote => {
                escape_next = true;
            }
            '\'' if !in_double_quote => {
                in_single_quote = !in_single_quote;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
            }
            ' ' | '\t' | '\n' if !in_single_quote && !in_double_quote => {
                if !current.is_empty() {
                    tokens.push(current.clone());
                    current.clear();
                }
            }
            _ => {
                current.push(c);
            }
        }
    }
    
    if in_single_quote || in_double_quote {
        return Err(anyhow!("Unterminated quote in cURL command"));
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    
    Ok(tokens)
}

/// Format the request that would actually be sent as a cURL command
pub fn to_curl(request: &RequestDescriptor) -> String {
    let mut parts = vec!["curl".to_string()];

    // Method
    if request.method != HttpMethod::GET {
        parts.push(format!("-X {}", request.method.as_str()));
    }

    // URL
    parts.push(quote(request.url.trim()));

    // Headers
    for header in request.headers.non_empty() {
        parts.push(format!("-H {}", quote(&format!("{}: {}", header.key.trim(), header.value))));
    }

    // Body
    if request.method.has_body() {
        if request.use_raw_body {
            if !request.raw_body.is_empty() {
                parts.push(format!("-d {}", quote(&request.raw_body)));
            }
        } else {
            let object = request.body.to_object();
            if !object.is_empty() {
                if request.header("Content-Type").is_none() {
                    parts.push(format!("-H {}", quote(&format!("Content-Type: {}", JSON_CONTENT_TYPE))));
                }
                if let Ok(json) = serde_json::to_string(&object) {
                    parts.push(format!("-d {}", quote(&json)));
                }
            }
        }
    }

    parts.join(" \\\n  ")
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_get() {
        let curl = "curl https://api.example.com/users";
        let req = parse_curl(curl).unwrap();
        assert_eq!(req.url, "https://api.example.com/users");
        assert_eq!(req.method, HttpMethod::GET);
        assert!(req.headers.is_empty());
    }

    #[test]
    fn test_parse_post_with_data() {
        let curl = r#"curl -X POST -H "Content-Type: application/json" -d '{"name":"test"}' https://api.example.com/users"#;
        let req = parse_curl(curl).unwrap();
        assert_eq!(req.method, HttpMethod::POST);
        assert!(req.use_raw_body);
        assert_eq!(req.raw_body, r#"{"name":"test"}"#);
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_parse_infers_post_and_basic_auth() {
        let curl = "curl -u user:pass \\\n  --data 'x=1' 'https://api.example.com/login'";
        let req = parse_curl(curl).unwrap();
        assert_eq!(req.method, HttpMethod::POST);
        assert_eq!(req.url, "https://api.example.com/login");
        assert_eq!(req.header("Authorization"), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_curl("curl -X FETCH https://api.example.com").is_err());
        assert!(parse_curl("curl -H 'no-colon' https://api.example.com").is_err());
        assert!(parse_curl("curl -s").is_err());
        assert!(parse_curl("curl 'https://api.example.com").is_err());
    }

    #[test]
    fn test_to_curl_structured_body() {
        let mut req = RequestDescriptor {
            url: String::from("https://example.test/items"),
            method: HttpMethod::POST,
            ..RequestDescriptor::default()
        };
        req.headers.push("Accept", "application/json");
        req.headers.append();
        req.body.push("a", "1");

        assert_eq!(
            to_curl(&req),
            "curl \\\n  -X POST \\\n  'https://example.test/items' \\\n  -H 'Accept: application/json' \\\n  -H 'Content-Type: application/json' \\\n  -d '{\"a\":\"1\"}'"
        );
    }

    #[test]
    fn test_to_curl_padded_content_type_not_duplicated() {
        let mut req = RequestDescriptor {
            url: String::from("https://example.test/items"),
            method: HttpMethod::POST,
            ..RequestDescriptor::default()
        };
        req.headers.push(" Content-Type", "text/plain");
        req.body.push("a", "1");

        let curl = to_curl(&req);
        assert_eq!(curl.matches("Content-Type").count(), 1);
        assert!(curl.contains("-H 'Content-Type: text/plain'"));
    }

    #[test]
    fn test_to_curl_get_omits_body() {
        let mut req = RequestDescriptor {
            url: String::from("https://example.test/items"),
            ..RequestDescriptor::default()
        };
        req.body.push("a", "1");
        assert_eq!(to_curl(&req), "curl \\\n  'https://example.test/items'");
    }

    #[test]
    fn test_raw_body_survives_export_and_import() {
        let req = RequestDescriptor {
            url: String::from("https://example.test/items"),
            method: HttpMethod::PUT,
            raw_body: String::from("it's raw"),
            use_raw_body: true,
            ..RequestDescriptor::default()
        };
        let parsed = parse_curl(&to_curl(&req)).unwrap();
        assert_eq!(parsed.method, HttpMethod::PUT);
        assert_eq!(parsed.raw_body, "it's raw");
    }
}
