use crate::fetcher::{
    errors::FetchError,
    types::{Charset, PageResponse},
};
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::{StatusCode, header::HeaderMap};
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

/// Sniff window for in-document charset declarations.
const SNIFF_BYTES: usize = 4096;

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    headers: HeaderMap,
    body_bytes: Bytes,
    content_type: &str,
) -> Result<PageResponse, FetchError> {
    let charset = detect_charset(content_type, &body_bytes);
    let body_utf8 = decode_to_utf8(&body_bytes, &charset, &url_final);

    Ok(PageResponse {
        url_final,
        status,
        headers,
        body_raw: body_bytes,
        body_utf8,
        charset,
        fetched_at: Utc::now(),
    })
}

/// Decodes a JSON endpoint body. The secondary endpoints always answer UTF-8.
pub fn decode_json(body_bytes: &[u8]) -> Result<serde_json::Value, FetchError> {
    serde_json::from_slice(body_bytes).map_err(|e| FetchError::Json(e.to_string()))
}

fn encoding_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let captures = regex.captures(haystack)?;
    let label = captures.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

fn detect_charset(content_type: &str, body_bytes: &[u8]) -> Charset {
    // 1. Content-Type header
    if let Some(encoding) = encoding_from(&CHARSET_REGEX, content_type) {
        return Charset::from_encoding(encoding);
    }

    // 2. <meta charset> or <meta http-equiv> near the top of the document
    let search_bytes = &body_bytes[..body_bytes.len().min(SNIFF_BYTES)];
    let search_str = String::from_utf8_lossy(search_bytes);
    if let Some(encoding) = encoding_from(&META_CHARSET_REGEX, &search_str)
        .or_else(|| encoding_from(&META_HTTP_EQUIV_REGEX, &search_str))
    {
        return Charset::from_encoding(encoding);
    }

    // 3. Heuristic detection
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(search_bytes, false);
    Charset::from_encoding(detector.guess(None, true))
}

/// Decodes the body, replacing malformed sequences. A page with a few bad
/// bytes still yields every field that survived decoding.
fn decode_to_utf8(body_bytes: &[u8], charset: &Charset, url: &Url) -> String {
    let encoding = match charset {
        Charset::Utf8 => encoding_rs::UTF_8,
        Charset::Windows1252 => encoding_rs::WINDOWS_1252,
        Charset::ShiftJis => encoding_rs::SHIFT_JIS,
        Charset::Gb2312 => encoding_rs::GBK,
        Charset::Big5 => encoding_rs::BIG5,
        Charset::Other(name) => Encoding::for_label(name.as_bytes()).unwrap_or(encoding_rs::UTF_8),
    };

    let (decoded, _encoding, had_errors) = encoding.decode(body_bytes);
    if had_errors {
        warn!(%url, encoding = encoding.name(), "body contained malformed sequences");
    }

    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_charset_from_content_type() {
        let charset = detect_charset("text/html; charset=utf-8", b"<html></html>");
        assert!(matches!(charset, Charset::Utf8));
    }

    #[test]
    fn test_detect_charset_from_meta_tag() {
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>Kader</title></head></html>";
        // ISO-8859-1 is mapped to its Windows-1252 superset by encoding_rs
        assert!(matches!(
            detect_charset("text/html", body),
            Charset::Windows1252
        ));
    }

    #[test]
    fn test_detect_charset_from_meta_http_equiv() {
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"></head></html>";
        assert!(matches!(
            detect_charset("text/html", body),
            Charset::Windows1252
        ));
    }

    #[test]
    fn test_unlisted_charset_keeps_encoding_name() {
        let charset = detect_charset("text/html; charset=euc-kr", b"<html></html>");
        assert_eq!(charset, Charset::Other("EUC-KR".to_string()));

        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(decode_to_utf8(b"Seoul", &charset, &url), "Seoul");
    }

    #[test]
    fn test_decode_latin1_club_name() {
        // "Málaga" in Windows-1252
        let body = [0x4d, 0xe1, 0x6c, 0x61, 0x67, 0x61];
        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(
            decode_to_utf8(&body, &Charset::Windows1252, &url),
            "Málaga"
        );
    }

    #[test]
    fn test_decode_replaces_invalid_utf8() {
        let body = [b'O', b'K', 0xff];
        let url = Url::parse("https://example.com").unwrap();
        let decoded = decode_to_utf8(&body, &Charset::Utf8, &url);
        assert!(decoded.starts_with("OK"));
    }

    #[test]
    fn test_decode_json_rejects_html() {
        assert!(matches!(
            decode_json(b"<html></html>"),
            Err(FetchError::Json(_))
        ));
        assert_eq!(
            decode_json(br#"{"transfers":[]}"#).unwrap()["transfers"],
            serde_json::json!([])
        );
    }
}
