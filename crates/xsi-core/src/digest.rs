//! HTTP Digest (RFC 2617, MD5) for device management downloads

use std::collections::HashMap;

/// A parsed `WWW-Authenticate: Digest ...` challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: String,
    pub nonce: String,
    pub opaque: Option<String>,
    pub qop: Option<String>,
    pub algorithm: Option<String>,
}

impl DigestChallenge {
    /// Parse a challenge header value; `None` unless it is a Digest challenge with a nonce
    pub fn parse(header: &str) -> Option<Self> {
        let header = header.trim();
        let (scheme, rest) = header.split_once(char::is_whitespace)?;
        if !scheme.eq_ignore_ascii_case("digest") {
            return None;
        }
        let params = parse_params(rest);
        Some(Self {
            realm: params.get("realm").cloned().unwrap_or_default(),
            nonce: params.get("nonce").cloned()?,
            opaque: params.get("opaque").cloned(),
            qop: params.get("qop").cloned(),
            algorithm: params.get("algorithm").cloned(),
        })
    }

    /// Whether the server offers `qop=auth`
    pub fn offers_auth_qop(&self) -> bool {
        self.qop
            .as_deref()
            .map(|qop| qop.split(',').any(|q| q.trim().eq_ignore_ascii_case("auth")))
            .unwrap_or(false)
    }

    /// `Authorization` header value answering this challenge
    pub fn authorization(
        &self,
        method: &str,
        uri: &str,
        username: &str,
        password: &str,
        cnonce: &str,
        nc: u32,
    ) -> String {
        let ha1 = md5_hex(&format!("{}:{}:{}", username, self.realm, password));
        let ha2 = md5_hex(&format!("{}:{}", method, uri));
        let nc = format!("{:08x}", nc);

        let mut header = format!(
            "Digest username=\"{}\", realm=\"{}\", nonce=\"{}\", uri=\"{}\"",
            username, self.realm, self.nonce, uri
        );

        if self.offers_auth_qop() {
            let response = md5_hex(&format!(
                "{}:{}:{}:{}:auth:{}",
                ha1, self.nonce, nc, cnonce, ha2
            ));
            header.push_str(&format!(
                ", qop=auth, nc={}, cnonce=\"{}\", response=\"{}\"",
                nc, cnonce, response
            ));
        } else {
            let response = md5_hex(&format!("{}:{}:{}", ha1, self.nonce, ha2));
            header.push_str(&format!(", response=\"{}\"", response));
        }

        header.push_str(", algorithm=MD5");
        if let Some(opaque) = &self.opaque {
            header.push_str(&format!(", opaque=\"{}\"", opaque));
        }
        header
    }
}

/// Random client nonce
pub fn cnonce() -> String {
    format!("{:016x}", rand::random::<u64>())
}

fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

// Comma separated `key=value` / `key="quoted, value"` pairs
fn parse_params(input: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let mut chars = input.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace() || *c == ',') {
            chars.next();
        }
        let key: String = chars
            .by_ref()
            .take_while(|c| *c != '=')
            .collect::<String>()
            .trim()
            .to_ascii_lowercase();
        if key.is_empty() {
            break;
        }

        let mut value = String::new();
        if chars.peek() == Some(&'"') {
            chars.next();
            let mut escaped = false;
            for c in chars.by_ref() {
                match c {
                    '\\' if !escaped => escaped = true,
                    '"' if !escaped => break,
                    _ => {
                        value.push(c);
                        escaped = false;
                    }
                }
            }
        } else {
            while let Some(c) = chars.peek() {
                if *c == ',' {
                    break;
                }
                value.push(*c);
                chars.next();
            }
            value = value.trim().to_string();
        }
        params.insert(key, value);
    }
    params
}
