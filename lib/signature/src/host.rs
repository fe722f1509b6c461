//! Detection of requests addressed to a development host.

use http::header::HOST;
use http::request::Parts;
use std::net::{IpAddr, Ipv6Addr};

/// Returns the host a request was addressed to.
///
/// Prefers the `Host` header and falls back to the URI authority. The port,
/// if any, is included.
#[must_use]
pub fn request_host(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| parts.uri.authority().map(http::uri::Authority::as_str))
        .map(str::trim)
        .filter(|host| !host.is_empty())
}

/// Returns true if `host` names this machine.
///
/// Matches `localhost`, `*.localhost`, loopback IPv4 (`127.0.0.0/8`) and
/// `::1`. A port suffix is ignored. `*.local` is not accepted: mDNS names
/// resolve to other machines on the network.
#[must_use]
pub fn is_local_host(host: &str) -> bool {
    let name = strip_port(host.trim()).trim_end_matches('.').to_ascii_lowercase();

    if name.is_empty() {
        return false;
    }

    if let Ok(ip) = name.parse::<IpAddr>() {
        return match ip {
            IpAddr::V4(v4) => v4.is_loopback(),
            IpAddr::V6(v6) => v6 == Ipv6Addr::LOCALHOST,
        };
    }

    name == "localhost" || name.ends_with(".localhost")
}

fn strip_port(host: &str) -> &str {
    // [::1]:8080
    if let Some(bracketed) = host.strip_prefix('[') {
        return bracketed.split_once(']').map_or(bracketed, |(ip, _)| ip);
    }

    // A bare IPv6 address has more than one colon and no port.
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.bytes().all(|b| b.is_ascii_digit()) => {
            name
        }
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Request;

    #[test]
    fn local_hosts() {
        let cases = [
            ("localhost", true),
            ("localhost:3000", true),
            ("LOCALHOST", true),
            ("app.localhost", true),
            ("127.0.0.1", true),
            ("127.1.2.3:80", true),
            ("[::1]:8080", true),
            ("::1", true),
            ("localhost.", true),
            ("example.com", false),
            ("localhost.example.com", false),
            ("notlocalhost", false),
            ("local", false),
            ("gatehouse.local", false),
            ("gatehouse.local:8443", false),
            ("social.test", false),
            ("localhost.test", false),
            ("10.0.0.1", false),
            ("192.168.1.10:3000", false),
            ("[2001:db8::1]:443", false),
            ("", false),
        ];

        for (host, expected) in cases {
            assert_eq!(is_local_host(host), expected, "{host}");
        }
    }

    #[test]
    fn host_header_wins_over_uri() {
        let (parts, ()) = Request::get("https://public.example/inbox")
            .header(HOST, "localhost:3000")
            .body(())
            .expect("request")
            .into_parts();
        assert_eq!(request_host(&parts), Some("localhost:3000"));
    }

    #[test]
    fn falls_back_to_uri_authority() {
        let (parts, ()) = Request::get("https://public.example/inbox")
            .body(())
            .expect("request")
            .into_parts();
        assert_eq!(request_host(&parts), Some("public.example"));

        let (parts, ()) = Request::get("/inbox").body(()).expect("request").into_parts();
        assert_eq!(request_host(&parts), None);
    }
}
