//! Caller address and user agent, as recorded on audit entries.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

use keygate_service::ClientInfo;

/// Source address and `User-Agent` of the caller.
#[derive(Debug, Clone)]
pub struct ClientMeta(pub ClientInfo);

impl ClientMeta {
    /// Consumes the extractor.
    pub fn into_inner(self) -> ClientInfo {
        self.0
    }
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(ClientInfo {
            ip_address: client_ip(parts),
            user_agent: user_agent(parts).unwrap_or_default(),
        }))
    }
}

/// First `X-Forwarded-For` hop, else the socket peer, else `"unknown"`.
pub(crate) fn client_ip(parts: &Parts) -> String {
    let forwarded = parts
        .headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }
    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub(crate) fn user_agent(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn test_forwarded_header_wins() {
        let mut p = parts(
            Request::builder()
                .header("x-forwarded-for", "10.0.0.1, 172.16.0.1")
                .header("user-agent", "ModMenu/1.0")
                .body(())
                .unwrap(),
        );
        p.extensions
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(client_ip(&p), "10.0.0.1");
        assert_eq!(user_agent(&p).as_deref(), Some("ModMenu/1.0"));
    }

    #[test]
    fn test_falls_back_to_peer_then_unknown() {
        let mut p = parts(Request::builder().body(()).unwrap());
        assert_eq!(client_ip(&p), "unknown");
        p.extensions
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 9], 4000))));
        assert_eq!(client_ip(&p), "192.168.1.9");
        assert!(user_agent(&p).is_none());
    }
}
