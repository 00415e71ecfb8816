//! Shareable URL composition.
//!
//! Three URL shapes exist side by side: short-id lookup, inline compressed
//! parameter, and the legacy path-embedded token. The consuming router tells
//! them apart from the URL structure alone via [`classify_share_url`], never
//! by guessing at payload contents.

use crate::error::CostwiseResult;
use crate::report::codec::encode;
use crate::types::{ReportData, StakeholderType};

/// Which of the three shareable URL conventions to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareUrlShape {
    /// `{base}/r/{id}?view={stakeholder}`: short opaque id, resolved via the
    /// report store.
    ShortId(String),
    /// `{base}/report?d={token}&view={stakeholder}`: self-contained token.
    Inline,
    /// `{base}/share/{stakeholder}/{token}`: older path-embedded form, still
    /// produced for consumers that bookmarked the shape.
    Legacy,
}

/// Compose a shareable URL for a report.
///
/// Pure string composition over [`encode`]; the only side effect a caller
/// might pair this with (storing under a short id) happens before the call.
pub fn create_shareable_url(
    base_url: &str,
    report: &ReportData,
    stakeholder: StakeholderType,
    shape: ShareUrlShape,
) -> CostwiseResult<String> {
    let base = base_url.trim_end_matches('/');
    match shape {
        ShareUrlShape::ShortId(id) => Ok(format!("{base}/r/{id}?view={}", stakeholder.as_str())),
        ShareUrlShape::Inline => {
            let token = encode(report)?;
            Ok(format!("{base}/report?d={token}&view={}", stakeholder.as_str()))
        }
        ShareUrlShape::Legacy => {
            let token = encode(report)?;
            Ok(format!("{base}/share/{}/{token}", stakeholder.as_str()))
        }
    }
}

/// The shape a received share URL was built with, with its extracted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareUrlKind {
    /// Short id to resolve against the report store.
    ShortId { id: String },
    /// Inline token to pass to `decode`.
    Inline { token: String },
    /// Legacy path-embedded token plus the stakeholder segment.
    Legacy { stakeholder: String, token: String },
}

/// Classify a share URL by structure alone.
///
/// Returns `None` for URLs that match none of the three conventions; the
/// router treats those as ordinary navigation.
pub fn classify_share_url(url: &str) -> Option<ShareUrlKind> {
    let without_scheme = url.split("://").last().unwrap_or(url);
    let path_and_query = without_scheme.split_once('/').map(|(_, rest)| rest)?;
    let (path, query) = match path_and_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_and_query, None),
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        ["r", id] if !id.is_empty() => Some(ShareUrlKind::ShortId {
            id: (*id).to_string(),
        }),
        ["report"] => {
            let token = query?
                .split('&')
                .find_map(|pair| pair.strip_prefix("d="))?
                .to_string();
            if token.is_empty() {
                return None;
            }
            Some(ShareUrlKind::Inline { token })
        }
        ["share", stakeholder, token] if !token.is_empty() => Some(ShareUrlKind::Legacy {
            stakeholder: (*stakeholder).to_string(),
            token: (*token).to_string(),
        }),
        _ => None,
    }
}
