use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::{error, trace};

use super::{SiteInfo, error_response, not_found_response};
use crate::services::{LinkStats, StatsEngine};
use crate::utils::is_valid_short_code;

pub struct StatService;

impl StatService {
    pub async fn url_stat(
        path: web::Path<String>,
        stats: web::Data<Arc<StatsEngine>>,
        site: web::Data<SiteInfo>,
    ) -> HttpResponse {
        let code = path.into_inner();

        if !is_valid_short_code(&code) {
            trace!("Invalid short code rejected: {}", &code);
            return not_found_response();
        }

        let stats = stats.get_ref().clone();
        match web::block(move || stats.stat(&code)).await {
            Ok(Ok(link_stats)) => HttpResponse::Ok()
                .insert_header(("Content-Type", "text/html; charset=utf-8"))
                .body(render_stats(&site, &link_stats)),
            Ok(Err(e)) if e.is_not_found() => not_found_response(),
            Ok(Err(e)) => {
                error!("Failed to get URL and stats: {}", e);
                error_response()
            }
            Err(e) => {
                error!("Blocking task failed during stat lookup: {}", e);
                error_response()
            }
        }
    }
}

/// 渲染统计信息 HTML 片段
pub fn render_stats(site: &SiteInfo, stats: &LinkStats) -> String {
    format!(
        "\nShortened URL: {}<br>\nReal URL: {}<br>\nOverall hits: {}<br>\nWeekly hits: {}<br>\n24h hits: {}<br>\n",
        escape_html(&site.short_url(&stats.code)),
        escape_html(&stats.target),
        stats.overall,
        stats.week_count,
        stats.day_count
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stats() {
        let site = SiteInfo::new("http://localhost:8077");
        let stats = LinkStats {
            code: "abcd".to_string(),
            target: "https://example.com/?a=1&b=<2>".to_string(),
            overall: 5,
            week_count: 3,
            day_count: 1,
        };
        let html = render_stats(&site, &stats);
        assert!(html.contains("Shortened URL: http://localhost:8077/abcd<br>"));
        assert!(html.contains("Real URL: https://example.com/?a=1&amp;b=&lt;2&gt;<br>"));
        assert!(html.contains("Overall hits: 5<br>"));
        assert!(html.contains("Weekly hits: 3<br>"));
        assert!(html.contains("24h hits: 1<br>"));
    }
}
