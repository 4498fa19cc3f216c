use actix_web::{HttpResponse, Responder, web};

use super::SiteInfo;

pub struct IndexService;

impl IndexService {
    pub async fn index(site: web::Data<SiteInfo>) -> impl Responder {
        HttpResponse::Ok()
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body(usage_text(&site.public_url))
    }
}

/// 使用说明页面
pub fn usage_text(base: &str) -> String {
    format!(
        r#"
Usage:
{base}/ -- this page
{base}/set -- POST URL to shorten, answer will be shortened URL
    Payload (plain text):
        http(s)://your.url/you/want/to/shorten
    Answer (plain text):
        {base}/ShtndURL
{base}/<shortened_URL> -- expand the URL
{base}/<shortened_URL>/stat -- get stats for the URL
"#
    )
}
