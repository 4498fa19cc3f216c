use std::sync::Arc;

use actix_web::web::Bytes;
use actix_web::{HttpResponse, web};
use tracing::{debug, error, info};

use super::{SiteInfo, bad_request_response, error_response};
use crate::errors::KvLinkerError;
use crate::services::Registrar;

pub struct ShortenService;

impl ShortenService {
    /// `POST /set`：请求体原样作为目标地址，空请求体返回 400
    pub async fn set_url(
        body: Bytes,
        registrar: web::Data<Arc<Registrar>>,
        site: web::Data<SiteInfo>,
    ) -> HttpResponse {
        let target = String::from_utf8_lossy(&body).into_owned();
        let registrar = registrar.get_ref().clone();

        match web::block(move || registrar.assign(&target)).await {
            Ok(Ok(code)) => {
                info!("Assigned short code {}", code);
                HttpResponse::Ok()
                    .insert_header(("Content-Type", "text/plain; charset=utf-8"))
                    .body(site.short_url(&code))
            }
            Ok(Err(KvLinkerError::InvalidTarget(msg))) => {
                debug!("Rejected shorten request: {}", msg);
                bad_request_response("Empty URL")
            }
            Ok(Err(e)) => {
                error!("Failed during HTTP request: {}", e);
                error_response()
            }
            Err(e) => {
                error!("Blocking task failed while assigning code: {}", e);
                error_response()
            }
        }
    }
}
