use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    ResponseError,
};
use dashmap::DashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{config::RateLimitSettings, error::ApiError};

/// Sliding-window request counter keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<IpAddr, Vec<Instant>>>,
    max_requests: usize,
    window: Duration,
    enabled: bool,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            max_requests,
            window,
            enabled: true,
        }
    }

    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self {
            enabled: settings.enabled,
            ..Self::new(settings.max_requests, settings.window())
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn check_rate_limit(&self, ip: IpAddr) -> bool {
        if !self.enabled {
            return true;
        }

        let now = Instant::now();
        let cutoff = now.checked_sub(self.window);

        let mut entry = self.requests.entry(ip).or_insert_with(Vec::new);

        if let Some(cutoff) = cutoff {
            entry.retain(|&timestamp| timestamp > cutoff);
        }

        if entry.len() >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }

    pub fn cleanup_old_entries(&self) {
        let Some(cutoff) = Instant::now().checked_sub(self.window) else {
            return;
        };

        self.requests.retain(|_, timestamps| {
            timestamps.retain(|&timestamp| timestamp > cutoff);
            !timestamps.is_empty()
        });
    }

    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_settings(&RateLimitSettings::default())
    }
}

pub async fn rate_limit_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, actix_web::Error> {
    let limiter = req
        .app_data::<actix_web::web::Data<RateLimiter>>()
        .map(|data| data.get_ref().clone());

    let allowed = match (limiter, req.peer_addr()) {
        (Some(limiter), _) if !limiter.is_enabled() => true,
        (Some(limiter), Some(peer)) => {
            let ip = peer.ip();
            let allowed = limiter.check_rate_limit(ip);
            if !allowed {
                log::warn!("Rate limit exceeded for IP: {}", ip);
            }
            allowed
        }
        (Some(_), None) => {
            log::warn!("Unable to determine client IP for {}", req.path());
            false
        }
        (None, _) => true,
    };

    if !allowed {
        let response = ApiError::RateLimitExceeded.error_response();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}
