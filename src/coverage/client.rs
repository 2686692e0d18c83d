use crate::config::Config;
use crate::error::FetchError;
use governor::{
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Transport boundary: one blocking GET returning the page body.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

pub struct CoverageClient {
    agent: ureq::Agent,
    clock: DefaultClock,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl CoverageClient {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build();

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let clock = DefaultClock::default();
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));

        CoverageClient {
            agent,
            clock,
            rate_limiter,
        }
    }

    /// Blocks until the quota allows another request.
    fn pace(&self) {
        while let Err(not_until) = self.rate_limiter.check() {
            thread::sleep(not_until.wait_time_from(self.clock.now()));
        }
    }
}

impl PageFetcher for CoverageClient {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.pace();
        debug!(url, "fetching round page");

        match self.agent.get(url).call() {
            Ok(resp) => resp.into_string().map_err(|e| FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(ureq::Error::Status(code @ (404 | 410), _)) => {
                debug!(url, code, "round page not found");
                Err(FetchError::NotFound {
                    url: url.to_string(),
                })
            }
            Err(ureq::Error::Status(code, _)) => {
                warn!(url, code, "unexpected HTTP status");
                Err(FetchError::Status {
                    url: url.to_string(),
                    code,
                })
            }
            Err(ureq::Error::Transport(e)) => {
                warn!(url, error = %e, "transport failure");
                Err(FetchError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}
