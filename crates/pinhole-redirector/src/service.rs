use std::sync::Arc;

use crate::classifier::WootheeClassifier;
use crate::redirector::{RedirectOutcome, RedirectRequest, Redirector};
use crate::Result;
use async_trait::async_trait;
use pinhole_core::gate::authorize;
use pinhole_core::policy::evaluate;
use pinhole_core::resolver::resolve;
use pinhole_core::{
    Access, Clock, Credential, DeviceClassifier, LinkStatus, Repository, ShortCode, SystemClock,
};
use tracing::{debug, trace};

/// Service for handling redirects.
///
/// Reads the record, checks expiry and quota, applies the password gate,
/// picks the target and counts the click. The click is only counted once
/// every check has passed.
#[derive(Clone)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
    classifier: Arc<dyn DeviceClassifier>,
    clock: Arc<dyn Clock>,
}

impl<R> std::fmt::Debug for RedirectorService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectorService").finish_non_exhaustive()
    }
}

impl<R: Repository> RedirectorService<R> {
    /// Creates a service with the woothee classifier and the system clock.
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            classifier: Arc::new(WootheeClassifier::new()),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_classifier(mut self, classifier: impl DeviceClassifier) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }
}

#[async_trait]
impl<R: Repository> Redirector for RedirectorService<R> {
    async fn redirect(
        &self,
        code: &ShortCode,
        request: RedirectRequest,
    ) -> Result<RedirectOutcome> {
        trace!(code = %code, "resolving short code");

        let Some(record) = self.repository.get(code).await? else {
            trace!(code = %code, "short code not found");
            return Ok(RedirectOutcome::NotFound);
        };

        match evaluate(&record, self.clock.now()) {
            LinkStatus::Usable => {}
            LinkStatus::Expired => {
                debug!(code = %code, "link expired");
                return Ok(RedirectOutcome::Expired);
            }
            LinkStatus::Exhausted => {
                debug!(code = %code, clicks = record.clicks, "click quota reached");
                return Ok(RedirectOutcome::Exhausted);
            }
        }

        let credential = match &request.password {
            None => Credential::NotCarried,
            Some(submitted) => Credential::Carried(submitted.as_deref()),
        };
        match authorize(&record, credential) {
            Access::Allow => {}
            Access::PasswordRequired => return Ok(RedirectOutcome::PasswordRequired),
            Access::Denied => {
                debug!(code = %code, "incorrect password");
                return Ok(RedirectOutcome::Denied);
            }
        }

        let device = self.classifier.classify(request.user_agent.as_deref());
        let target = resolve(&record, device, request.country.as_deref()).to_owned();

        let Some(clicks) = self.repository.increment_clicks(code).await? else {
            return Ok(RedirectOutcome::NotFound);
        };

        debug!(code = %code, url = %target, device = %device, clicks, "resolved short code");
        Ok(RedirectOutcome::Redirect { target, clicks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::{date, DateTime};
    use pinhole_core::{CountryRedirects, DeviceClass, ExpiryDate, ReadRepository, ShortLinkRecord};
    use pinhole_storage::InMemoryRepository;

    struct FixedClock(DateTime);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime {
            self.0
        }
    }

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    fn noon() -> DateTime {
        date(2030, 6, 1).at(12, 0, 0, 0)
    }

    async fn setup(
        rec: ShortLinkRecord,
    ) -> (Arc<InMemoryRepository>, RedirectorService<InMemoryRepository>) {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert(&code("abc123"), rec).await.unwrap();
        let service = RedirectorService::new(Arc::clone(&repo))
            .with_clock(FixedClock(noon()))
            .with_classifier(|ua: Option<&str>| match ua {
                Some("phone") => DeviceClass::Mobile,
                Some("pc") => DeviceClass::Desktop,
                _ => DeviceClass::Other,
            });
        (repo, service)
    }

    fn visit() -> RedirectRequest {
        RedirectRequest::default()
    }

    async fn clicks(repo: &InMemoryRepository) -> u64 {
        repo.get(&code("abc123")).await.unwrap().unwrap().clicks
    }

    #[tokio::test]
    async fn redirect_counts_clicks() {
        let (repo, service) = setup(ShortLinkRecord::new("https://example.com")).await;

        let outcome = service.redirect(&code("abc123"), visit()).await.unwrap();
        assert_eq!(
            outcome,
            RedirectOutcome::Redirect {
                target: "https://example.com".into(),
                clicks: 1
            }
        );
        assert_eq!(clicks(&repo).await, 1);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let (_, service) = setup(ShortLinkRecord::new("https://example.com")).await;
        let outcome = service.redirect(&code("nope"), visit()).await.unwrap();
        assert_eq!(outcome, RedirectOutcome::NotFound);
    }

    #[tokio::test]
    async fn quota_blocks_after_max_clicks() {
        let mut rec = ShortLinkRecord::new("https://example.com");
        rec.max_clicks = Some(2);
        let (repo, service) = setup(rec).await;

        for expected in 1..=2 {
            let outcome = service.redirect(&code("abc123"), visit()).await.unwrap();
            assert!(
                matches!(outcome, RedirectOutcome::Redirect { clicks, .. } if clicks == expected)
            );
        }
        let outcome = service.redirect(&code("abc123"), visit()).await.unwrap();
        assert_eq!(outcome, RedirectOutcome::Exhausted);
        assert_eq!(clicks(&repo).await, 2);
    }

    #[tokio::test]
    async fn expiry_is_strictly_after() {
        let mut rec = ShortLinkRecord::new("https://example.com");
        rec.expiry_date = Some(ExpiryDate::from(noon()));
        let (_, service) = setup(rec).await;
        assert!(matches!(
            service.redirect(&code("abc123"), visit()).await.unwrap(),
            RedirectOutcome::Redirect { .. }
        ));

        let mut rec = ShortLinkRecord::new("https://example.com");
        rec.expiry_date = Some(ExpiryDate::from(date(2030, 6, 1).at(11, 59, 59, 0)));
        let (repo, service) = setup(rec).await;
        assert_eq!(
            service.redirect(&code("abc123"), visit()).await.unwrap(),
            RedirectOutcome::Expired
        );
        assert_eq!(clicks(&repo).await, 0);
    }

    #[tokio::test]
    async fn password_gate() {
        let mut rec = ShortLinkRecord::new("https://example.com");
        rec.password = Some("secret".into());
        let (repo, service) = setup(rec).await;

        let prompt = service.redirect(&code("abc123"), visit()).await.unwrap();
        assert_eq!(prompt, RedirectOutcome::PasswordRequired);

        let wrong = RedirectRequest {
            password: Some(Some("Secret".into())),
            ..visit()
        };
        assert_eq!(
            service.redirect(&code("abc123"), wrong).await.unwrap(),
            RedirectOutcome::Denied
        );

        let missing = RedirectRequest {
            password: Some(None),
            ..visit()
        };
        assert_eq!(
            service.redirect(&code("abc123"), missing).await.unwrap(),
            RedirectOutcome::Denied
        );
        assert_eq!(clicks(&repo).await, 0);

        let right = RedirectRequest {
            password: Some(Some("secret".into())),
            ..visit()
        };
        assert!(matches!(
            service.redirect(&code("abc123"), right).await.unwrap(),
            RedirectOutcome::Redirect { clicks: 1, .. }
        ));
    }

    #[tokio::test]
    async fn expired_beats_password_prompt() {
        let mut rec = ShortLinkRecord::new("https://example.com");
        rec.password = Some("secret".into());
        rec.max_clicks = Some(1);
        rec.clicks = 1;
        let (_, service) = setup(rec).await;

        assert_eq!(
            service.redirect(&code("abc123"), visit()).await.unwrap(),
            RedirectOutcome::Exhausted
        );
    }

    #[tokio::test]
    async fn country_and_device_targets() {
        let mut rec = ShortLinkRecord::new("https://example.com");
        rec.mobile_url = Some("https://m.example.com".into());
        rec.desktop_url = Some("https://desk.example.com".into());
        rec.country_redirect =
            Some(CountryRedirects::parse("US=https://us.x.com;IN=https://in.x.com").redirects);
        let (_, service) = setup(rec).await;

        let target = |outcome: RedirectOutcome| match outcome {
            RedirectOutcome::Redirect { target, .. } => target,
            other => panic!("expected redirect, got {other:?}"),
        };

        let india = RedirectRequest {
            user_agent: Some("phone".into()),
            country: Some("in".into()),
            ..visit()
        };
        assert_eq!(
            target(service.redirect(&code("abc123"), india).await.unwrap()),
            "https://in.x.com"
        );

        let france_phone = RedirectRequest {
            user_agent: Some("phone".into()),
            country: Some("FR".into()),
            ..visit()
        };
        assert_eq!(
            target(service.redirect(&code("abc123"), france_phone).await.unwrap()),
            "https://m.example.com"
        );

        let desktop = RedirectRequest {
            user_agent: Some("pc".into()),
            ..visit()
        };
        assert_eq!(
            target(service.redirect(&code("abc123"), desktop).await.unwrap()),
            "https://desk.example.com"
        );

        assert_eq!(
            target(service.redirect(&code("abc123"), visit()).await.unwrap()),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn concurrent_redirects_count_every_click() {
        let (repo, service) = setup(ShortLinkRecord::new("https://example.com")).await;
        let service = Arc::new(service);

        let mut handles = vec![];
        for _ in 0..100 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.redirect(&code("abc123"), visit()).await.unwrap()
            }));
        }
        for handle in handles {
            assert!(matches!(
                handle.await.unwrap(),
                RedirectOutcome::Redirect { .. }
            ));
        }
        assert_eq!(clicks(&repo).await, 100);
    }
}
