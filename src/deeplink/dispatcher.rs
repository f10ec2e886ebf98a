use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::error::DeepLinkError;
use super::link::DeepLink;
use super::router::{LinkPlan, LinkRouter};
use crate::config::DeepLinkConfig;
use crate::navigation::NavigationStack;

type StackOf<R> = Arc<NavigationStack<<R as LinkRouter>::Navigator>>;

/// Result of a committed deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub url: String,
    /// Path depth after the commit.
    pub depth: usize,
    /// Number of target states applied (0 for a path plan).
    pub applied_states: usize,
}

/// Receives external links and applies them to a navigation stack.
pub struct DeepLinkDispatcher<R: LinkRouter> {
    router: R,
    scheme: String,
    stack: RwLock<Option<StackOf<R>>>,
    pending: Mutex<Option<String>>,
    /// Generation of the newest link that parsed and passed the scheme check.
    started: AtomicU64,
    /// Generation of the last committed link. Held across the commit.
    committed: Mutex<u64>,
}

impl<R: LinkRouter> DeepLinkDispatcher<R> {
    pub fn new(router: R, config: &DeepLinkConfig) -> Self {
        Self {
            router,
            scheme: config.scheme.to_ascii_lowercase(),
            stack: RwLock::new(None),
            pending: Mutex::new(None),
            started: AtomicU64::new(0),
            committed: Mutex::new(0),
        }
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    /// Bind the navigation stack links are applied to.
    pub fn mount(&self, stack: StackOf<R>) {
        *self.stack.write() = Some(stack);
        tracing::debug!("Deep link dispatcher mounted");
    }

    pub fn unmount(&self) {
        *self.stack.write() = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.stack.read().is_some()
    }

    /// Record a link received while the host is still materializing.
    ///
    /// Never touches navigation and does not require a mounted stack. The
    /// link is applied by [`handle_pending`](Self::handle_pending); a later
    /// call replaces an earlier link that was not applied yet.
    pub fn on_appear(&self, url: &str) {
        let previous = self.pending.lock().replace(url.to_string());
        if let Some(previous) = previous {
            tracing::debug!(dropped = %previous, url, "Replacing pending deep link");
        }
    }

    pub fn pending(&self) -> Option<String> {
        self.pending.lock().clone()
    }

    /// Apply the link recorded by [`on_appear`](Self::on_appear).
    ///
    /// Returns `None` when nothing is pending or no stack is mounted yet;
    /// in the latter case the link stays pending.
    pub async fn handle_pending(&self) -> Option<Result<LinkOutcome, DeepLinkError>> {
        if !self.is_mounted() {
            return None;
        }
        let url = self.pending.lock().take()?;
        Some(self.handle(&url).await)
    }

    /// Parse, resolve and commit a link.
    ///
    /// Links that parse and match the scheme are numbered in arrival
    /// order. Commits happen in that order: a link that resolves after a
    /// newer one has already committed is dropped.
    ///
    /// # Errors
    /// Any failure leaves navigation unchanged and never affects other
    /// links in flight. A link overtaken by a newer committed link fails
    /// with [`DeepLinkError::Superseded`].
    pub async fn handle(&self, url: &str) -> Result<LinkOutcome, DeepLinkError> {
        let result = self.dispatch(url).await;

        match &result {
            Ok(outcome) => tracing::info!(
                url,
                depth = outcome.depth,
                applied_states = outcome.applied_states,
                "Deep link applied"
            ),
            Err(err) => tracing::warn!(url, error = %err, "Deep link rejected"),
        }
        result
    }

    async fn dispatch(&self, url: &str) -> Result<LinkOutcome, DeepLinkError> {
        let link = DeepLink::parse(url)?;
        if link.scheme() != self.scheme {
            return Err(DeepLinkError::UnsupportedScheme {
                scheme: link.scheme().to_string(),
                expected: self.scheme.clone(),
            });
        }

        // Fail before resolving when there is nowhere to commit.
        self.mounted()?;
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let plan = self.router.resolve(&link).await?;

        let mut committed = self.committed.lock();
        if *committed > generation {
            tracing::debug!(
                url,
                generation,
                committed = *committed,
                "Dropping overtaken deep link"
            );
            return Err(DeepLinkError::Superseded {
                url: url.to_string(),
            });
        }

        let stack = self.mounted()?;
        *committed = generation;
        let applied_states = match plan {
            LinkPlan::Path(path) => {
                stack.set_path(path);
                0
            }
            LinkPlan::TargetStates(states) => {
                let count = states.len();
                for state in states {
                    stack.apply_target_state(state);
                }
                count
            }
        };

        Ok(LinkOutcome {
            url: url.to_string(),
            depth: stack.depth(),
            applied_states,
        })
    }

    fn mounted(&self) -> Result<StackOf<R>, DeepLinkError> {
        self.stack.read().clone().ok_or(DeepLinkError::NotMounted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigationConfig;
    use crate::deeplink::PlanFor;
    use crate::navigation::{NavigationPath, Navigator};
    use std::future::Future;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    enum Screen {
        Inbox,
        Thread(String),
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Target {
        Reset,
        Inbox,
    }

    struct MailNavigator;

    impl Navigator for MailNavigator {
        type Destination = Screen;
        type TargetState = Target;
        type View = ();

        fn root_view(&self) {}

        fn destination_view(&self, destination: &Screen) {
            match destination {
                Screen::Inbox => {}
                Screen::Thread(_) => {}
            }
        }

        fn target_path(&self, state: &Target) -> Option<NavigationPath<Screen>> {
            match state {
                Target::Reset => Some(NavigationPath::new()),
                Target::Inbox => Some(vec![Screen::Inbox].into()),
            }
        }
    }

    struct MailRouter;

    impl LinkRouter for MailRouter {
        type Navigator = MailNavigator;

        fn resolve(
            &self,
            link: &DeepLink,
        ) -> impl Future<Output = Result<PlanFor<MailNavigator>, DeepLinkError>> + Send {
            let route: Vec<String> = link.route().into_iter().map(str::to_string).collect();
            let url = link.as_str().to_string();
            async move {
                match route.as_slice() {
                    [inbox] if inbox == "inbox" => {
                        Ok(LinkPlan::TargetStates(vec![Target::Reset, Target::Inbox]))
                    }
                    [inbox, id] if inbox == "inbox" => {
                        let delay: u64 = id.parse().unwrap_or(0);
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        Ok(LinkPlan::Path(
                            vec![Screen::Inbox, Screen::Thread(id.clone())].into(),
                        ))
                    }
                    _ => Err(DeepLinkError::UnknownRoute { url }),
                }
            }
        }
    }

    fn mounted_dispatcher() -> (DeepLinkDispatcher<MailRouter>, StackOf<MailRouter>) {
        let dispatcher = DeepLinkDispatcher::new(
            MailRouter,
            &DeepLinkConfig {
                scheme: "mail".to_string(),
            },
        );
        let stack = Arc::new(NavigationStack::new(
            MailNavigator,
            &NavigationConfig::default(),
        ));
        dispatcher.mount(Arc::clone(&stack));
        (dispatcher, stack)
    }

    #[tokio::test]
    async fn target_state_plan_applies_in_order() {
        let (dispatcher, stack) = mounted_dispatcher();
        let outcome = dispatcher.handle("mail://inbox").await.unwrap();
        assert_eq!(outcome.applied_states, 2);
        assert_eq!(outcome.depth, 1);
        assert_eq!(stack.history(), vec![Target::Reset, Target::Inbox]);
    }

    #[tokio::test]
    async fn failures_leave_path_unchanged() {
        let (dispatcher, stack) = mounted_dispatcher();
        dispatcher.handle("mail://inbox/0").await.unwrap();
        let before = stack.path();

        assert!(matches!(
            dispatcher.handle("mail://outbox").await,
            Err(DeepLinkError::UnknownRoute { .. })
        ));
        assert!(matches!(
            dispatcher.handle("http://inbox").await,
            Err(DeepLinkError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            dispatcher.handle("not a link").await,
            Err(DeepLinkError::Malformed { .. })
        ));
        assert_eq!(stack.path(), before);
    }

    #[tokio::test]
    async fn unmounted_dispatcher_reports_not_mounted() {
        let dispatcher = DeepLinkDispatcher::new(
            MailRouter,
            &DeepLinkConfig {
                scheme: "mail".to_string(),
            },
        );
        assert_eq!(
            dispatcher.handle("mail://inbox").await,
            Err(DeepLinkError::NotMounted)
        );
    }

    #[tokio::test]
    async fn on_appear_defers_until_mounted() {
        let dispatcher = DeepLinkDispatcher::new(
            MailRouter,
            &DeepLinkConfig {
                scheme: "mail".to_string(),
            },
        );
        dispatcher.on_appear("mail://inbox/0");
        assert!(dispatcher.handle_pending().await.is_none());
        assert_eq!(dispatcher.pending().as_deref(), Some("mail://inbox/0"));

        let stack = Arc::new(NavigationStack::new(
            MailNavigator,
            &NavigationConfig::default(),
        ));
        dispatcher.mount(Arc::clone(&stack));

        let outcome = dispatcher.handle_pending().await.unwrap().unwrap();
        assert_eq!(outcome.depth, 2);
        assert!(dispatcher.pending().is_none());
        assert!(dispatcher.handle_pending().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_link_supersedes_slow_resolution() {
        let (dispatcher, stack) = mounted_dispatcher();

        let (slow, fast) = tokio::join!(
            dispatcher.handle("mail://inbox/500"),
            dispatcher.handle("mail://inbox/10"),
        );

        assert!(matches!(slow, Err(DeepLinkError::Superseded { .. })));
        assert!(fast.is_ok());
        assert_eq!(
            stack.path().last(),
            Some(&Screen::Thread("10".to_string()))
        );
    }
}
