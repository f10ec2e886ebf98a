//! Deep link routes understood by the demo app.
//!
//! | Link | Plan |
//! |---|---|
//! | `waypoint://` , `waypoint://reset` | reset |
//! | `waypoint://page` | reset, then show page |
//! | `waypoint://events` | events list |
//! | `waypoint://events/<id>` | events list, event detail (id must exist) |

use std::future::Future;
use std::sync::Arc;

use super::navigator::{AppDestination, RootNavigator, StateConfiguration};
use super::service::{EventService, ServiceError};
use crate::deeplink::{DeepLink, DeepLinkError, LinkPlan, LinkRouter, PlanFor};

pub struct AppLinkRouter<S> {
    service: Arc<S>,
}

impl<S> AppLinkRouter<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }
}

impl<S: EventService> LinkRouter for AppLinkRouter<S> {
    type Navigator = RootNavigator;

    fn resolve(
        &self,
        link: &DeepLink,
    ) -> impl Future<Output = Result<PlanFor<RootNavigator>, DeepLinkError>> + Send {
        let route: Vec<String> = link.route().into_iter().map(str::to_string).collect();
        let url = link.as_str().to_string();
        let service = Arc::clone(&self.service);

        async move {
            let route: Vec<&str> = route.iter().map(String::as_str).collect();
            match route.as_slice() {
                [] | ["reset"] => Ok(LinkPlan::TargetStates(vec![StateConfiguration::Reset])),
                ["page"] => Ok(LinkPlan::TargetStates(vec![
                    StateConfiguration::Reset,
                    StateConfiguration::ShowPage,
                ])),
                ["events"] => Ok(LinkPlan::Path(vec![AppDestination::Events].into())),
                ["events", id] => {
                    let event = service.event(id).await.map_err(|err| match err {
                        ServiceError::NotFound { id } => DeepLinkError::Unresolved {
                            target: id,
                            reason: "no such event".to_string(),
                        },
                        ServiceError::Unavailable { reason } => DeepLinkError::Unresolved {
                            target: (*id).to_string(),
                            reason,
                        },
                    })?;
                    Ok(LinkPlan::Path(
                        vec![AppDestination::Events, AppDestination::EventDetail(event.id)].into(),
                    ))
                }
                _ => Err(DeepLinkError::UnknownRoute { url }),
            }
        }
    }
}
