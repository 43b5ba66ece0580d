//! Named controller/action registry.
//!
//! A request path `controller/action` names an action; a bare `controller`
//! names that controller's default action. Names match ignoring ASCII case.

use std::collections::HashMap;
use std::sync::Arc;

use crate::content::source::ControllerRegistry;
use crate::content::{Content, ContentError};
use crate::http::request::Request;

pub type Action = Arc<dyn Fn(&Request) -> Result<Content, ContentError> + Send + Sync>;

#[derive(Default)]
struct Controller {
    name: String,
    actions: HashMap<String, Action>,
    default_action: Option<String>,
}

/// Controllers keyed by lower-cased name.
#[derive(Default)]
pub struct ActionRegistry {
    controllers: HashMap<String, Controller>,
    primary: Option<String>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `controller/action`, creating the controller if needed.
    pub fn action<F>(mut self, controller: &str, action: &str, handler: F) -> Self
    where
        F: Fn(&Request) -> Result<Content, ContentError> + Send + Sync + 'static,
    {
        self.controller_mut(controller)
            .actions
            .insert(action.to_ascii_lowercase(), Arc::new(handler));
        self
    }

    /// Sets the action a bare controller path runs.
    pub fn default_action(mut self, controller: &str, action: &str) -> Self {
        self.controller_mut(controller).default_action = Some(action.to_string());
        self
    }

    /// Makes `controller` answer the empty path with its default action.
    pub fn primary_controller(mut self, controller: &str) -> Self {
        self.controller_mut(controller);
        self.primary = Some(controller.to_ascii_lowercase());
        self
    }

    fn controller_mut(&mut self, name: &str) -> &mut Controller {
        self.controllers
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| Controller {
                name: name.to_string(),
                ..Controller::default()
            })
    }

    fn lookup(&self, controller: &str, action: &str) -> Option<&Action> {
        self.controllers
            .get(&controller.to_ascii_lowercase())?
            .actions
            .get(&action.to_ascii_lowercase())
    }

    /// Splits a request path into the controller/action pair it names.
    fn route<'a>(&'a self, path: &'a str) -> Option<(&'a str, &'a str)> {
        let path = path.trim_end_matches('/');
        let (controller, action) = match path.split_once('/') {
            Some((controller, action)) if !action.contains('/') => (controller, action),
            Some(_) => return None,
            None => {
                let default = self
                    .controllers
                    .get(&path.to_ascii_lowercase())?
                    .default_action
                    .as_deref()?;
                (path, default)
            }
        };

        self.lookup(controller, action)
            .map(|_| (controller, action))
    }
}

impl ControllerRegistry for ActionRegistry {
    fn primary(&self) -> Option<&str> {
        self.primary
            .as_ref()
            .and_then(|key| self.controllers.get(key))
            .map(|c| c.name.as_str())
    }

    fn primary_action(&self) -> Option<&str> {
        self.primary
            .as_ref()
            .and_then(|key| self.controllers.get(key))
            .and_then(|c| c.default_action.as_deref())
    }

    fn action_exists(&self, request: &Request) -> bool {
        self.route(&request.path).is_some()
    }

    fn request_primary(&self, request: &Request) -> Result<Content, ContentError> {
        let controller = self
            .primary()
            .ok_or_else(|| ContentError::Configuration("Primary Controller Not Defined".into()))?;
        let action = self
            .primary_action()
            .ok_or_else(|| ContentError::Configuration("Primary Action Not Defined".into()))?;
        self.request_action(controller, action, request)
    }

    fn request_action(
        &self,
        controller: &str,
        action: &str,
        request: &Request,
    ) -> Result<Content, ContentError> {
        let handler = self
            .lookup(controller, action)
            .ok_or_else(|| ContentError::NotFound(format!("{}/{}", controller, action)))?;

        tracing::debug!(controller, action, path = %request.path, "Dispatching action");
        handler(request)
    }

    fn request_path_action(&self, request: &Request) -> Result<Content, ContentError> {
        let (controller, action) = self
            .route(&request.path)
            .ok_or_else(|| ContentError::NotFound(request.path.clone()))?;
        self.request_action(controller, action, request)
    }
}
