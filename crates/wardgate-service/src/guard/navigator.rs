/// The routing collaborator driven by [`super::RouteGuard`].
pub trait Navigator {
    /// Render the view at `path`.
    fn navigate_to(&mut self, path: &str);

    /// Send the user to `path`. `return_to` is the destination to resume
    /// after login, when there is one.
    fn redirect_to(&mut self, path: &str, return_to: Option<&str>);

    /// Show a loading placeholder instead of any guarded content.
    fn show_placeholder(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Render(String),
    Redirect {
        to: String,
        return_to: Option<String>,
    },
    Placeholder,
}

/// Navigator that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    pub events: Vec<NavigationEvent>,
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&mut self, path: &str) {
        self.events.push(NavigationEvent::Render(path.to_string()));
    }

    fn redirect_to(&mut self, path: &str, return_to: Option<&str>) {
        self.events.push(NavigationEvent::Redirect {
            to: path.to_string(),
            return_to: return_to.map(ToString::to_string),
        });
    }

    fn show_placeholder(&mut self) {
        self.events.push(NavigationEvent::Placeholder);
    }
}
