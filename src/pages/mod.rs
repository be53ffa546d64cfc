//! Server-rendered pages
//!
//! Three routes make up the user-facing site: a landing page, the location
//! lookup that shows the fire risk for a place, and the live sensor view.

pub mod fire_vulner;
pub mod home;
pub mod location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Location,
    FireVulner,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Home, Route::Location, Route::FireVulner];

    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Location => "/location",
            Route::FireVulner => "/fire-vulner",
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "FireFight",
            Route::Location => "Input Location",
            Route::FireVulner => "DHT11 Sensor Data",
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

/// Escape text for inclusion in HTML element content or attribute values
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wrap a page body in the common document shell. `head` is extra markup
/// placed at the end of `<head>`.
#[must_use]
pub fn layout(route: Route, head: Option<&str>, body: &str) -> String {
    let head = head.map_or_else(String::new, |extra| format!("{extra}\n"));
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n{}</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(route.title()),
        head,
        body
    )
}
