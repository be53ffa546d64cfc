use super::{Route, layout};

#[must_use]
pub fn render() -> String {
    let body = format!(
        "<h1>FireFight</h1>\n\
         <p>This site uses your FireFight device and location to check the fire vulnerability \
         of the area the sensor is in.</p>\n\
         <p><a href=\"{}\">Check Fire Vulnerability</a></p>\n\
         <p><a href=\"{}\">Live sensor data</a></p>",
        Route::Location.path(),
        Route::FireVulner.path()
    );
    layout(Route::Home, None, &body)
}
