use super::{Route, escape_html, layout};
use crate::sensor::SensorSnapshot;

/// Refresh the page on the same cadence the sensor is polled
#[must_use]
pub fn render(snapshot: &SensorSnapshot, refresh_seconds: u64) -> String {
    let mut body = String::from("<h1>DHT11 Sensor Data</h1>\n");

    if let Some(error) = &snapshot.error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
    }

    match &snapshot.reading {
        Some(reading) => body.push_str(&format!(
            "<div>\n<p>Temperature: {}°C</p>\n<p>Humidity: {}%</p>\n</div>\n",
            reading.temperature, reading.humidity
        )),
        None => body.push_str("<p>Loading...</p>\n"),
    }

    let refresh = format!("<meta http-equiv=\"refresh\" content=\"{refresh_seconds}\">");
    layout(Route::FireVulner, Some(&refresh), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SensorReading;

    #[test]
    fn test_loading_before_first_reading() {
        let page = render(&SensorSnapshot::default(), 5);
        assert!(page.contains("Loading..."));
        assert!(page.contains("<meta http-equiv=\"refresh\" content=\"5\">\n</head>"));
    }

    #[test]
    fn test_reading_and_error_are_shown() {
        let snapshot = SensorSnapshot {
            reading: Some(SensorReading {
                temperature: 27.5,
                humidity: 31.0,
            }),
            error: Some("Error fetching data".to_string()),
        };
        let page = render(&snapshot, 5);
        assert!(page.contains("Temperature: 27.5°C"));
        assert!(page.contains("Humidity: 31%"));
        assert!(page.contains("Error fetching data"));
        assert!(!page.contains("Loading..."));
    }
}
