use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};

/// Input values for one attendance scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// Attendance date, `%Y-%m-%d`
    pub date: String,
    pub email: String,
    pub name: String,
    pub description: String,
    pub latitude: String,
    pub longitude: String,
    /// Sign-in time, `%H:%M`
    pub login: String,
    /// Sign-out time, `%H:%M`
    pub logout: String,
}

impl Fixture {
    pub fn with_email(&self, email: &str) -> Self {
        Self {
            email: email.to_string(),
            ..self.clone()
        }
    }

    pub fn with_name(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn with_coordinates(&self, latitude: &str, longitude: &str) -> Self {
        Self {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            ..self.clone()
        }
    }
}

/// The three students the suite signs in and out, dated yesterday
pub fn default_fixtures() -> Vec<Fixture> {
    let date = (Local::now() - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string();

    let student = |email: &str,
                   name: &str,
                   description: &str,
                   (latitude, longitude): (&str, &str),
                   (login, logout): (&str, &str)| Fixture {
        date: date.clone(),
        email: email.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        latitude: latitude.to_string(),
        longitude: longitude.to_string(),
        login: login.to_string(),
        logout: logout.to_string(),
    };

    vec![
        student(
            "john.123@example.com",
            "John Smith",
            "Present for the entire session.",
            ("12.9716", "77.5946"),
            ("09:00", "17:00"),
        ),
        student(
            "jane.doe@work.net",
            "Jane Doe",
            "Attended the morning session.",
            ("13.0827", "80.2707"),
            ("09:05", "13:00"),
        ),
        student(
            "test@university.edu",
            "Test Student",
            "Late arrival.",
            ("12.5678", "78.9012"),
            ("10:30", "17:00"),
        ),
    ]
}
