//! The fixed set of cities with bike-share data and their source files.

use anyhow::{Result, bail};
use std::fmt;
use std::str::FromStr;

/// A city whose trip records can be analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

/// Lookup key, display name, and source file for every city.
static CITY_TABLE: &[(City, &str, &str, &str)] = &[
    (City::Chicago, "chicago", "Chicago", "chicago.csv"),
    (
        City::NewYorkCity,
        "new york city",
        "New York City",
        "new_york_city.csv",
    ),
    (City::Washington, "washington", "Washington", "washington.csv"),
];

impl City {
    pub const ALL: [City; 3] = [City::Chicago, City::NewYorkCity, City::Washington];

    // CITY_TABLE is ordered by discriminant.
    fn entry(self) -> &'static (City, &'static str, &'static str, &'static str) {
        &CITY_TABLE[self as usize]
    }

    /// Lowercase name accepted on the command line and in config files.
    pub fn key(self) -> &'static str {
        self.entry().1
    }

    pub fn display_name(self) -> &'static str {
        self.entry().2
    }

    /// File name of the city's CSV inside the data directory.
    pub fn file_name(self) -> &'static str {
        self.entry().3
    }
}

impl FromStr for City {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        match CITY_TABLE.iter().find(|(_, key, ..)| *key == wanted) {
            Some((city, ..)) => Ok(*city),
            None => bail!(
                "Unknown city '{}': expected one of Chicago, New York City or Washington",
                s.trim()
            ),
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Chicago".parse::<City>().unwrap(), City::Chicago);
        assert_eq!("NEW YORK CITY".parse::<City>().unwrap(), City::NewYorkCity);
        assert_eq!("  washington ".parse::<City>().unwrap(), City::Washington);
    }

    #[test]
    fn test_parse_unknown_city() {
        let err = "boston".parse::<City>().unwrap_err();
        assert!(err.to_string().contains("boston"));
    }

    #[test]
    fn test_file_names() {
        assert_eq!(City::Chicago.file_name(), "chicago.csv");
        assert_eq!(City::NewYorkCity.file_name(), "new_york_city.csv");
        assert_eq!(City::Washington.file_name(), "washington.csv");
    }

    #[test]
    fn test_every_city_has_a_table_entry() {
        for city in City::ALL {
            assert_eq!(city.key().parse::<City>().unwrap(), city);
        }
    }
}
